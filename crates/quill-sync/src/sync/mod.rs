mod event;
pub use self::event::*;
mod wrapper;
pub(crate) use self::wrapper::*;
mod event_bus;
pub use self::event_bus::*;
