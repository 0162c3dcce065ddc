mod follow_edge;
pub use self::follow_edge::*;
mod follow_error;
pub use self::follow_error::*;
mod follow_view;
pub use self::follow_view::*;
