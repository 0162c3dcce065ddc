mod cart_line;
pub use self::cart_line::*;
mod cart_error;
pub use self::cart_error::*;
mod cart_view;
pub use self::cart_view::*;
