mod toast_board;
pub use self::toast_board::*;
