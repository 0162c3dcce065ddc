//! View models of the bookstore client: cart and author follows, kept responsive with optimistic
//! updates on top of `quill-sync`.

pub mod backend;
pub mod cart;
pub mod config;
pub mod follow;
pub mod notification;

mod ids;
pub use self::ids::*;
