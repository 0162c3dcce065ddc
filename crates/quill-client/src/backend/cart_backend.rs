use crate::{cart::CartLine, CartLineId};

use super::PersistFuture;

/// Cart rows of the signed in user.
pub trait CartBackend: Send + Sync + 'static {
    fn update_quantity(&self, line_id: CartLineId, quantity: u32) -> PersistFuture;
    fn remove_line(&self, line_id: CartLineId) -> PersistFuture;
    /// Insert the line, or replace it if it is already stored.
    fn add_line(&self, line: CartLine) -> PersistFuture;
}
