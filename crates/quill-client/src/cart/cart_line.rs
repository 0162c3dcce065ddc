use crate::{BookId, CartLineId};
use quill_sync::mutation::Entity;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: CartLineId,
    pub book_id: BookId,
    pub title: String,
    pub quantity: u32,
    /// Unit price in minor currency units.
    pub price: u64,
}

impl CartLine {
    pub fn new(book_id: BookId, title: impl Into<String>, quantity: u32, price: u64) -> Self {
        Self {
            id: CartLineId::new(),
            book_id,
            title: title.into(),
            quantity,
            price,
        }
    }

    pub fn with_quantity(&self, quantity: u32) -> Self {
        Self { quantity, ..self.clone() }
    }

    pub fn total(&self) -> u64 {
        self.price * u64::from(self.quantity)
    }
}

impl Entity for CartLine {
    type Key = CartLineId;

    fn key(&self) -> CartLineId {
        self.id
    }
}
