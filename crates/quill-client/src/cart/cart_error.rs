use crate::CartLineId;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    #[error("Cart line {0} not found")]
    UnknownLine(CartLineId),
    #[error("Quantity {quantity} is out of the allowed range 1..={max}")]
    InvalidQuantity { quantity: u32, max: u32 },
}
