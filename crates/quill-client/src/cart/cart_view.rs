use crate::{
    backend::CartBackend,
    config::{CartConfig, ClientConfig},
    notification::{RollbackToasts, ToastBoard},
    CartLineId,
};
use quill_sync::mutation::{EntityList, MutationCoordinator, MutationEvent, MutationSeq};

use super::{CartError, CartLine};

/// The shopping cart as displayed to the user. Every change shows up immediately and is rolled back
/// with a notification if the backend does not accept it.
pub struct CartView<B>
where
    B: CartBackend,
{
    coordinator: MutationCoordinator<EntityList<CartLine>>,
    backend: B,
    config: CartConfig,
    toasts: ToastBoard,
}

impl<B> CartView<B>
where
    B: CartBackend,
{
    pub async fn new(lines: Vec<CartLine>, backend: B, config: &ClientConfig) -> Self {
        let coordinator = MutationCoordinator::new(lines.into_iter().collect(), config.coordinator.clone());
        let toasts = ToastBoard::new(config.toast.clone());
        coordinator
            .events()
            .subscribe(RollbackToasts::new(toasts.clone(), "Could not update your cart"))
            .await;

        Self {
            coordinator,
            backend,
            config: config.cart.clone(),
            toasts,
        }
    }

    pub fn lines(&self) -> &[CartLine] {
        self.coordinator.store().as_slice()
    }

    pub fn line(&self, id: &CartLineId) -> Option<&CartLine> {
        self.coordinator.store().get(id)
    }

    pub fn item_count(&self) -> u32 {
        self.lines().iter().map(|l| l.quantity).sum()
    }

    pub fn subtotal(&self) -> u64 {
        self.lines().iter().map(CartLine::total).sum()
    }

    pub fn toasts(&self) -> &ToastBoard {
        &self.toasts
    }

    pub fn in_flight(&self) -> usize {
        self.coordinator.in_flight()
    }

    fn check_quantity(&self, quantity: u32) -> Result<u32, CartError> {
        if quantity == 0 || quantity > self.config.max_quantity {
            Err(CartError::InvalidQuantity {
                quantity,
                max: self.config.max_quantity,
            })
        } else {
            Ok(quantity)
        }
    }

    fn current_quantity(&self, id: &CartLineId) -> Result<u32, CartError> {
        self.line(id).map(|l| l.quantity).ok_or(CartError::UnknownLine(*id))
    }

    pub fn set_quantity(&mut self, id: CartLineId, quantity: u32) -> Result<MutationSeq, CartError> {
        self.current_quantity(&id)?;
        let quantity = self.check_quantity(quantity)?;

        let persist = self.backend.update_quantity(id, quantity);
        self.coordinator
            .update(id, |line| line.with_quantity(quantity), persist)
            .ok_or(CartError::UnknownLine(id))
    }

    pub fn increment(&mut self, id: CartLineId) -> Result<MutationSeq, CartError> {
        let quantity = self.current_quantity(&id)?;
        self.set_quantity(id, quantity.saturating_add(1))
    }

    pub fn decrement(&mut self, id: CartLineId) -> Result<MutationSeq, CartError> {
        let quantity = self.current_quantity(&id)?;
        self.set_quantity(id, quantity.saturating_sub(1))
    }

    pub fn remove(&mut self, id: CartLineId) -> Result<MutationSeq, CartError> {
        self.current_quantity(&id)?;

        let persist = self.backend.remove_line(id);
        self.coordinator.remove(id, persist).ok_or(CartError::UnknownLine(id))
    }

    /// Add a line to the end of the cart, or replace the line with the same id.
    pub fn add(&mut self, line: CartLine) -> Result<MutationSeq, CartError> {
        self.check_quantity(line.quantity)?;

        let persist = self.backend.add_line(line.clone());
        Ok(self.coordinator.push(line, persist))
    }

    /// Apply the backend responses that have arrived, without waiting.
    pub async fn reconcile(&mut self) -> Vec<MutationEvent<CartLineId>> {
        self.coordinator.reconcile().await
    }

    /// Wait until all the pending changes are settled.
    pub async fn settle_all(&mut self) -> Vec<MutationEvent<CartLineId>> {
        self.coordinator.settle_all().await
    }

    pub async fn settle_next(&mut self) -> Option<MutationEvent<CartLineId>> {
        self.coordinator.settle_next().await
    }
}
