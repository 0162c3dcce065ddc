//! Remote writes of the hosted backend, as seen by the view models.

use futures::future::BoxFuture;
use quill_sync::mutation::MutationError;

/// A pending remote write. It is started by the view model and owned by the coordinator.
pub type PersistFuture = BoxFuture<'static, Result<(), MutationError>>;

mod cart_backend;
pub use self::cart_backend::*;
mod follow_backend;
pub use self::follow_backend::*;
mod backend_emulation;
pub use self::backend_emulation::*;
