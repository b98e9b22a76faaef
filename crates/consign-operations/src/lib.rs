mod error;
pub mod operations;
pub mod propagator;
pub mod providers;
pub mod stage;
pub mod traits;

#[cfg(test)]
mod mocks;

pub use error::{OperationError, PropagationError, Result, StageError};
