//! Optimistic mutation engine.
//!
//! Mutations apply locally first, make exactly one remote attempt, then
//! confirm or roll back. Failures are non-fatal and local.

pub mod cancel;
pub mod engine;

pub use cancel::CancelToken;
pub use engine::{Engine, MutationOutcome};
