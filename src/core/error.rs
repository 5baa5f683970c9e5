//! Core capability errors (parsing, validation, collection invariants).
//!
//! These are bounded and stable: core errors represent domain/refusal states,
//! not library implementation details.

use thiserror::Error;

use crate::error::{Effect, Transience};

/// Invalid identifier.
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum InvalidId {
    #[error("entity id `{raw}` is invalid: {reason}")]
    Entity { raw: String, reason: String },
    #[error("temp id `{raw}` is invalid: {reason}")]
    Temp { raw: String, reason: String },
    #[error("resource name `{raw}` is invalid: {reason}")]
    Resource { raw: String, reason: String },
}

/// Invalid field name or value.
#[derive(Debug, Error, Clone)]
#[error("field `{field}` is invalid: {reason}")]
pub struct InvalidField {
    pub field: String,
    pub reason: String,
}

/// Canonical error enum for the core capability.
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum CoreError {
    #[error(transparent)]
    InvalidId(#[from] InvalidId),

    #[error(transparent)]
    InvalidField(#[from] InvalidField),

    /// Collection invariant: at most one entity per identifier.
    #[error("duplicate entity id `{id}`")]
    DuplicateId { id: String },

    /// The collection holds no entity under this identifier.
    #[error("unknown entity id `{id}`")]
    UnknownId { id: String },
}

impl CoreError {
    pub fn transience(&self) -> Transience {
        // Core errors are pure domain/input failures.
        Transience::Permanent
    }

    pub fn effect(&self) -> Effect {
        Effect::None
    }
}
