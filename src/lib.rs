#![forbid(unsafe_code)]

pub mod config;
pub mod core;
pub mod error;
pub mod remote;
pub mod sync;
pub mod telemetry;

pub use error::{Effect, Error, Transience};
pub type Result<T> = std::result::Result<T, Error>;

// Re-export core types at crate root for convenience
pub use crate::core::{
    Collection, CoreError, Entity, EntityId, Fields, ListFilter, RemoteId, ResourceName,
    ResourceSpec, SortKey, Stats, TempId, View,
};
pub use crate::remote::{
    HttpRemote, NoAuth, Page, RemoteError, RemoteResource, StaticToken, TokenProvider,
};
pub use crate::sync::{CancelToken, Engine, MutationOutcome};
