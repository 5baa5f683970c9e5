//! Core domain types for the local mirror (Layers 0-5)
//!
//! Module hierarchy follows type dependency order:
//! - identity: RemoteId, TempId, EntityId, ResourceName, ResourceSpec (Layer 0)
//! - fields: Fields map (Layer 1)
//! - entity: Entity (Layer 2)
//! - stats: Stats aggregate (Layer 3)
//! - filter: ListFilter, SortKey (Layer 3)
//! - store: Collection (Layer 4)
//! - view: memoized projections (Layer 5)

pub mod entity;
pub mod error;
pub mod fields;
pub mod filter;
pub mod identity;
pub mod stats;
pub mod store;
pub mod view;

pub use entity::Entity;
pub use error::{CoreError, InvalidField, InvalidId};
pub use fields::Fields;
pub use filter::{ListFilter, SortKey};
pub use identity::{EntityId, RemoteId, ResourceName, ResourceSpec, TempId};
pub use stats::Stats;
pub use store::Collection;
pub use view::View;
