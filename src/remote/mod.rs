//! REST boundary: envelope normalization, auth, and the HTTP client.
//!
//! The engine talks to [`RemoteResource`], never to a concrete transport.
//! Test doubles implement the trait; production uses [`HttpRemote`].

pub mod auth;
pub mod envelope;
pub mod error;
pub mod http;

pub use auth::{NoAuth, StaticToken, TokenProvider};
pub use envelope::Page;
pub use error::RemoteError;
pub use http::HttpRemote;

use crate::core::{Entity, EntityId, Fields, ListFilter, Stats};

/// Authenticated CRUD against one REST collection.
///
/// Implementations perform the network call and nothing else; local state is
/// the engine's concern.
pub trait RemoteResource {
    /// `GET /{resource}?filters`
    fn list(&self, filter: &ListFilter) -> Result<Page, RemoteError>;

    /// `POST /{resource}`
    fn create(&self, fields: &Fields) -> Result<Entity, RemoteError>;

    /// `PUT /{resource}/{id}`
    fn update(&self, id: &EntityId, patch: &Fields) -> Result<Entity, RemoteError>;

    /// `PUT /{resource}/{id}/done`, falling back to a plain update where the
    /// backend lacks the dedicated endpoint.
    fn toggle(&self, id: &EntityId, done: bool) -> Result<Entity, RemoteError>;

    /// `DELETE /{resource}/{id}`
    fn delete(&self, id: &EntityId) -> Result<(), RemoteError>;

    /// `GET /{resource}/stats/summary`
    fn stats(&self) -> Result<Stats, RemoteError>;
}
