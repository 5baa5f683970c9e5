//! Blocking HTTP implementation of [`RemoteResource`].
//!
//! One client per collection endpoint. The bearer credential comes from an
//! injected [`TokenProvider`]; a [`CancelToken`] makes abandoned requests
//! inert - checked before sending and before the result is surfaced.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::config::Config;
use crate::core::{Entity, EntityId, Fields, ListFilter, ResourceSpec, Stats};
use crate::sync::CancelToken;
use crate::{Error, Result};

use super::auth::TokenProvider;
use super::envelope::{self, Page};
use super::error::RemoteError;
use super::RemoteResource;

pub struct HttpRemote {
    base_url: String,
    spec: ResourceSpec,
    client: reqwest::blocking::Client,
    auth: Arc<dyn TokenProvider>,
    cancel: CancelToken,
}

impl HttpRemote {
    pub fn new(config: &Config, auth: Arc<dyn TokenProvider>) -> Result<Self> {
        Self::for_resource(config, config.resource_spec()?, auth)
    }

    /// Build against an explicit resource pair, typically the one the engine
    /// was constructed with.
    pub fn for_resource(
        config: &Config,
        spec: ResourceSpec,
        auth: Arc<dyn TokenProvider>,
    ) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| {
                Error::Remote(RemoteError::Transport {
                    message: format!("failed to build http client: {e}"),
                })
            })?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            spec,
            client,
            auth,
            cancel: CancelToken::new(),
        })
    }

    /// Replace the cancellation token. A clone of the token held by the
    /// caller cancels requests issued after this point.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    fn url(&self, suffix: &str) -> String {
        format!("{}/{}{}", self.base_url, self.spec.name(), suffix)
    }

    /// Send a prepared request, normalizing every failure mode.
    fn execute(&self, req: reqwest::blocking::RequestBuilder) -> std::result::Result<Value, RemoteError> {
        if self.cancel.is_cancelled() {
            return Err(RemoteError::Cancelled);
        }
        let req = match self.auth.token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        };
        let resp = req.send().map_err(|e| RemoteError::Transport {
            message: e.to_string(),
        })?;
        let status = resp.status();
        let body = resp.text().map_err(|e| RemoteError::Transport {
            message: e.to_string(),
        })?;
        // The component may have gone away while we were blocked on I/O;
        // a cancelled result must never be applied.
        if self.cancel.is_cancelled() {
            return Err(RemoteError::Cancelled);
        }
        if !status.is_success() {
            let message = envelope::error_message(&body)
                .unwrap_or_else(|| format!("request failed with status {}", status.as_u16()));
            return Err(RemoteError::Api {
                status: status.as_u16(),
                message,
            });
        }
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| RemoteError::Shape {
            reason: format!("invalid json body: {e}"),
        })
    }
}

impl RemoteResource for HttpRemote {
    fn list(&self, filter: &ListFilter) -> std::result::Result<Page, RemoteError> {
        let url = self.url("");
        tracing::debug!(%url, "list");
        let req = self
            .client
            .get(&url)
            .query(&filter.query_pairs(self.spec.done_field()));
        envelope::unwrap_list(self.execute(req)?)
    }

    fn create(&self, fields: &Fields) -> std::result::Result<Entity, RemoteError> {
        let url = self.url("");
        tracing::debug!(%url, "create");
        let req = self.client.post(&url).json(fields.as_map());
        envelope::unwrap_entity(self.execute(req)?)
    }

    fn update(&self, id: &EntityId, patch: &Fields) -> std::result::Result<Entity, RemoteError> {
        let url = self.url(&format!("/{id}"));
        tracing::debug!(%url, "update");
        let req = self.client.put(&url).json(patch.as_map());
        envelope::unwrap_entity(self.execute(req)?)
    }

    fn toggle(&self, id: &EntityId, done: bool) -> std::result::Result<Entity, RemoteError> {
        let url = self.url(&format!("/{id}/done"));
        tracing::debug!(%url, done, "toggle");
        let mut body = Fields::new();
        body.set(self.spec.done_field().to_string(), Value::Bool(done));
        let req = self.client.put(&url).json(body.as_map());
        match self.execute(req) {
            Ok(value) => envelope::unwrap_entity(value),
            // Backend without the dedicated endpoint: plain update.
            Err(RemoteError::Api { status, .. }) if status == 404 || status == 405 => {
                tracing::debug!(%id, "toggle endpoint missing, falling back to update");
                self.update(id, &body)
            }
            Err(e) => Err(e),
        }
    }

    fn delete(&self, id: &EntityId) -> std::result::Result<(), RemoteError> {
        let url = self.url(&format!("/{id}"));
        tracing::debug!(%url, "delete");
        let req = self.client.delete(&url);
        // Response is `{data: entity}` or empty; either way we only need
        // success.
        self.execute(req).map(|_| ())
    }

    fn stats(&self) -> std::result::Result<Stats, RemoteError> {
        let url = self.url("/stats/summary");
        tracing::debug!(%url, "stats");
        let req = self.client.get(&url);
        envelope::unwrap_stats(self.execute(req)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::NoAuth;

    fn remote() -> HttpRemote {
        let config = Config {
            base_url: "http://api.example.test/v1/".to_string(),
            resource: "todos".to_string(),
            ..Config::default()
        };
        HttpRemote::new(&config, Arc::new(NoAuth)).expect("client")
    }

    #[test]
    fn urls_are_joined_without_double_slash() {
        let remote = remote();
        assert_eq!(remote.url(""), "http://api.example.test/v1/todos");
        assert_eq!(
            remote.url("/real-1/done"),
            "http://api.example.test/v1/todos/real-1/done"
        );
    }

    #[test]
    fn rejects_invalid_resource_name() {
        let config = Config {
            resource: "To Dos".to_string(),
            ..Config::default()
        };
        assert!(HttpRemote::new(&config, Arc::new(NoAuth)).is_err());
    }

    #[test]
    fn cancelled_token_short_circuits() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let remote = remote().with_cancel(cancel);
        let err = remote.list(&ListFilter::all()).unwrap_err();
        assert!(matches!(err, RemoteError::Cancelled));
    }
}
