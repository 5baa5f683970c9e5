//! Remote boundary errors.
//!
//! Bounded taxonomy over everything the transport can do to us: connection
//! failures, server refusals, malformed envelopes, and cancellation.

use thiserror::Error;

use crate::error::{Effect, Transience};

#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum RemoteError {
    /// Request never reached the server, or the connection dropped mid-way.
    #[error("connection failed: {message}")]
    Transport { message: String },

    /// Non-2xx response. `message` is the server-provided message when the
    /// body carried one, else a generic one.
    #[error("server rejected request ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response parsed as JSON but matched no expected envelope shape.
    #[error("unexpected response shape: {reason}")]
    Shape { reason: String },

    /// The caller cancelled; any in-flight result is ignored.
    #[error("request cancelled")]
    Cancelled,
}

impl RemoteError {
    pub fn transience(&self) -> Transience {
        match self {
            RemoteError::Transport { .. } => Transience::Retryable,
            RemoteError::Api { status, .. } if *status >= 500 => Transience::Retryable,
            RemoteError::Api { .. } => Transience::Permanent,
            RemoteError::Shape { .. } => Transience::Permanent,
            RemoteError::Cancelled => Transience::Unknown,
        }
    }

    pub fn effect(&self) -> Effect {
        match self {
            // The request may or may not have been processed.
            RemoteError::Transport { .. } => Effect::Unknown,
            RemoteError::Api { status, .. } if *status >= 500 => Effect::Unknown,
            RemoteError::Api { .. } => Effect::None,
            // A 2xx arrived before we failed to decode it.
            RemoteError::Shape { .. } => Effect::Some,
            RemoteError::Cancelled => Effect::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        let transport = RemoteError::Transport {
            message: "refused".into(),
        };
        assert!(transport.transience().is_retryable());
        assert_eq!(transport.effect(), Effect::Unknown);

        let validation = RemoteError::Api {
            status: 422,
            message: "title required".into(),
        };
        assert_eq!(validation.transience(), Transience::Permanent);
        assert_eq!(validation.effect(), Effect::None);

        let outage = RemoteError::Api {
            status: 503,
            message: "unavailable".into(),
        };
        assert!(outage.transience().is_retryable());
    }
}
