//! Credential injection.
//!
//! The client never reads ambient storage; whoever constructs it passes a
//! provider. A missing token is tolerated - the request goes out
//! unauthenticated and the server answers 401.

/// Source of the bearer credential attached to every request.
pub trait TokenProvider: Send + Sync {
    fn token(&self) -> Option<String>;
}

/// Fixed credential known at construction time.
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl TokenProvider for StaticToken {
    fn token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// No credential; requests proceed unauthenticated.
#[derive(Default)]
pub struct NoAuth;

impl TokenProvider for NoAuth {
    fn token(&self) -> Option<String> {
        None
    }
}

impl<F> TokenProvider for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn token(&self) -> Option<String> {
        self()
    }
}
