//! Explicit per-session context: where the user is and who they are.

use std::fmt;

use super::Coordinate;
use crate::util::normalize_text_option;

/// Location and auth context handed to query builders and API clients.
#[derive(Clone, Default, PartialEq)]
pub struct SessionContext {
    origin: Option<Coordinate>,
    access_token: Option<String>,
}

impl SessionContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_origin(mut self, origin: Coordinate) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Attach a bearer token; blank tokens are ignored.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = normalize_text_option(Some(token.into()));
        self
    }

    #[must_use]
    pub const fn origin(&self) -> Option<Coordinate> {
        self.origin
    }

    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SessionContext")
            .field("origin", &self.origin)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}
