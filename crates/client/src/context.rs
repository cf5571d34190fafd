//! Request context for backend calls
//!
//! The bearer token travels with an explicit context object handed to the
//! client at construction. Its source (config file, login flow) is owned by
//! the caller; nothing here is process-global.

use clouddeck_common::{Error, Result};

/// Connection parameters for one backend
#[derive(Debug, Clone)]
pub struct ApiContext {
    base_url: String,
    token: Option<String>,
}

impl ApiContext {
    /// Create a context for an unauthenticated client (login only)
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            token: None,
        }
    }

    /// Attach a bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Backend base URL, no trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Bearer token, if authenticated
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Token required for authenticated endpoints
    pub fn require_token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .ok_or_else(|| Error::InvalidConfig("no API token configured; run login first".into()))
    }

    /// Absolute URL for an API path
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slashes_stripped() {
        let ctx = ApiContext::new("http://127.0.0.1:8000/");
        assert_eq!(ctx.base_url(), "http://127.0.0.1:8000");
        assert_eq!(
            ctx.endpoint("/projects/1/servers"),
            "http://127.0.0.1:8000/projects/1/servers"
        );
    }

    #[test]
    fn test_token_required_for_authenticated_calls() {
        let ctx = ApiContext::new("http://localhost");
        assert!(ctx.require_token().is_err());
        let ctx = ctx.with_token("tok");
        assert_eq!(ctx.require_token().unwrap(), "tok");
    }
}
