//! Request identity resolution.
//!
//! Login, sessions, and the user table live in the auth layer in front of
//! this service; by the time a request arrives here the user has already
//! been authenticated and only the opaque user id matters.

use actix_web::HttpRequest;

/// Resolves the authenticated user behind a request.
pub trait IdentityProvider: Send + Sync {
    /// The authenticated user's id, or None for an anonymous request.
    fn user_id(&self, req: &HttpRequest) -> Option<String>;
}

/// Reads the user id from the header the authenticating reverse proxy
/// injects on every forwarded request.
pub struct ProxyHeaderIdentity {
    header: String,
}

impl ProxyHeaderIdentity {
    pub fn new(header: &str) -> Self {
        Self {
            header: header.to_string(),
        }
    }
}

impl IdentityProvider for ProxyHeaderIdentity {
    fn user_id(&self, req: &HttpRequest) -> Option<String> {
        req.headers()
            .get(self.header.as_str())
            .and_then(|h| h.to_str().ok())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}
