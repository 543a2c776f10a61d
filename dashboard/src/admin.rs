//! Moderation console access
//!
//! A single shared secret guards the moderation console. This is a
//! demo-grade gate, not authentication: the secret ships in configuration
//! and there are no accounts or sessions behind it.

/// Shared-secret gate for the moderation console
#[derive(Debug, Clone)]
pub struct AdminGate {
    secret: String,
}

impl AdminGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// True when the attempt matches the configured secret exactly.
    pub fn verify(&self, attempt: &str) -> bool {
        attempt == self.secret
    }
}
