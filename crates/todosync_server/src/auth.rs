//! Shared-secret authentication.
//!
//! Every request carries the secret in its `password` field. The comparison
//! is exact string equality and is not constant-time.

/// Validates the secret presented by a client.
#[derive(Clone)]
pub struct SecretValidator {
    secret: String,
}

impl SecretValidator {
    /// Creates a validator for the given shared secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Returns true if the presented secret matches exactly.
    pub fn validate(&self, presented: &str) -> bool {
        presented == self.secret
    }
}

impl std::fmt::Debug for SecretValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretValidator")
            .field("secret", &"<redacted>")
            .finish()
    }
}
