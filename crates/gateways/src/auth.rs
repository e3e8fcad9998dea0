//! Admin credential verification.
//!
//! The password is never held in clear: the provider is configured
//! with a SHA-256 digest and compares digests on every check.

use sha2::{Digest, Sha256};

/// Trait for verifying admin credentials.
pub trait AuthProvider: Send + Sync {
    /// Returns true when the username and password match the
    /// configured admin credentials.
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// Returns the lowercase hex SHA-256 digest of the input.
pub fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

/// Provider holding the admin username and a SHA-256 password digest.
///
/// When constructed without credentials every check fails, so an
/// unconfigured deployment denies all admin access rather than
/// allowing it.
pub struct Sha256AuthProvider {
    credentials: Option<(String, String)>,
}

impl Sha256AuthProvider {
    /// Creates a provider for the given username and password digest.
    ///
    /// The digest must be lowercase hex SHA-256, as produced by
    /// [`sha256_hex`].
    pub fn new(username: impl Into<String>, password_sha256: impl Into<String>) -> Self {
        Self {
            credentials: Some((username.into(), password_sha256.into())),
        }
    }

    /// Creates a provider that denies every check.
    pub fn deny_all() -> Self {
        Self { credentials: None }
    }
}

impl AuthProvider for Sha256AuthProvider {
    fn verify(&self, username: &str, password: &str) -> bool {
        match &self.credentials {
            Some((expected_user, expected_digest)) => {
                username == expected_user && sha256_hex(password) == *expected_digest
            }
            None => false,
        }
    }
}

/// Plaintext credential provider for tests.
pub struct StaticAuthProvider {
    username: String,
    password: String,
}

impl StaticAuthProvider {
    /// Creates a provider accepting exactly this username and password.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl AuthProvider for StaticAuthProvider {
    fn verify(&self, username: &str, password: &str) -> bool {
        username == self.username && password == self.password
    }
}
