//! Capabilities the engine consumes from its host.
//!
//! The stores never read the wall clock, the OS random generator or a
//! password hashing library directly. They receive these through the traits
//! below so tests can substitute deterministic versions.

use chrono::{DateTime, Utc};
use rand::RngCore;
use secrecy::SecretString;

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock backed by [`Utc::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Cryptographically secure random bytes.
pub trait RandomSource: Send + Sync {
    /// Fill `buf` with random bytes.
    fn fill_bytes(&self, buf: &mut [u8]);
}

/// Random source backed by the thread-local CSPRNG, seeded from the OS.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill_bytes(&self, buf: &mut [u8]) {
        rand::rng().fill_bytes(buf);
    }
}

/// Failure inside a credential hasher.
#[derive(thiserror::Error, Debug, Clone)]
#[error("credential hashing failed: {0}")]
pub struct CredentialError(pub String);

/// One-way password hashing.
///
/// Hash strings are opaque to the engine; it only stores and hands them back.
pub trait CredentialHasher: Send + Sync {
    /// Hash a plaintext password for storage.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError` if the hasher fails.
    fn hash(&self, password: &SecretString) -> Result<String, CredentialError>;

    /// Check a plaintext password against a stored hash.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError` if the stored hash cannot be parsed.
    fn verify(&self, password: &SecretString, hash: &str) -> Result<bool, CredentialError>;
}
