//! Deterministic capabilities for unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, TimeZone, Utc};
use secrecy::{ExposeSecret, SecretString};

use crate::capability::{Clock, CredentialError, CredentialHasher};
use crate::models::NewUser;
use crate::store::CashbackStore;

/// Clock that moves one second forward on every reading.
pub struct StepClock(AtomicI64);

impl StepClock {
    pub fn new() -> Self {
        Self(AtomicI64::new(1_790_000_000))
    }
}

impl Clock for StepClock {
    fn now(&self) -> DateTime<Utc> {
        let secs = self.0.fetch_add(1, Ordering::SeqCst);
        Utc.timestamp_opt(secs, 0).single().unwrap_or_default()
    }
}

/// Reversible "hash" so tests don't pay for a real KDF.
pub struct PlainHasher;

impl CredentialHasher for PlainHasher {
    fn hash(&self, password: &SecretString) -> Result<String, CredentialError> {
        Ok(format!("plain:{}", password.expose_secret()))
    }

    fn verify(&self, password: &SecretString, hash: &str) -> Result<bool, CredentialError> {
        let stored = hash
            .strip_prefix("plain:")
            .ok_or_else(|| CredentialError("not a plain hash".to_owned()))?;
        Ok(stored == password.expose_secret())
    }
}

pub fn test_store() -> CashbackStore {
    CashbackStore::builder(Arc::new(PlainHasher))
        .clock(Arc::new(StepClock::new()))
        .build()
}

pub fn new_user(username: &str) -> NewUser {
    NewUser {
        username: username.to_owned(),
        password: SecretString::from("password123"),
        name: format!("{username} tester"),
        address: "1 Test Lane".to_owned(),
        phone: "0123456789".to_owned(),
        is_admin: false,
    }
}
