//! Identity store.
//!
//! Holds user records and enforces username uniqueness.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use super::{read, write};
use crate::error::{CashbackError, Result};
use crate::models::{User, UserProfile};
use crate::types::UserId;
use crate::types::id::IdSequence;

const STORE: &str = "user";

/// In-memory user table.
#[derive(Debug)]
pub struct UserStore {
    inner: RwLock<UserTable>,
}

#[derive(Debug)]
struct UserTable {
    seq: IdSequence,
    by_id: BTreeMap<UserId, User>,
    by_username: HashMap<String, UserId>,
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(UserTable {
                seq: IdSequence::new(),
                by_id: BTreeMap::new(),
                by_username: HashMap::new(),
            }),
        }
    }

    /// Insert a new user.
    ///
    /// # Errors
    ///
    /// Returns `CashbackError::DuplicateUsername` if the username is taken.
    pub fn create(
        &self,
        profile: UserProfile,
        credential_hash: String,
        created_at: DateTime<Utc>,
    ) -> Result<User> {
        let mut table = write(&self.inner, STORE)?;

        if table.by_username.contains_key(profile.username.as_str()) {
            return Err(CashbackError::DuplicateUsername(
                profile.username.as_str().to_owned(),
            ));
        }

        let id = UserId::new(
            table
                .seq
                .take()
                .ok_or(CashbackError::IdSpaceExhausted(STORE))?,
        );
        let user = User {
            id,
            username: profile.username,
            credential_hash,
            name: profile.name,
            address: profile.address,
            phone: profile.phone,
            is_admin: profile.is_admin,
            created_at,
        };

        table
            .by_username
            .insert(user.username.as_str().to_owned(), id);
        table.by_id.insert(id, user.clone());
        drop(table);

        tracing::info!(user_id = %id, username = %user.username, is_admin = user.is_admin, "user created");
        Ok(user)
    }

    /// Look up a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `CashbackError::LockPoisoned` if the store is unusable.
    pub fn get_by_id(&self, id: UserId) -> Result<Option<User>> {
        Ok(read(&self.inner, STORE)?.by_id.get(&id).cloned())
    }

    /// Look up a user by username (surrounding whitespace ignored).
    ///
    /// # Errors
    ///
    /// Returns `CashbackError::LockPoisoned` if the store is unusable.
    pub fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let table = read(&self.inner, STORE)?;
        Ok(table
            .by_username
            .get(username.trim())
            .and_then(|id| table.by_id.get(id))
            .cloned())
    }

    /// All users in registration order.
    ///
    /// # Errors
    ///
    /// Returns `CashbackError::LockPoisoned` if the store is unusable.
    pub fn list(&self) -> Result<Vec<User>> {
        Ok(read(&self.inner, STORE)?.by_id.values().cloned().collect())
    }

    /// Number of registered users.
    ///
    /// # Errors
    ///
    /// Returns `CashbackError::LockPoisoned` if the store is unusable.
    pub fn count(&self) -> Result<usize> {
        Ok(read(&self.inner, STORE)?.by_id.len())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{PhoneNumber, Username};

    fn profile(username: &str) -> UserProfile {
        UserProfile {
            username: Username::parse(username).unwrap(),
            name: "Test User".to_owned(),
            address: "1 Test Lane".to_owned(),
            phone: PhoneNumber::parse("0123456789").unwrap(),
            is_admin: false,
        }
    }

    #[test]
    fn test_ids_increase() {
        let store = UserStore::new();
        let a = store.create(profile("a"), "h".into(), Utc::now()).unwrap();
        let b = store.create(profile("b"), "h".into(), Utc::now()).unwrap();
        assert!(b.id > a.id);
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_duplicate_username() {
        let store = UserStore::new();
        store.create(profile("alice"), "h".into(), Utc::now()).unwrap();
        let err = store
            .create(profile("alice"), "h".into(), Utc::now())
            .unwrap_err();
        assert!(matches!(err, CashbackError::DuplicateUsername(name) if name == "alice"));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_lookups() {
        let store = UserStore::new();
        let alice = store.create(profile("alice"), "h".into(), Utc::now()).unwrap();

        assert_eq!(store.get_by_id(alice.id).unwrap().unwrap().id, alice.id);
        assert_eq!(
            store.get_by_username(" alice ").unwrap().unwrap().id,
            alice.id
        );
        assert!(store.get_by_username("bob").unwrap().is_none());
        assert!(store.get_by_id(UserId::new(99)).unwrap().is_none());
    }

    #[test]
    fn test_list_in_registration_order() {
        let store = UserStore::new();
        for name in ["carol", "alice", "bob"] {
            store.create(profile(name), "h".into(), Utc::now()).unwrap();
        }
        let names: Vec<_> = store
            .list()
            .unwrap()
            .into_iter()
            .map(|u| u.username.as_str().to_owned())
            .collect();
        assert_eq!(names, ["carol", "alice", "bob"]);
    }
}
