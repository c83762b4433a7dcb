//! Account registration and password login.

use secrecy::SecretString;

use crate::error::{CashbackError, Result};
use crate::models::{NewUser, User};
use crate::store::CashbackStore;
use crate::types::UserId;

/// Registration, login and user lookups.
pub struct AccountService<'a> {
    store: &'a CashbackStore,
}

impl<'a> AccountService<'a> {
    /// Create an account service over a store.
    #[must_use]
    pub const fn new(store: &'a CashbackStore) -> Self {
        Self { store }
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns `CashbackError::InvalidProfile` if a field fails validation,
    /// `CashbackError::DuplicateUsername` if the name is taken, and
    /// `CashbackError::Credential` if hashing fails.
    pub fn register(&self, new_user: &NewUser) -> Result<User> {
        let profile = new_user.validate()?;

        // Cheap early check; the store re-checks under its write lock.
        if self
            .store
            .users()
            .get_by_username(profile.username.as_str())?
            .is_some()
        {
            return Err(CashbackError::DuplicateUsername(
                profile.username.as_str().to_owned(),
            ));
        }

        let credential_hash = self.store.hasher().hash(&new_user.password)?;

        self.store
            .users()
            .create(profile, credential_hash, self.store.clock().now())
    }

    /// Check a username/password pair.
    ///
    /// Returns `Ok(None)` when the user is unknown or the password is wrong.
    ///
    /// # Errors
    ///
    /// Returns `CashbackError::Credential` if the stored hash is unreadable.
    pub fn authenticate(&self, username: &str, password: &SecretString) -> Result<Option<User>> {
        let Some(user) = self.store.users().get_by_username(username)? else {
            return Ok(None);
        };

        if self.store.hasher().verify(password, &user.credential_hash)? {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    /// Make sure the bootstrap administrator exists.
    ///
    /// Creates the account on first start. If an administrator with this
    /// username already exists it is returned untouched.
    ///
    /// # Errors
    ///
    /// Returns `CashbackError::DuplicateUsername` if the name belongs to a
    /// non-admin user, plus any error from [`Self::register`].
    pub fn ensure_admin(&self, username: &str, password: &SecretString) -> Result<User> {
        if let Some(existing) = self.store.users().get_by_username(username)? {
            if existing.is_admin {
                return Ok(existing);
            }
            return Err(CashbackError::DuplicateUsername(
                existing.username.as_str().to_owned(),
            ));
        }

        let admin = self.register(&NewUser {
            username: username.to_owned(),
            password: password.clone(),
            name: "Administrator".to_owned(),
            address: "Head Office".to_owned(),
            phone: "0000000000".to_owned(),
            is_admin: true,
        })?;
        tracing::info!(user_id = %admin.id, username = %admin.username, "bootstrap administrator created");
        Ok(admin)
    }

    /// Fetch a user that must exist.
    ///
    /// # Errors
    ///
    /// Returns `CashbackError::UserNotFound` for an unknown ID.
    pub fn get_user(&self, id: UserId) -> Result<User> {
        self.store
            .users()
            .get_by_id(id)?
            .ok_or(CashbackError::UserNotFound(id))
    }

    /// Look up a user by username.
    ///
    /// # Errors
    ///
    /// Returns `CashbackError::LockPoisoned` if the store is unusable.
    pub fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        self.store.users().get_by_username(username)
    }

    /// All users in registration order.
    ///
    /// # Errors
    ///
    /// Returns `CashbackError::LockPoisoned` if the store is unusable.
    pub fn list_users(&self) -> Result<Vec<User>> {
        self.store.users().list()
    }

    /// Number of registered users.
    ///
    /// # Errors
    ///
    /// Returns `CashbackError::LockPoisoned` if the store is unusable.
    pub fn user_count(&self) -> Result<usize> {
        self.store.users().count()
    }
}
