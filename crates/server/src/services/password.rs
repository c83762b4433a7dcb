//! Argon2id password hashing.
//!
//! Implements the engine's [`CredentialHasher`] so the core never links a
//! hashing library itself.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::{ExposeSecret, SecretString};

use cashback_core::{CredentialError, CredentialHasher};

use crate::error::AppError;

/// Minimum password length for registration.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Argon2id hasher.
///
/// Defaults to the crate's recommended parameters. Verification reads the
/// parameters back from the stored PHC string, so hashes made with different
/// parameters still verify.
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    /// Create a hasher with explicit cost parameters.
    #[must_use]
    pub const fn with_params(params: Params) -> Self {
        Self { params }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, password: &SecretString) -> Result<String, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.expose_secret().as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| CredentialError(e.to_string()))
    }

    fn verify(&self, password: &SecretString, hash: &str) -> Result<bool, CredentialError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|e| CredentialError(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(password.expose_secret().as_bytes(), &parsed_hash)
            .is_ok())
    }
}

/// Validate password strength.
///
/// # Errors
///
/// Returns `AppError::BadRequest` if the password is too short.
pub fn validate_password(password: &SecretString) -> Result<(), AppError> {
    if password.expose_secret().chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::BadRequest(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn fast_hasher() -> Argon2Hasher {
        Argon2Hasher::with_params(
            Params::new(Params::MIN_M_COST, Params::MIN_T_COST, Params::MIN_P_COST, None).unwrap(),
        )
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = fast_hasher();
        let password = SecretString::from("hunter2hunter2");
        let hash = hasher.hash(&password).unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify(&password, &hash).unwrap());
        assert!(
            !hasher
                .verify(&SecretString::from("wrong password"), &hash)
                .unwrap()
        );
    }

    #[test]
    fn test_hashes_are_salted() {
        let hasher = fast_hasher();
        let password = SecretString::from("hunter2hunter2");
        assert_ne!(
            hasher.hash(&password).unwrap(),
            hasher.hash(&password).unwrap()
        );
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        let result = fast_hasher().verify(&SecretString::from("whatever"), "not-a-phc-string");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password(&SecretString::from("short")).is_err());
        assert!(validate_password(&SecretString::from("12345678")).is_ok());
    }
}
