//! Services used by the HTTP layer.

pub mod password;

pub use password::{Argon2Hasher, MIN_PASSWORD_LENGTH, validate_password};
