//! Account password storage for `/auth/register`, `/auth/login` and the
//! admin user endpoints.
//!
//! `users.password_hash` holds an Argon2id PHC string; plaintext never
//! reaches the store.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    Error as HashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;

use crate::error::{AppError, AppResult};

/// Hash an account password for `users.password_hash`.
pub fn hash_for_storage(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))
}

/// Check a login attempt against the account's stored hash.
///
/// A wrong password is `Ok(false)`. A stored value that is not a PHC string
/// is a 500, since the row itself is broken.
pub fn check_login(password: &str, stored_hash: &str) -> AppResult<bool> {
    let outcome = PasswordHash::new(stored_hash).and_then(|parsed| {
        Argon2::default().verify_password(password.as_bytes(), &parsed)
    });
    match outcome {
        Ok(()) => Ok(true),
        Err(HashError::Password) => Ok(false),
        Err(e) => Err(AppError::InternalError(format!("Password verification error: {e}"))),
    }
}
