//! Argon2id password hashing
//!
//! Hashes are stored as PHC strings, so the salt and cost parameters ride
//! along with each hash and can be raised later without migrating rows.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::types::{Result, SteadfastError};

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| SteadfastError::Internal(format!("Failed to hash password: {e}")))?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC hash.
///
/// A wrong password is Ok(false); only an unparseable stored hash is an
/// error, since that means the users collection holds corrupt data.
pub fn verify_password(password: &str, stored: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| SteadfastError::Internal(format!("Invalid password hash format: {e}")))?;

    let matches = Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok();
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_correct_password_and_rejects_wrong_one() {
        let hash = hash_password("one-day-at-a-time").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("one-day-at-a-time", &hash).unwrap());
        assert!(!verify_password("two-days-at-a-time", &hash).unwrap());
    }

    #[test]
    fn salting_makes_equal_passwords_hash_differently() {
        let first = hash_password("repeat-me").unwrap();
        let second = hash_password("repeat-me").unwrap();

        assert_ne!(first, second);
        assert!(verify_password("repeat-me", &first).unwrap());
        assert!(verify_password("repeat-me", &second).unwrap());
    }

    #[test]
    fn empty_password_still_round_trips() {
        // Route validation rejects empty passwords, but the hasher itself
        // must not panic on them.
        let hash = hash_password("").unwrap();
        assert!(verify_password("", &hash).unwrap());
        assert!(!verify_password("x", &hash).unwrap());
    }

    #[test]
    fn corrupt_stored_hash_is_an_error() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }
}
