//! Password hashing with Argon2id.
//!
//! Hashes are stored as PHC strings, so the algorithm parameters and the
//! salt travel with the hash. The default `Argon2` instance uses Argon2id
//! with 19 MiB of memory, 2 iterations and 1 lane.

use std::sync::LazyLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// Hashing failure.
#[derive(thiserror::Error, Debug)]
#[error("failed to hash password: {0}")]
pub struct PasswordError(argon2::password_hash::Error);

/// Hash a plaintext password with a fresh random salt.
///
/// # Errors
///
/// Returns [`PasswordError`] if the hasher rejects the input.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(PasswordError)
}

/// Check a plaintext password against a stored PHC hash.
///
/// A stored hash that cannot be parsed never matches.
#[must_use]
pub fn verify_password(hash: &str, password: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

// Hashed once, with the default parameters real hashes use.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("unknown-account-placeholder").ok());

/// Spend one verification's worth of Argon2 work and report no match.
///
/// Login calls this when no account has the given email, so an unknown
/// email takes as long as a wrong password.
#[must_use]
pub fn verify_dummy(password: &str) -> bool {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(hash, password);
    }
    false
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("p").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password(&hash, "p"));
        assert!(!verify_password(&hash, "P"));
    }

    #[test]
    fn test_salts_differ() {
        let a = hash_password("same password").unwrap();
        let b = hash_password("same password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_dummy_verification_does_real_work_and_never_matches() {
        let hash = DUMMY_HASH.as_deref().unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(PasswordHash::new(hash).is_ok());

        assert!(!verify_dummy("unknown-account-placeholder"));
        assert!(!verify_dummy("anything"));
    }

    #[test]
    fn test_unparsable_hash_never_matches() {
        assert!(!verify_password("", "anything"));
        assert!(!verify_password("plaintext-not-a-hash", "plaintext-not-a-hash"));
    }
}
