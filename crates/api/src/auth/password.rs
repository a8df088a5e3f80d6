//! Argon2id password hashing and verification.
//!
//! All password hashes use the Argon2id variant with a random salt from
//! [`OsRng`]. Hashes are stored in PHC string format so the algorithm
//! parameters and salt travel with the hash.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Hash a plaintext password using Argon2id with a random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC-formatted hash.
///
/// Returns `Ok(false)` on mismatch; `Err` only for a malformed stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("hunter22").expect("hashing should succeed");
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("hunter22", &hash).expect("verify should succeed"));
    }

    #[test]
    fn wrong_password_does_not_verify() {
        let hash = hash_password("hunter22").expect("hashing should succeed");
        assert!(!verify_password("hunter23", &hash).expect("verify should succeed"));
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("hunter22", "not-a-phc-string").is_err());
    }
}
