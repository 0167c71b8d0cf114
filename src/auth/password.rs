//! Password hashing and verification
//!
//! Uses the Argon2id variant with default parameters. Hashes are stored in
//! PHC string format, salt included.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::HashError;

/// A user's password credential
///
/// Holds only the one-way hash; the plaintext exists solely during
/// [`PasswordCredential::from_plaintext`] and is never retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordCredential {
    hash: String,
}

impl PasswordCredential {
    /// Hash a plaintext password into a new credential
    pub fn from_plaintext(plaintext: &str) -> Result<Self, HashError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| HashError::HashFailed(e.to_string()))?;

        Ok(Self {
            hash: hash.to_string(),
        })
    }

    /// Wrap a hash loaded from storage
    pub fn from_hash(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }

    /// Verify a candidate password against the stored hash
    ///
    /// Comparison happens inside the Argon2 verifier, which is constant-time
    /// with respect to the candidate. Returns an error only when the stored
    /// hash itself cannot be parsed.
    pub fn matches(&self, candidate: &str) -> Result<bool, HashError> {
        let parsed_hash =
            PasswordHash::new(&self.hash).map_err(|e| HashError::MalformedHash(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// The PHC-format hash string, for persistence
    pub fn as_hash(&self) -> &str {
        &self.hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test 1: hashing then matching the same password succeeds
    #[test]
    fn test_from_plaintext_then_matches() {
        let credential = PasswordCredential::from_plaintext("secret123").unwrap();

        assert!(credential.matches("secret123").unwrap());
    }

    // Test 2: a different password does not match
    #[test]
    fn test_matches_rejects_wrong_password() {
        let credential = PasswordCredential::from_plaintext("secret123").unwrap();

        assert!(!credential.matches("secret124").unwrap());
        assert!(!credential.matches("").unwrap());
    }

    // Test 3: hashes are salted, so the same password hashes differently
    #[test]
    fn test_same_password_different_hashes() {
        let first = PasswordCredential::from_plaintext("same-password").unwrap();
        let second = PasswordCredential::from_plaintext("same-password").unwrap();

        assert_ne!(first.as_hash(), second.as_hash());
        assert!(first.matches("same-password").unwrap());
        assert!(second.matches("same-password").unwrap());
    }

    // Test 4: the stored hash is in Argon2id PHC format
    #[test]
    fn test_hash_is_phc_argon2id() {
        let credential = PasswordCredential::from_plaintext("secret123").unwrap();

        assert!(credential.as_hash().starts_with("$argon2id$"));
        assert!(!credential.as_hash().is_empty());
    }

    // Test 5: a malformed stored hash is an error, not a mismatch
    #[test]
    fn test_matches_malformed_hash_errors() {
        let credential = PasswordCredential::from_hash("not-a-valid-hash");

        match credential.matches("anything") {
            Err(HashError::MalformedHash(_)) => (),
            other => panic!("Expected HashError::MalformedHash, got {other:?}"),
        }
    }

    // Test 6: a credential rehydrated from its hash still verifies
    #[test]
    fn test_from_hash_round_trip() {
        let original = PasswordCredential::from_plaintext("secret123").unwrap();
        let rehydrated = PasswordCredential::from_hash(original.as_hash());

        assert!(rehydrated.matches("secret123").unwrap());
        assert!(!rehydrated.matches("wrong").unwrap());
    }
}
