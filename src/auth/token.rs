//! Token generation and digesting
//!
//! This module provides functions for generating and digesting bearer tokens.
//! Tokens use the `ll_` prefix followed by 32 bytes of random data encoded in
//! URL-safe Base64. Only a SHA-256 digest of the full token is ever persisted;
//! the digest doubles as the storage lookup key.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

/// Token prefix for liftlog bearer tokens
pub const TOKEN_PREFIX: &str = "ll_";

/// Length of the random part of the token in bytes
const TOKEN_RANDOM_BYTES: usize = 32;

/// Generate a new bearer token
///
/// The token format is: `ll_` + Base64-encoded 32 random bytes.
/// The plaintext should be shown to the caller only once at creation time.
///
/// # Example
///
/// ```
/// use liftlog::auth::token::generate_token;
///
/// let token = generate_token();
/// assert!(token.starts_with("ll_"));
/// ```
pub fn generate_token() -> String {
    let mut random_bytes = [0u8; TOKEN_RANDOM_BYTES];
    getrandom(&mut random_bytes);

    let encoded = URL_SAFE_NO_PAD.encode(random_bytes);
    format!("{}{}", TOKEN_PREFIX, encoded)
}

/// Fill a byte slice with random bytes using OsRng
fn getrandom(dest: &mut [u8]) {
    use rand::RngCore;
    OsRng.fill_bytes(dest);
}

/// Compute the storage digest of a token
///
/// SHA-256 of the full plaintext, Base64-encoded. The token already carries
/// 32 bytes of entropy, so a deterministic digest is sufficient at rest; a
/// cost-factor hash would add nothing but latency to every authenticated
/// request.
///
/// # Example
///
/// ```
/// use liftlog::auth::token::{digest_token, generate_token};
///
/// let token = generate_token();
/// assert_eq!(digest_token(&token), digest_token(&token));
/// ```
pub fn digest_token(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    URL_SAFE_NO_PAD.encode(digest)
}

/// Check if a token has the correct format
///
/// Valid tokens start with `ll_` and have a base64-encoded body.
///
/// # Arguments
///
/// * `token` - The token to validate
///
/// # Returns
///
/// `true` if the token format is valid, `false` otherwise
pub fn is_valid_token_format(token: &str) -> bool {
    if !token.starts_with(TOKEN_PREFIX) {
        return false;
    }

    let body = &token[TOKEN_PREFIX.len()..];
    if body.is_empty() {
        return false;
    }

    // Check if the body is valid URL-safe Base64
    URL_SAFE_NO_PAD.decode(body).is_ok()
}
