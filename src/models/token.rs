//! Token domain models
//!
//! This module defines the persisted token record, the one-time issuance
//! result, and the scope tag restricting what a token may be used for.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Scope restricting the operations a token authorizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenScope {
    /// Request authentication
    Auth,
    /// Password reset flows, reserved for future use
    PasswordReset,
}

impl TokenScope {
    /// Storage representation of the scope
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenScope::Auth => "auth",
            TokenScope::PasswordReset => "password_reset",
        }
    }
}

impl std::fmt::Display for TokenScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Bearer token record as persisted by the token store
///
/// Only the digest of the plaintext is ever stored; the digest doubles as
/// the lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// SHA-256 digest of the plaintext value, unique in storage
    pub digest: String,

    /// Owning user
    pub user_id: i64,

    /// What the token may be used for
    pub scope: TokenScope,

    /// When the token stops being valid
    pub expires_at: DateTime<Utc>,
}

impl Token {
    /// Create a new token record
    pub fn new(
        digest: impl Into<String>,
        user_id: i64,
        scope: TokenScope,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            digest: digest.into(),
            user_id,
            scope,
            expires_at,
        }
    }

    /// Check whether the token is valid for `scope` at `now`
    ///
    /// A token whose expiry has passed is indistinguishable from one that
    /// never existed; the comparison always uses the caller's read-time
    /// clock, never a cached value.
    pub fn is_valid(&self, scope: TokenScope, now: DateTime<Utc>) -> bool {
        self.scope == scope && now < self.expires_at
    }
}

/// A freshly issued token
///
/// Carries the plaintext bearer value, observable only at this moment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedToken {
    /// Raw bearer value handed to the caller exactly once
    pub token: String,

    /// When the token expires
    pub expires_at: DateTime<Utc>,
}

/// Credentials presented to obtain a token
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    /// Account username
    #[serde(default)]
    pub username: String,

    /// Account password
    #[serde(default)]
    pub password: String,
}
