//! Authentication manager
//!
//! This module provides the main authentication interface for the application.
//! It handles credential checks, token issuance, token resolution, and expired
//! token cleanup.

use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::database::Database;
use crate::error::AuthError;
use crate::models::{IssuedToken, Token, TokenScope, User};

use super::token::{digest_token, generate_token, is_valid_token_format};

/// Configuration for the authentication manager
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// How long issued auth tokens stay valid
    pub token_ttl: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_ttl: Duration::hours(24),
        }
    }
}

/// Authentication manager
///
/// Provides methods for exchanging credentials for tokens and resolving
/// presented tokens back to their owning user.
pub struct AuthManager<D: Database> {
    db: Arc<D>,
    config: AuthConfig,
}

impl<D: Database> AuthManager<D> {
    /// Create a new authentication manager
    pub fn new(db: Arc<D>, config: AuthConfig) -> Self {
        Self { db, config }
    }

    /// Exchange a username and password for a fresh auth-scope token
    ///
    /// Credential failures are indistinguishable on purpose: an unknown
    /// username, a wrong password, and a storage failure during lookup all
    /// answer `InvalidCredentials`. Only the hashing primitive and token
    /// persistence surface their own errors.
    pub async fn login(&self, username: &str, password: &str) -> Result<IssuedToken, AuthError> {
        let user = match self.db.get_user_by_username(username).await {
            Ok(Some(user)) => user,
            Ok(None) => return Err(AuthError::InvalidCredentials),
            Err(e) => {
                // Fail closed; the caller only learns "invalid credentials"
                tracing::error!(error = %e, "User lookup failed during login");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !user.password.matches(password)? {
            return Err(AuthError::InvalidCredentials);
        }

        self.issue_token(user.id, self.config.token_ttl, TokenScope::Auth)
            .await
    }

    /// Issue a new token for a user
    ///
    /// Persists only the digest. The returned plaintext is observable here
    /// and nowhere else.
    pub async fn issue_token(
        &self,
        user_id: i64,
        ttl: Duration,
        scope: TokenScope,
    ) -> Result<IssuedToken, AuthError> {
        let plaintext = generate_token();
        let expires_at = Utc::now() + ttl;
        let token = Token::new(digest_token(&plaintext), user_id, scope, expires_at);

        self.db.insert_token(&token).await?;

        Ok(IssuedToken {
            token: plaintext,
            expires_at,
        })
    }

    /// Resolve a presented token to its owning user
    ///
    /// Recomputes the digest and looks it up for the given scope against the
    /// read-time clock. An unknown, expired, or wrong-scope token is
    /// `Ok(None)`; only a storage failure is an error.
    pub async fn resolve_token(
        &self,
        scope: TokenScope,
        plaintext: &str,
    ) -> Result<Option<User>, AuthError> {
        // Malformed tokens cannot exist in storage; skip the lookup
        if !is_valid_token_format(plaintext) {
            return Ok(None);
        }

        let digest = digest_token(plaintext);
        let user = self
            .db
            .get_user_by_token_digest(scope, &digest, Utc::now())
            .await?;

        Ok(user)
    }

    /// Delete token rows whose expiry has passed
    ///
    /// Lookup already treats expired tokens as absent; this only bounds
    /// storage growth. Returns the number of rows removed.
    pub async fn purge_expired(&self) -> Result<u64, AuthError> {
        let removed = self.db.delete_expired_tokens(Utc::now()).await?;
        Ok(removed)
    }
}
