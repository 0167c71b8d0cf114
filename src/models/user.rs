//! User domain models
//!
//! This module defines the registered user account and the per-request
//! identity attached by the authentication middleware.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::password::PasswordCredential;

/// Registered user account
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    /// Unique user ID, assigned at creation
    pub id: i64,

    /// Unique username, at most 50 characters
    pub username: String,

    /// Unique email address
    pub email: String,

    /// Stored password credential, never serialized
    #[serde(skip_serializing)]
    pub password: PasswordCredential,

    /// Optional profile text
    pub bio: Option<String>,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// A user account ready to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    /// Requested username
    pub username: String,

    /// Email address
    pub email: String,

    /// Already-hashed password credential
    pub password: PasswordCredential,

    /// Optional profile text
    pub bio: Option<String>,
}

impl NewUser {
    /// Create a new user record from validated registration input
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: PasswordCredential,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password,
            bio: None,
        }
    }

    /// Set the profile text
    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = Some(bio.into());
        self
    }
}

/// Identity resolved for one request
///
/// The authentication middleware attaches exactly one of these to every
/// request; there is no "unset" state downstream.
#[derive(Debug, Clone, PartialEq)]
pub enum Identity {
    /// No authenticated caller
    Anonymous,

    /// Caller proved ownership of a valid bearer token
    Authenticated(User),
}

impl Identity {
    /// The authenticated user, if any
    pub fn user(&self) -> Option<&User> {
        match self {
            Identity::Authenticated(user) => Some(user),
            Identity::Anonymous => None,
        }
    }

    /// Whether the request carries no authenticated caller
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Identity::Anonymous)
    }
}

/// Registration request payload
///
/// Missing fields decode to their empty values so validation can answer
/// with a field-specific message instead of a decode error.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RegisterUserRequest {
    /// Requested username
    #[serde(default)]
    pub username: String,

    /// Email address
    #[serde(default)]
    pub email: String,

    /// Plaintext password, hashed before storage
    #[serde(default)]
    pub password: String,

    /// Optional profile text
    #[serde(default)]
    pub bio: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 1,
            username: "alice".to_string(),
            email: "a@example.com".to_string(),
            password: PasswordCredential::from_hash("$argon2id$stub"),
            bio: Some("lifter".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_user_serialization_omits_password() {
        let user = sample_user();
        let json = serde_json::to_string(&user).unwrap();

        assert!(json.contains("\"username\":\"alice\""));
        assert!(!json.contains("password"));
        assert!(!json.contains("argon2id"));
    }

    #[test]
    fn test_new_user_builder() {
        let new_user = NewUser::new(
            "bob",
            "b@example.com",
            PasswordCredential::from_hash("$argon2id$stub"),
        )
        .with_bio("runner");

        assert_eq!(new_user.username, "bob");
        assert_eq!(new_user.email, "b@example.com");
        assert_eq!(new_user.bio, Some("runner".to_string()));
    }

    #[test]
    fn test_identity_anonymous() {
        let identity = Identity::Anonymous;

        assert!(identity.is_anonymous());
        assert!(identity.user().is_none());
    }

    #[test]
    fn test_identity_authenticated() {
        let user = sample_user();
        let identity = Identity::Authenticated(user.clone());

        assert!(!identity.is_anonymous());
        assert_eq!(identity.user(), Some(&user));
    }

    #[test]
    fn test_register_request_missing_fields_decode_empty() {
        let req: RegisterUserRequest = serde_json::from_str(r#"{"username": "carol"}"#).unwrap();

        assert_eq!(req.username, "carol");
        assert_eq!(req.email, "");
        assert_eq!(req.password, "");
        assert_eq!(req.bio, None);
    }
}
