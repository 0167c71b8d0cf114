//! Authentication for liftlog
//!
//! This module provides password hashing, bearer token primitives, the
//! authentication manager, and the expired-token purge task.

pub mod manager;
pub mod password;
pub mod purge;
pub mod token;

// Re-export commonly used types
pub use manager::{AuthConfig, AuthManager};
pub use password::PasswordCredential;
pub use purge::TokenPurger;
