//! Database layer for liftlog
//!
//! This module defines the database trait and SQLite implementation.

pub mod migrations;
pub mod sqlite;

pub use sqlite::SqliteDatabase;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::DbError;
use crate::models::{NewUser, NewWorkout, Token, TokenScope, User, Workout};

/// Database trait for data persistence
///
/// This trait defines all database operations needed by the application.
/// It uses `async_trait` for async methods and `mockall::automock` for testing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Database: Send + Sync {
    // =========================================================================
    // User operations
    // =========================================================================

    /// Insert a new user record
    ///
    /// Returns the stored user with its assigned ID. Duplicate usernames or
    /// emails surface as `DbError::ConstraintViolation`.
    async fn insert_user(&self, user: &NewUser) -> Result<User, DbError>;

    /// Get a user by username
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, DbError>;

    // =========================================================================
    // Token operations
    // =========================================================================

    /// Insert a token row keyed by its digest
    async fn insert_token(&self, token: &Token) -> Result<(), DbError>;

    /// Resolve a token digest to its owning user
    ///
    /// Returns None when no row matches the digest, the row's scope differs,
    /// or the row's expiry is at or before `now`. All three cases are
    /// indistinguishable to the caller on purpose.
    async fn get_user_by_token_digest(
        &self,
        scope: TokenScope,
        digest: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, DbError>;

    /// Delete token rows whose expiry is at or before `now`
    ///
    /// Returns the number of deleted rows
    async fn delete_expired_tokens(&self, now: DateTime<Utc>) -> Result<u64, DbError>;

    // =========================================================================
    // Workout operations
    // =========================================================================

    /// Insert a workout with its entries
    ///
    /// Returns the stored workout with assigned IDs
    async fn insert_workout(&self, workout: &NewWorkout) -> Result<Workout, DbError>;

    /// Get a workout by ID, entries ordered by their order index
    async fn get_workout(&self, id: i64) -> Result<Option<Workout>, DbError>;

    /// Update a workout, replacing its entries wholesale
    async fn update_workout(&self, workout: &Workout) -> Result<(), DbError>;

    /// Delete a workout by ID, entries are removed with it
    async fn delete_workout(&self, id: i64) -> Result<(), DbError>;
}
