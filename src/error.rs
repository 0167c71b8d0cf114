//! Application error types for liftlog
//!
//! This module defines common error types used throughout the application.
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Credential hashing errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HashError {
    /// Hashing primitive failed
    #[error("Hashing failed: {0}")]
    HashFailed(String),

    /// Stored hash is malformed or corrupt
    #[error("Malformed credential hash: {0}")]
    MalformedHash(String),
}

/// Database-related errors
#[derive(Debug, Error)]
pub enum DbError {
    /// SQLite error
    #[error("Database error: {0}")]
    Sqlite(rusqlite::Error),

    /// Async connection bridge error
    #[error("Database connection error: {0}")]
    Connection(String),

    /// Record not found
    #[error("Record not found")]
    NotFound,

    /// Constraint violation
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),
}

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            // Surface UNIQUE/FOREIGN KEY failures so handlers can answer 4xx
            rusqlite::Error::SqliteFailure(e, msg)
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                DbError::ConstraintViolation(msg.unwrap_or_else(|| e.to_string()))
            }
            other => DbError::Sqlite(other),
        }
    }
}

impl From<tokio_rusqlite::Error> for DbError {
    fn from(err: tokio_rusqlite::Error) -> Self {
        match err {
            tokio_rusqlite::Error::Rusqlite(e) => e.into(),
            other => DbError::Connection(other.to_string()),
        }
    }
}

/// Authentication-related errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// Username unknown or password mismatch
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Credential hashing failed
    #[error("Credential hash error: {0}")]
    Hash(#[from] HashError),

    /// Storage failure during an auth operation
    #[error("Auth storage error: {0}")]
    Database(#[from] DbError),
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test 1: HashError message formatting
    #[test]
    fn test_hash_error_messages() {
        assert_eq!(
            HashError::HashFailed("salt too short".to_string()).to_string(),
            "Hashing failed: salt too short"
        );
        assert_eq!(
            HashError::MalformedHash("not phc".to_string()).to_string(),
            "Malformed credential hash: not phc"
        );
    }

    // Test 2: DbError message formatting
    #[test]
    fn test_db_error_messages() {
        assert_eq!(DbError::NotFound.to_string(), "Record not found");
        assert_eq!(
            DbError::ConstraintViolation("unique".to_string()).to_string(),
            "Constraint violation: unique"
        );
        assert_eq!(
            DbError::Connection("closed".to_string()).to_string(),
            "Database connection error: closed"
        );
        assert_eq!(
            DbError::Migration("v2 failed".to_string()).to_string(),
            "Migration error: v2 failed"
        );
    }

    // Test 3: DbError from plain rusqlite::Error
    #[test]
    fn test_db_error_from_sqlite() {
        let sqlite_err = rusqlite::Error::InvalidParameterName("test".to_string());
        let db_err: DbError = sqlite_err.into();

        match db_err {
            DbError::Sqlite(_) => (),
            _ => panic!("Expected DbError::Sqlite"),
        }
    }

    // Test 4: DbError maps constraint failures to ConstraintViolation
    #[test]
    fn test_db_error_from_constraint_failure() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (v TEXT UNIQUE); INSERT INTO t VALUES ('a');")
            .unwrap();

        let sqlite_err = conn
            .execute("INSERT INTO t VALUES ('a')", [])
            .expect_err("duplicate insert should fail");
        let db_err: DbError = sqlite_err.into();

        match db_err {
            DbError::ConstraintViolation(_) => (),
            other => panic!("Expected DbError::ConstraintViolation, got {other:?}"),
        }
    }

    // Test 5: DbError from the async bridge error wraps the inner sqlite error
    #[test]
    fn test_db_error_from_tokio_rusqlite() {
        let inner = rusqlite::Error::InvalidQuery;
        let bridge_err = tokio_rusqlite::Error::Rusqlite(inner);
        let db_err: DbError = bridge_err.into();

        match db_err {
            DbError::Sqlite(rusqlite::Error::InvalidQuery) => (),
            other => panic!("Expected DbError::Sqlite, got {other:?}"),
        }
    }

    // Test 6: AuthError from HashError
    #[test]
    fn test_auth_error_from_hash_error() {
        let hash_err = HashError::MalformedHash("truncated".to_string());
        let auth_err: AuthError = hash_err.into();

        match auth_err {
            AuthError::Hash(HashError::MalformedHash(msg)) => {
                assert_eq!(msg, "truncated");
            }
            _ => panic!("Expected AuthError::Hash"),
        }
    }

    // Test 7: AuthError from DbError
    #[test]
    fn test_auth_error_from_db_error() {
        let db_err = DbError::NotFound;
        let auth_err: AuthError = db_err.into();

        match auth_err {
            AuthError::Database(DbError::NotFound) => (),
            _ => panic!("Expected AuthError::Database"),
        }
    }

    // Test 8: AuthError display includes source error
    #[test]
    fn test_auth_error_display() {
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "Invalid username or password"
        );

        let auth_err = AuthError::Database(DbError::NotFound);
        assert_eq!(auth_err.to_string(), "Auth storage error: Record not found");
    }
}
