//! SQLite implementation of the Database trait
//!
//! This module provides a SQLite-based implementation of the Database trait
//! using rusqlite and tokio-rusqlite for async operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension;
use tokio_rusqlite::Connection;

use super::migrations::CREATE_SCHEMA;
use super::Database;
use crate::auth::PasswordCredential;
use crate::error::DbError;
use crate::models::{NewUser, NewWorkout, Token, TokenScope, User, Workout, WorkoutEntry};

/// SQLite database implementation
///
/// All operations run on a single serialized connection behind an async
/// bridge; the connection is the sole serialization point between requests.
pub struct SqliteDatabase {
    conn: Connection,
}

impl SqliteDatabase {
    /// Create a new SQLite database connection
    ///
    /// Use `:memory:` for in-memory database or a file path for persistent storage.
    pub async fn new(path: &str) -> Result<Self, DbError> {
        let conn = Connection::open(path).await?;

        // Run migrations
        conn.call(|conn| {
            conn.execute_batch(CREATE_SCHEMA)?;
            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }

    /// Create a new in-memory database (useful for testing)
    pub async fn in_memory() -> Result<Self, DbError> {
        Self::new(":memory:").await
    }
}

#[async_trait]
impl Database for SqliteDatabase {
    // =========================================================================
    // User operations
    // =========================================================================

    async fn insert_user(&self, user: &NewUser) -> Result<User, DbError> {
        let username = user.username.clone();
        let email = user.email.clone();
        let password_hash = user.password.as_hash().to_string();
        let bio = user.bio.clone();
        let now = Utc::now();
        let now_str = now.to_rfc3339();

        self.conn
            .call(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO users (username, email, password_hash, bio, created_at, updated_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?5)
                    "#,
                    rusqlite::params![username, email, password_hash, bio, now_str],
                )?;
                let id = conn.last_insert_rowid();

                Ok(User {
                    id,
                    username,
                    email,
                    password: PasswordCredential::from_hash(password_hash),
                    bio,
                    created_at: now,
                    updated_at: now,
                })
            })
            .await
            .map_err(Into::into)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, DbError> {
        let username = username.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT id, username, email, password_hash, bio, created_at, updated_at
                    FROM users
                    WHERE username = ?1
                    "#,
                )?;

                let result = stmt.query_row([&username], user_from_row).optional()?;

                Ok(result)
            })
            .await
            .map_err(Into::into)
    }

    // =========================================================================
    // Token operations
    // =========================================================================

    async fn insert_token(&self, token: &Token) -> Result<(), DbError> {
        let digest = token.digest.clone();
        let user_id = token.user_id;
        let scope = token.scope.as_str();
        let expires_at = token.expires_at.to_rfc3339();

        self.conn
            .call(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO tokens (digest, user_id, scope, expires_at)
                    VALUES (?1, ?2, ?3, ?4)
                    "#,
                    rusqlite::params![digest, user_id, scope, expires_at],
                )?;
                Ok(())
            })
            .await?;

        Ok(())
    }

    async fn get_user_by_token_digest(
        &self,
        scope: TokenScope,
        digest: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, DbError> {
        let digest = digest.to_string();
        let scope = scope.as_str();
        // Expiry is compared against the caller's read-time clock; stored
        // RFC 3339 UTC strings order lexicographically.
        let now = now.to_rfc3339();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT u.id, u.username, u.email, u.password_hash, u.bio, u.created_at, u.updated_at
                    FROM tokens t
                    JOIN users u ON u.id = t.user_id
                    WHERE t.digest = ?1 AND t.scope = ?2 AND t.expires_at > ?3
                    "#,
                )?;

                let result = stmt
                    .query_row(rusqlite::params![digest, scope, now], user_from_row)
                    .optional()?;

                Ok(result)
            })
            .await
            .map_err(Into::into)
    }

    async fn delete_expired_tokens(&self, now: DateTime<Utc>) -> Result<u64, DbError> {
        let now = now.to_rfc3339();

        self.conn
            .call(move |conn| {
                let count = conn.execute("DELETE FROM tokens WHERE expires_at <= ?1", [&now])?;
                Ok(count as u64)
            })
            .await
            .map_err(Into::into)
    }

    // =========================================================================
    // Workout operations
    // =========================================================================

    async fn insert_workout(&self, workout: &NewWorkout) -> Result<Workout, DbError> {
        let user_id = workout.user_id;
        let title = workout.title.clone();
        let description = workout.description.clone();
        let duration_minutes = workout.duration_minutes;
        let calories_burned = workout.calories_burned;
        let entries = workout.entries.clone();
        let now = Utc::now();
        let now_str = now.to_rfc3339();

        self.conn
            .call(move |conn| {
                let tx = conn.transaction()?;

                tx.execute(
                    r#"
                    INSERT INTO workouts
                    (user_id, title, description, duration_minutes, calories_burned, created_at, updated_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
                    "#,
                    rusqlite::params![
                        user_id,
                        title,
                        description,
                        duration_minutes,
                        calories_burned,
                        now_str
                    ],
                )?;
                let workout_id = tx.last_insert_rowid();

                let stored_entries = insert_entries(&tx, workout_id, &entries)?;

                tx.commit()?;

                Ok(Workout {
                    id: workout_id,
                    user_id,
                    title,
                    description,
                    duration_minutes,
                    calories_burned,
                    entries: stored_entries,
                    created_at: now,
                    updated_at: now,
                })
            })
            .await
            .map_err(Into::into)
    }

    async fn get_workout(&self, id: i64) -> Result<Option<Workout>, DbError> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT id, user_id, title, description, duration_minutes, calories_burned,
                           created_at, updated_at
                    FROM workouts
                    WHERE id = ?1
                    "#,
                )?;

                let workout = stmt
                    .query_row([id], |row| {
                        Ok(Workout {
                            id: row.get(0)?,
                            user_id: row.get(1)?,
                            title: row.get(2)?,
                            description: row.get(3)?,
                            duration_minutes: row.get(4)?,
                            calories_burned: row.get(5)?,
                            entries: vec![],
                            created_at: parse_datetime(row.get::<_, Option<String>>(6)?)
                                .unwrap_or_else(Utc::now),
                            updated_at: parse_datetime(row.get::<_, Option<String>>(7)?)
                                .unwrap_or_else(Utc::now),
                        })
                    })
                    .optional()?;

                let Some(mut workout) = workout else {
                    return Ok(None);
                };

                let mut stmt = conn.prepare(
                    r#"
                    SELECT id, exercise_name, sets, reps, duration_seconds, weight, notes, order_index
                    FROM workout_entries
                    WHERE workout_id = ?1
                    ORDER BY order_index
                    "#,
                )?;

                workout.entries = stmt
                    .query_map([id], |row| {
                        Ok(WorkoutEntry {
                            id: row.get(0)?,
                            exercise_name: row.get(1)?,
                            sets: row.get(2)?,
                            reps: row.get(3)?,
                            duration_seconds: row.get(4)?,
                            weight: row.get(5)?,
                            notes: row.get(6)?,
                            order_index: row.get(7)?,
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(Some(workout))
            })
            .await
            .map_err(Into::into)
    }

    async fn update_workout(&self, workout: &Workout) -> Result<(), DbError> {
        let id = workout.id;
        let title = workout.title.clone();
        let description = workout.description.clone();
        let duration_minutes = workout.duration_minutes;
        let calories_burned = workout.calories_burned;
        let entries = workout.entries.clone();
        let updated_at = Utc::now().to_rfc3339();

        let rows_affected = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;

                let count = tx.execute(
                    r#"
                    UPDATE workouts
                    SET title = ?1, description = ?2, duration_minutes = ?3,
                        calories_burned = ?4, updated_at = ?5
                    WHERE id = ?6
                    "#,
                    rusqlite::params![
                        title,
                        description,
                        duration_minutes,
                        calories_burned,
                        updated_at,
                        id
                    ],
                )?;

                // Entries are replaced wholesale
                tx.execute("DELETE FROM workout_entries WHERE workout_id = ?1", [id])?;
                insert_entries(&tx, id, &entries)?;

                tx.commit()?;
                Ok(count)
            })
            .await?;

        if rows_affected == 0 {
            return Err(DbError::NotFound);
        }

        Ok(())
    }

    async fn delete_workout(&self, id: i64) -> Result<(), DbError> {
        let rows_affected = self
            .conn
            .call(move |conn| {
                let count = conn.execute("DELETE FROM workouts WHERE id = ?1", [id])?;
                Ok(count)
            })
            .await?;

        if rows_affected == 0 {
            return Err(DbError::NotFound);
        }

        Ok(())
    }
}

/// Map a user row in `SELECT id, username, email, password_hash, bio,
/// created_at, updated_at` order
fn user_from_row(row: &rusqlite::Row<'_>) -> Result<User, rusqlite::Error> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password: PasswordCredential::from_hash(row.get::<_, String>(3)?),
        bio: row.get(4)?,
        created_at: parse_datetime(row.get::<_, Option<String>>(5)?).unwrap_or_else(Utc::now),
        updated_at: parse_datetime(row.get::<_, Option<String>>(6)?).unwrap_or_else(Utc::now),
    })
}

/// Insert workout entries, re-indexed by their position
fn insert_entries(
    tx: &rusqlite::Transaction<'_>,
    workout_id: i64,
    entries: &[WorkoutEntry],
) -> Result<Vec<WorkoutEntry>, rusqlite::Error> {
    let mut stored = Vec::with_capacity(entries.len());

    for (index, entry) in entries.iter().enumerate() {
        tx.execute(
            r#"
            INSERT INTO workout_entries
            (workout_id, exercise_name, sets, reps, duration_seconds, weight, notes, order_index)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            rusqlite::params![
                workout_id,
                entry.exercise_name,
                entry.sets,
                entry.reps,
                entry.duration_seconds,
                entry.weight,
                entry.notes,
                index as i64
            ],
        )?;

        stored.push(WorkoutEntry {
            id: tx.last_insert_rowid(),
            order_index: index as i64,
            ..entry.clone()
        });
    }

    Ok(stored)
}

/// Parse a datetime string to DateTime<Utc>
fn parse_datetime(s: Option<String>) -> Option<DateTime<Utc>> {
    s.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|| {
                // Try parsing SQLite's datetime format
                chrono::NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S")
                    .ok()
                    .map(|dt| dt.and_utc())
            })
    })
}
