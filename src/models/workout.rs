//! Workout domain models
//!
//! This module defines workout records, their exercise entries, and the
//! request payloads for creating and updating them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Workout record owned by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    /// Unique workout ID
    pub id: i64,

    /// Owning user
    pub user_id: i64,

    /// Workout title
    pub title: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Total duration in minutes
    pub duration_minutes: i64,

    /// Estimated calories burned
    pub calories_burned: i64,

    /// Exercise entries, ordered by `order_index`
    pub entries: Vec<WorkoutEntry>,

    /// When the workout was created
    pub created_at: DateTime<Utc>,

    /// When the workout was last updated
    pub updated_at: DateTime<Utc>,
}

/// Single exercise entry within a workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutEntry {
    /// Unique entry ID, assigned at insert
    #[serde(default)]
    pub id: i64,

    /// Exercise name
    pub exercise_name: String,

    /// Number of sets performed
    pub sets: i64,

    /// Repetitions per set, for rep-based exercises
    #[serde(default)]
    pub reps: Option<i64>,

    /// Duration in seconds, for time-based exercises
    #[serde(default)]
    pub duration_seconds: Option<i64>,

    /// Weight used, if any
    #[serde(default)]
    pub weight: Option<f64>,

    /// Optional notes
    #[serde(default)]
    pub notes: Option<String>,

    /// Position of this entry within its workout
    #[serde(default)]
    pub order_index: i64,
}

/// A workout ready to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkout {
    /// Owning user, taken from the request identity
    pub user_id: i64,

    /// Workout title
    pub title: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Total duration in minutes
    pub duration_minutes: i64,

    /// Estimated calories burned
    pub calories_burned: i64,

    /// Exercise entries
    pub entries: Vec<WorkoutEntry>,
}

/// Workout creation payload
///
/// Missing fields decode to their empty values, matching the permissive
/// decode-then-store behavior of the create flow.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateWorkoutRequest {
    /// Workout title
    #[serde(default)]
    pub title: String,

    /// Optional free-form description
    #[serde(default)]
    pub description: Option<String>,

    /// Total duration in minutes
    #[serde(default)]
    pub duration_minutes: i64,

    /// Estimated calories burned
    #[serde(default)]
    pub calories_burned: i64,

    /// Exercise entries
    #[serde(default)]
    pub entries: Vec<WorkoutEntry>,
}

impl CreateWorkoutRequest {
    /// Turn the payload into an insertable record owned by `user_id`
    ///
    /// The owner always comes from the request identity, never from the
    /// payload.
    pub fn into_new_workout(self, user_id: i64) -> NewWorkout {
        NewWorkout {
            user_id,
            title: self.title,
            description: self.description,
            duration_minutes: self.duration_minutes,
            calories_burned: self.calories_burned,
            entries: self.entries,
        }
    }
}

/// Partial workout update payload
///
/// Absent fields keep their stored values; a present `entries` array
/// wholesale-replaces the stored entries.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpdateWorkoutRequest {
    /// New title, if present
    #[serde(default)]
    pub title: Option<String>,

    /// New description, if present
    #[serde(default)]
    pub description: Option<String>,

    /// New duration, if present
    #[serde(default)]
    pub duration_minutes: Option<i64>,

    /// New calories estimate, if present
    #[serde(default)]
    pub calories_burned: Option<i64>,

    /// Replacement entries, if present
    #[serde(default)]
    pub entries: Option<Vec<WorkoutEntry>>,
}

impl UpdateWorkoutRequest {
    /// Overlay the present fields onto an existing workout
    pub fn apply_to(self, workout: &mut Workout) {
        if let Some(title) = self.title {
            workout.title = title;
        }
        if let Some(description) = self.description {
            workout.description = Some(description);
        }
        if let Some(duration_minutes) = self.duration_minutes {
            workout.duration_minutes = duration_minutes;
        }
        if let Some(calories_burned) = self.calories_burned {
            workout.calories_burned = calories_burned;
        }
        if let Some(entries) = self.entries {
            workout.entries = entries;
        }
    }
}
