//! Domain models for liftlog
//!
//! This module contains the core domain models used throughout the application.

pub mod token;
pub mod user;
pub mod workout;

// Re-export commonly used types
pub use token::{IssuedToken, LoginRequest, Token, TokenScope};
pub use user::{Identity, NewUser, RegisterUserRequest, User};
pub use workout::{
    CreateWorkoutRequest, NewWorkout, UpdateWorkoutRequest, Workout, WorkoutEntry,
};
