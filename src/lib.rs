//! liftlog - A workout tracking service with token-based authentication
//!
//! This crate provides an HTTP service for recording workouts: users register,
//! exchange their credentials for a bearer token, and manage their own workout
//! log. All ownership checks hang off the identity attached by the
//! authentication middleware.

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod models;
pub mod server;
