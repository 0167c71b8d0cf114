//! HTTP router for liftlog
//!
//! This module defines the axum router that handles all HTTP requests:
//! health, user registration, token issuance, and workout CRUD. The
//! authentication middleware is layered over every route; handlers learn
//! who is calling only through the request identity, never by parsing the
//! Authorization header themselves.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::middleware::{authenticate, logging_middleware, RequireUser};
use crate::auth::{AuthManager, PasswordCredential};
use crate::database::Database;
use crate::error::{AuthError, DbError};
use crate::models::{
    CreateWorkoutRequest, Identity, LoginRequest, NewUser, RegisterUserRequest,
    UpdateWorkoutRequest,
};

/// Username length cap, in bytes
const MAX_USERNAME_LEN: usize = 50;

/// Shared application state
pub struct AppState<D: Database> {
    /// Authentication manager
    pub auth_manager: Arc<AuthManager<D>>,

    /// Database
    pub database: Arc<D>,
}

impl<D: Database> Clone for AppState<D> {
    fn clone(&self) -> Self {
        Self {
            auth_manager: Arc::clone(&self.auth_manager),
            database: Arc::clone(&self.database),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Build the main application router
///
/// The authentication middleware wraps every route, including `/health`;
/// an unauthenticated caller simply carries the anonymous identity.
pub fn build_router<D: Database + 'static>(state: AppState<D>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/users", post(register_handler::<D>))
        .route("/token/authentication", post(login_handler::<D>))
        .route("/workouts", post(create_workout_handler::<D>))
        .route(
            "/workouts/:id",
            get(get_workout_handler::<D>)
                .put(update_workout_handler::<D>)
                .delete(delete_workout_handler::<D>),
        )
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state.auth_manager),
            authenticate::<D>,
        ))
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

/// JSON error envelope
fn error_body(message: &str) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "error": message }))
}

// =============================================================================
// Health Handler
// =============================================================================

/// Health check endpoint handler
async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// User Registration
// =============================================================================

/// Validate a registration payload, first failure wins
///
/// The messages are part of the wire contract and shown verbatim.
fn validate_registration(req: &RegisterUserRequest) -> Result<(), &'static str> {
    if req.username.is_empty() {
        return Err("Username is required");
    }
    if req.username.len() > MAX_USERNAME_LEN {
        return Err("Username cannot be greater than 50 characters");
    }
    if req.email.is_empty() {
        return Err("Email is required");
    }
    if !is_valid_email(&req.email) {
        return Err("Invalid email format");
    }
    if req.password.is_empty() {
        return Err("Password is required");
    }
    Ok(())
}

fn is_valid_email(email: &str) -> bool {
    let re = regex_lite::Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("Invalid regex pattern for email validation");
    re.is_match(email)
}

/// `POST /users` handler
async fn register_handler<D: Database + 'static>(
    State(state): State<AppState<D>>,
    payload: Result<Json<RegisterUserRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Ok(Json(req)) = payload else {
        return (StatusCode::BAD_REQUEST, error_body("Invalid request"));
    };

    if let Err(message) = validate_registration(&req) {
        return (StatusCode::BAD_REQUEST, error_body(message));
    }

    let password = match PasswordCredential::from_plaintext(&req.password) {
        Ok(password) => password,
        Err(e) => {
            tracing::error!(error = %e, "Password hashing failed during registration");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body("Internal server error"),
            );
        }
    };

    let mut new_user = NewUser::new(req.username, req.email, password);
    if let Some(bio) = req.bio {
        new_user = new_user.with_bio(bio);
    }

    match state.database.insert_user(&new_user).await {
        Ok(user) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "user": user })),
        ),
        Err(DbError::ConstraintViolation(_)) => (
            StatusCode::BAD_REQUEST,
            error_body("Username or email already taken"),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to insert user");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body("Internal server error"),
            )
        }
    }
}

// =============================================================================
// Token Issuance
// =============================================================================

/// `POST /token/authentication` handler
///
/// The success body carries the plaintext token; this is the only moment
/// it is observable.
async fn login_handler<D: Database + 'static>(
    State(state): State<AppState<D>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Ok(Json(req)) = payload else {
        return (StatusCode::BAD_REQUEST, error_body("Invalid request"));
    };

    match state.auth_manager.login(&req.username, &req.password).await {
        Ok(issued) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "auth_token": issued.token })),
        ),
        Err(AuthError::InvalidCredentials) => (
            StatusCode::UNAUTHORIZED,
            error_body("Invalid username or password"),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Token issuance failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body("Internal server error"),
            )
        }
    }
}

// =============================================================================
// Workout Handlers
// =============================================================================

/// Parse a workout id path segment
fn parse_workout_id(raw: &str) -> Result<i64, Response> {
    raw.parse().map_err(|_| {
        (StatusCode::BAD_REQUEST, error_body("Invalid workout id")).into_response()
    })
}

/// `GET /workouts/:id` handler
///
/// Lookup is owner-scoped: anonymous callers and non-owners get the same
/// 404 as a missing workout, so the route leaks no existence information.
async fn get_workout_handler<D: Database + 'static>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
    identity: Identity,
) -> Response {
    let id = match parse_workout_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.database.get_workout(id).await {
        Ok(Some(workout)) if identity.user().map(|u| u.id) == Some(workout.user_id) => (
            StatusCode::OK,
            Json(serde_json::json!({ "workout": workout })),
        )
            .into_response(),
        Ok(_) => (StatusCode::NOT_FOUND, error_body("Workout not found")).into_response(),
        Err(e) => {
            tracing::error!(error = %e, workout_id = id, "Failed to get workout");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body("Internal server error"),
            )
                .into_response()
        }
    }
}

/// `POST /workouts` handler
///
/// The owner is taken from the request identity, never from the body.
async fn create_workout_handler<D: Database + 'static>(
    State(state): State<AppState<D>>,
    RequireUser(user): RequireUser,
    payload: Result<Json<CreateWorkoutRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Ok(Json(req)) = payload else {
        return (StatusCode::BAD_REQUEST, error_body("Invalid request"));
    };

    let new_workout = req.into_new_workout(user.id);

    match state.database.insert_workout(&new_workout).await {
        Ok(workout) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "workout": workout })),
        ),
        Err(e) => {
            tracing::error!(error = %e, user_id = user.id, "Failed to create workout");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body("Failed to create workout"),
            )
        }
    }
}

/// `PUT /workouts/:id` handler
///
/// Partial update: absent fields keep their stored values; a present
/// `entries` array wholesale-replaces the stored entries.
async fn update_workout_handler<D: Database + 'static>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
    RequireUser(user): RequireUser,
    payload: Result<Json<UpdateWorkoutRequest>, JsonRejection>,
) -> Response {
    let id = match parse_workout_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let Ok(Json(req)) = payload else {
        return (StatusCode::BAD_REQUEST, error_body("Invalid request")).into_response();
    };

    let mut workout = match state.database.get_workout(id).await {
        Ok(Some(workout)) => workout,
        Ok(None) => {
            return (StatusCode::NOT_FOUND, error_body("Workout does not exist")).into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, workout_id = id, "Failed to get workout");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body("Internal server error"),
            )
                .into_response();
        }
    };

    if workout.user_id != user.id {
        return (
            StatusCode::FORBIDDEN,
            error_body("You are not authorized to update this workout"),
        )
            .into_response();
    }

    req.apply_to(&mut workout);

    match state.database.update_workout(&workout).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "workout": workout })),
        )
            .into_response(),
        Err(DbError::NotFound) => {
            (StatusCode::NOT_FOUND, error_body("Workout does not exist")).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, workout_id = id, "Failed to update workout");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body("Internal server error"),
            )
                .into_response()
        }
    }
}

/// `DELETE /workouts/:id` handler
async fn delete_workout_handler<D: Database + 'static>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
    RequireUser(user): RequireUser,
) -> Response {
    let id = match parse_workout_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let workout = match state.database.get_workout(id).await {
        Ok(Some(workout)) => workout,
        Ok(None) => {
            return (StatusCode::NOT_FOUND, error_body("Workout does not exist")).into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, workout_id = id, "Failed to get workout");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body("Internal server error"),
            )
                .into_response();
        }
    };

    if workout.user_id != user.id {
        return (
            StatusCode::FORBIDDEN,
            error_body("You are not authorized to delete this workout"),
        )
            .into_response();
    }

    match state.database.delete_workout(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(DbError::NotFound) => {
            (StatusCode::NOT_FOUND, error_body("Workout does not exist")).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, workout_id = id, "Failed to delete workout");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body("Internal server error"),
            )
                .into_response()
        }
    }
}
