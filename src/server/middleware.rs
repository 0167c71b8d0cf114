//! HTTP middleware for liftlog
//!
//! This module provides the authentication middleware, the request identity
//! extractors, and the request logging middleware.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Instant;

use crate::auth::AuthManager;
use crate::database::Database;
use crate::models::{Identity, TokenScope, User};

/// Authentication middleware function
///
/// Runs on every request, single pass:
/// 1. No Authorization header: the anonymous identity is attached and the
///    request proceeds. Downstream gates decide whether that is sufficient.
/// 2. Malformed header (not exactly `Bearer <token>`): 401, short-circuit.
/// 3. Well-formed header: the token is resolved through the auth manager.
///    A storage failure denies the request (fail closed); an unknown,
///    expired, or wrong-scope token denies it with the same generic answer;
///    a resolved user is attached as the identity.
///
/// Every response carries `Vary: Authorization` so caches never conflate
/// authenticated and anonymous responses.
pub async fn authenticate<D: Database + 'static>(
    State(auth): State<Arc<AuthManager<D>>>,
    mut request: Request,
    next: Next,
) -> Response {
    let mut response = match resolve_identity(&auth, request.headers()).await {
        Ok(identity) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(reject) => reject.into_response(),
    };

    response
        .headers_mut()
        .insert(header::VARY, HeaderValue::from_static("Authorization"));

    response
}

/// Resolve the identity for one request from its Authorization header
async fn resolve_identity<D: Database + 'static>(
    auth: &AuthManager<D>,
    headers: &axum::http::HeaderMap,
) -> Result<Identity, AuthReject> {
    let Some(header_value) = headers.get(header::AUTHORIZATION) else {
        return Ok(Identity::Anonymous);
    };

    let header_str = header_value
        .to_str()
        .map_err(|_| AuthReject::malformed_header())?;

    let mut parts = header_str.split(' ');
    let token = match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) => token,
        _ => return Err(AuthReject::malformed_header()),
    };

    match auth.resolve_token(TokenScope::Auth, token).await {
        Ok(Some(user)) => Ok(Identity::Authenticated(user)),
        Ok(None) => Err(AuthReject::invalid_token()),
        Err(e) => {
            // Fail closed; the real cause stays server-side
            tracing::error!(error = %e, "Token resolution failed");
            Err(AuthReject::lookup_failed())
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AuthReject;

    /// The identity attached by [`authenticate`]
    ///
    /// A missing identity means the middleware is not installed on this
    /// route. That is a route-wiring defect, not a runtime condition:
    /// debug builds assert, release builds answer a generic 500.
    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Identity>() {
            Some(identity) => Ok(identity.clone()),
            None => {
                debug_assert!(false, "authenticate middleware not installed on this route");
                tracing::error!(
                    path = %parts.uri.path(),
                    "Request reached a handler without an identity"
                );
                Err(AuthReject::missing_identity())
            }
        }
    }
}

/// Extractor gating a handler on a real, non-anonymous caller
///
/// Composes with (and runs logically after) the authentication middleware.
/// The handler body can never run without an authenticated user in scope.
pub struct RequireUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AuthReject;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Identity::from_request_parts(parts, state).await? {
            Identity::Authenticated(user) => Ok(RequireUser(user)),
            Identity::Anonymous => Err(AuthReject::must_be_logged_in()),
        }
    }
}

/// Authentication error response
#[derive(Debug)]
pub struct AuthReject {
    status: StatusCode,
    message: &'static str,
}

impl AuthReject {
    fn malformed_header() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: "Invalid authorization header",
        }
    }

    fn invalid_token() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: "Token expired or invalid",
        }
    }

    fn lookup_failed() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: "Invalid token",
        }
    }

    fn must_be_logged_in() -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "You must be logged in",
        }
    }

    fn missing_identity() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Internal server error",
        }
    }
}

impl IntoResponse for AuthReject {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.message
        });
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}

/// Logging middleware function
///
/// Logs request and response details including:
/// - Method and path
/// - Status code
/// - Response time
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let elapsed = start.elapsed();
    let status = response.status();

    tracing::info!(
        method = %method,
        path = %uri.path(),
        status = %status.as_u16(),
        duration_ms = %elapsed.as_millis(),
        "Request completed"
    );

    response
}
