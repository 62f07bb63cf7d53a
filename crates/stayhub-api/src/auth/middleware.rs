// Session verification gate
// Decision: a pure extractor; on success the decoded claims are attached to
// the request, nothing else happens

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::CookieJar;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

use super::{config::AuthConfig, jwt::JwtService};

/// Name of the session credential cookie.
pub const SESSION_COOKIE: &str = "token";

/// Authentication error
#[derive(Debug, Clone, Serialize)]
pub struct AuthError {
    pub message: String,
    #[serde(skip)]
    pub status: StatusCode,
}

impl AuthError {
    pub fn unauthorized(message: &str) -> Self {
        Self {
            message: message.to_string(),
            status: StatusCode::UNAUTHORIZED,
        }
    }

    pub fn forbidden(message: &str) -> Self {
        Self {
            message: message.to_string(),
            status: StatusCode::FORBIDDEN,
        }
    }

    pub fn internal(message: &str) -> Self {
        Self {
            message: message.to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Auth state shared across routes
#[derive(Clone)]
pub struct AuthState {
    pub config: AuthConfig,
    pub jwt: Arc<JwtService>,
}

impl AuthState {
    pub fn new(config: AuthConfig) -> Self {
        let jwt = Arc::new(JwtService::new(&config));
        Self { config, jwt }
    }
}

/// Verified session identity, extracted from the credential cookie on
/// protected routes. Missing, tampered or expired cookies reject with 401
/// before the handler runs.
#[derive(Debug, Clone)]
pub struct SessionUser {
    /// Owner email claim, when the signed identity carried one
    pub email: Option<String>,
    /// The remaining identity claims, opaque to this system
    pub claims: Map<String, Value>,
}

/// Helper trait for extracting AuthState from application state
pub trait FromRef<T> {
    fn from_ref(input: &T) -> Self;
}

impl FromRef<AuthState> for AuthState {
    fn from_ref(input: &AuthState) -> Self {
        input.clone()
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);

        let jar = CookieJar::from_headers(&parts.headers);
        let cookie = jar
            .get(SESSION_COOKIE)
            .ok_or_else(|| AuthError::unauthorized("unauthorized"))?;

        let claims = auth_state.jwt.validate_token(cookie.value()).map_err(|e| {
            tracing::debug!("Session token validation failed: {}", e);
            AuthError::unauthorized("unauthorized")
        })?;

        Ok(SessionUser {
            email: claims.email,
            claims: claims.extra,
        })
    }
}
