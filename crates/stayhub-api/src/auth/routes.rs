// Session issuance HTTP routes
// Decision: the credential travels only in the cookie; response bodies are a
// bare acknowledgement

use axum::{extract::State, routing::post, Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;

use super::config::AuthConfig;
use super::middleware::{AuthError, AuthState, SESSION_COOKIE};

/// Acknowledgement body for session endpoints
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub success: bool,
}

/// Create session routes
pub fn routes(state: AuthState) -> Router {
    Router::new()
        .route("/jwt", post(issue_session))
        .route("/logout", post(clear_session))
        .with_state(state)
}

/// Build the session cookie. Production deployments serve the UI from
/// another origin, so the cookie must be Secure and cross-site-sendable;
/// local development keeps it same-site (ports do not split a site) and
/// plain HTTP-compatible.
fn session_cookie(config: &AuthConfig, token: String) -> Cookie<'static> {
    let cookie = Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .path("/");

    if config.production {
        cookie.secure(true).same_site(SameSite::None).build()
    } else {
        cookie.same_site(SameSite::Strict).build()
    }
}

/// POST /jwt - Issue a session cookie for a caller-supplied identity
#[utoipa::path(
    post,
    path = "/jwt",
    request_body = Object,
    responses(
        (status = 200, description = "Session cookie set", body = SessionResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "auth"
)]
pub async fn issue_session(
    State(state): State<AuthState>,
    jar: CookieJar,
    Json(identity): Json<Map<String, Value>>,
) -> Result<(CookieJar, Json<SessionResponse>), AuthError> {
    let token = state.jwt.issue_token(identity).map_err(|e| {
        tracing::error!("Failed to issue session token: {}", e);
        AuthError::internal("Failed to issue session token")
    })?;

    let jar = jar.add(session_cookie(&state.config, token));
    Ok((jar, Json(SessionResponse { success: true })))
}

/// POST /logout - Expire the session cookie immediately
#[utoipa::path(
    post,
    path = "/logout",
    responses(
        (status = 200, description = "Session cookie cleared", body = SessionResponse)
    ),
    tag = "auth"
)]
pub async fn clear_session(jar: CookieJar) -> (CookieJar, Json<SessionResponse>) {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Json(SessionResponse { success: true }))
}
