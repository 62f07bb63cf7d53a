// Session authentication module
// Decision: stateless HS256 sessions carried by an HTTP-only cookie;
// nothing is stored server-side, logout only expires the cookie

pub mod config;
pub mod jwt;
pub mod middleware;
pub mod routes;

pub use config::AuthConfig;
pub use middleware::{AuthError, AuthState, FromRef, SessionUser, SESSION_COOKIE};
pub use routes::routes;
