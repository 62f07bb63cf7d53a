// Session token service
// Decision: HS256 with a server-held secret (symmetric key)
// Decision: the identity payload is signed blindly; the login trust boundary
// lives outside this system

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::config::AuthConfig;

/// Claims carried by a session token. `email` is the only identity field
/// this system ever reads back; the rest passes through opaque.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    /// Owner email, when the identity payload carried one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Remaining identity fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// JWT service for session token issuance and verification
#[derive(Clone)]
pub struct JwtService {
    token_lifetime: std::time::Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            token_lifetime: config.token_lifetime,
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
        }
    }

    /// Sign a session token over a caller-supplied identity object,
    /// expiring one lifetime after issuance.
    pub fn issue_token(&self, mut identity: Map<String, Value>) -> Result<String> {
        let email = match identity.remove("email") {
            Some(Value::String(email)) => Some(email),
            Some(other) => {
                // Non-string email stays in the opaque bag; it can never
                // satisfy the ownership check.
                identity.insert("email".to_string(), other);
                None
            }
            None => None,
        };
        // Timestamps are ours to assign
        identity.remove("iat");
        identity.remove("exp");

        let now = Utc::now();
        let exp = now + Duration::from_std(self.token_lifetime)?;

        let claims = SessionClaims {
            email,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            extra: identity,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .context("Failed to encode session token")
    }

    /// Validate and decode a session token. Expiry is enforced with zero
    /// leeway: a token is accepted up to its `exp` and rejected after.
    pub fn validate_token(&self, token: &str) -> Result<SessionClaims> {
        let mut validation = Validation::default();
        validation.validate_exp = true;
        validation.leeway = 0;

        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .context("Invalid session token")?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration as StdDuration;

    fn test_config() -> AuthConfig {
        AuthConfig {
            secret: "test-secret-key-for-testing".to_string(),
            production: false,
            token_lifetime: StdDuration::from_secs(3600),
        }
    }

    fn identity(value: Value) -> Map<String, Value> {
        value.as_object().expect("object payload").clone()
    }

    #[test]
    fn test_issue_and_validate() {
        let service = JwtService::new(&test_config());
        let token = service
            .issue_token(identity(json!({
                "email": "a@x.com",
                "name": "Ada",
                "role": "guest",
            })))
            .unwrap();

        assert!(!token.is_empty());

        let claims = service.validate_token(&token).unwrap();
        assert_eq!(claims.email.as_deref(), Some("a@x.com"));
        assert_eq!(claims.extra["name"], "Ada");
        assert_eq!(claims.extra["role"], "guest");
        // 1 hour lifetime
        assert_eq!(claims.exp, claims.iat + 3600);
    }

    #[test]
    fn test_identity_without_email() {
        let service = JwtService::new(&test_config());
        let token = service
            .issue_token(identity(json!({ "name": "Ada" })))
            .unwrap();

        let claims = service.validate_token(&token).unwrap();
        assert_eq!(claims.email, None);
        assert_eq!(claims.extra["name"], "Ada");
    }

    #[test]
    fn test_caller_supplied_timestamps_are_replaced() {
        let service = JwtService::new(&test_config());
        let token = service
            .issue_token(identity(json!({ "email": "a@x.com", "exp": 1, "iat": 1 })))
            .unwrap();

        let claims = service.validate_token(&token).unwrap();
        assert!(claims.iat > 1);
        assert_eq!(claims.exp, claims.iat + 3600);
    }

    #[test]
    fn test_invalid_token() {
        let service = JwtService::new(&test_config());
        assert!(service.validate_token("not-a-token").is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let service = JwtService::new(&test_config());
        let other = JwtService::new(&AuthConfig {
            secret: "a-different-secret".to_string(),
            ..test_config()
        });

        let token = other
            .issue_token(identity(json!({ "email": "a@x.com" })))
            .unwrap();
        assert!(service.validate_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = JwtService::new(&test_config());

        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            email: Some("a@x.com".to_string()),
            exp: now - 120,
            iat: now - 3720,
            extra: Map::new(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(test_config().secret.as_bytes()),
        )
        .unwrap();

        assert!(service.validate_token(&token).is_err());
    }
}
