//! Authorization gate - bearer token issuance, verification and the [`Actor`] extractor.
//!
//! Tokens are HS256 JWTs whose subject is the employee id. A verified token is not
//! enough by itself: the employee must still exist and be active when the request
//! arrives.

use crate::{
    api::AppState,
    config::AuthConfig,
    core::{employee::resolve_actor, permission::Actor},
    entities::{Role, employee},
    errors::{Error, Result},
};
use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::{future::Future, pin::Pin};
use tracing::debug;

/// JWT claims embedded in every bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: employee id as a decimal string
    pub sub: String,
    /// Role at the time the token was issued
    pub role: Role,
    /// Issued-at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// The employee id carried in `sub`.
    pub fn employee_id(&self) -> Result<i64> {
        self.sub.parse().map_err(|_| Error::Unauthorized)
    }
}

/// Issues a signed token for `employee`.
pub fn issue_token(employee: &employee::Model, config: &AuthConfig) -> Result<String> {
    let now = Utc::now().timestamp();
    let lifetime = i64::try_from(config.token_lifetime_secs).unwrap_or(i64::MAX);
    let claims = Claims {
        sub: employee.id.to_string(),
        role: employee.role,
        iat: now,
        exp: now.saturating_add(lifetime),
    };

    let key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
    jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &key).map_err(|e| {
        Error::Config {
            message: format!("failed to sign token: {e}"),
        }
    })
}

/// Verifies signature and expiry. Any failure is `Unauthorized`.
pub fn decode_token(token: &str, config: &AuthConfig) -> Result<Claims> {
    let key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_required_spec_claims(&["sub", "exp"]);

    jsonwebtoken::decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            debug!("Rejected bearer token: {e}");
            Error::Unauthorized
        })
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

impl FromRequest for Actor {
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let authorization = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        Box::pin(async move {
            let state = state.ok_or_else(|| Error::Config {
                message: "application state is not registered".to_string(),
            })?;
            let token = authorization
                .as_deref()
                .and_then(bearer_token)
                .ok_or(Error::Unauthorized)?;
            let claims = decode_token(token, &state.auth)?;
            resolve_actor(&state.database, claims.employee_id()?).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::employee_model;

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".to_string(),
            token_lifetime_secs: 60,
        }
    }

    #[test]
    fn test_issue_and_decode_token() -> Result<()> {
        let employee = employee_model(7, Role::Employee);
        let token = issue_token(&employee, &config())?;

        let claims = decode_token(&token, &config())?;
        assert_eq!(claims.employee_id()?, 7);
        assert_eq!(claims.role, Role::Employee);
        assert_eq!(claims.exp - claims.iat, 60);
        Ok(())
    }

    #[test]
    fn test_wrong_secret_is_unauthorized() -> Result<()> {
        let token = issue_token(&employee_model(1, Role::Admin), &config())?;
        let other = AuthConfig {
            jwt_secret: "another-secret".to_string(),
            ..config()
        };
        assert!(matches!(decode_token(&token, &other), Err(Error::Unauthorized)));
        assert!(matches!(decode_token("garbage", &config()), Err(Error::Unauthorized)));
        Ok(())
    }

    #[test]
    fn test_expired_token_is_unauthorized() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "1".to_string(),
            role: Role::Admin,
            iat: now - 7200,
            exp: now - 3600,
        };
        let key = EncodingKey::from_secret(b"test-secret");
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &key);
        assert!(token.is_ok());
        let result = token.map_err(|_| Error::Unauthorized).and_then(|t| decode_token(&t, &config()));
        assert!(matches!(result, Err(Error::Unauthorized)));
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("bearer   xyz "), Some("xyz"));
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("abc"), None);
    }
}
