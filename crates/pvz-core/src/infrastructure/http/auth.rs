//! Bearer token authentication
//!
//! Tokens are HS256 JWTs carrying `{id, email, role, exp}`. The
//! [`AuthenticatedUser`] extractor rejects requests without a valid token
//! with 401; handlers then check the caller's role against the use case with
//! [`AuthenticatedUser::authorize`], which yields 403 on mismatch.

use std::{fmt, sync::Arc, time::Duration};

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    application::UseCase, config::AuthConfig, domain::Role,
    infrastructure::http::axum_adapter::HttpError,
};

const DUMMY_USER_ID: &str = "dummy-id";
const DUMMY_USER_EMAIL: &str = "dummy@example.com";

/// Token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: String,
    pub email: String,
    pub role: Role,
    /// Expiry as seconds since the Unix epoch
    pub exp: i64,
}

/// Authentication and authorization failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Authorization header is missing")]
    MissingToken,

    #[error("Authorization header must carry a Bearer token")]
    MalformedHeader,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Role {role} is not allowed to {use_case}")]
    Forbidden { use_case: &'static str, role: Role },

    #[error("Failed to issue token: {0}")]
    Signing(String),
}

/// Issues and verifies tokens with a shared secret
pub struct JwtAuthority {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    token_ttl: Duration,
}

impl fmt::Debug for JwtAuthority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtAuthority")
            .field("algorithm", &Algorithm::HS256)
            .field("token_ttl", &self.token_ttl)
            .finish_non_exhaustive()
    }
}

impl JwtAuthority {
    pub fn new(secret: &[u8], token_ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
            token_ttl,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.jwt_secret.as_bytes(), config.token_ttl)
    }

    /// Sign a token for a user
    pub fn issue(&self, id: &str, email: &str, role: Role) -> Result<String, AuthError> {
        let ttl = chrono::Duration::from_std(self.token_ttl)
            .map_err(|err| AuthError::Signing(err.to_string()))?;
        let claims = Claims {
            id: id.to_string(),
            email: email.to_string(),
            role,
            exp: (Utc::now() + ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| AuthError::Signing(err.to_string()))
    }

    /// Sign a token for the synthetic test user
    pub fn issue_dummy(&self, role: Role) -> Result<String, AuthError> {
        self.issue(DUMMY_USER_ID, DUMMY_USER_EMAIL, role)
    }

    /// Check signature and expiry, returning the claims
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| AuthError::InvalidToken(err.to_string()))
    }
}

/// Caller identity extracted from the `Authorization` header
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub claims: Claims,
}

impl AuthenticatedUser {
    pub fn role(&self) -> Role {
        self.claims.role
    }

    /// Fail with [`AuthError::Forbidden`] unless the caller may run `U`
    pub fn authorize<U: UseCase>(&self) -> Result<(), AuthError> {
        if U::permits(self.role()) {
            Ok(())
        } else {
            debug!(use_case = U::NAME, role = %self.role(), "access denied");
            Err(AuthError::Forbidden {
                use_case: U::NAME,
                role: self.role(),
            })
        }
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<JwtAuthority>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let authority = Arc::<JwtAuthority>::from_ref(state);

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingToken)?;
        let token = header
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MalformedHeader)?;

        let claims = authority.verify(token)?;
        Ok(Self { claims })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{AddItemCommand, CreatePickupPointCommand, ListReceptionsQuery};

    fn authority() -> JwtAuthority {
        JwtAuthority::new(b"test-secret", Duration::from_secs(3600))
    }

    #[test]
    fn test_issue_then_verify() {
        let authority = authority();
        let token = authority.issue_dummy(Role::Moderator).unwrap();

        let claims = authority.verify(&token).unwrap();
        assert_eq!(claims.role, Role::Moderator);
        assert_eq!(claims.id, DUMMY_USER_ID);
        assert_eq!(claims.email, DUMMY_USER_EMAIL);
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_foreign_secret_is_rejected() {
        let token = authority().issue_dummy(Role::Employee).unwrap();
        let other = JwtAuthority::new(b"another-secret", Duration::from_secs(3600));

        assert!(matches!(
            other.verify(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let authority = authority();
        let claims = Claims {
            id: "u".into(),
            email: "u@example.com".into(),
            role: Role::Employee,
            exp: Utc::now().timestamp() - 3600,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &authority.encoding).unwrap();

        assert!(matches!(
            authority.verify(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_authorize_by_role() {
        let employee = AuthenticatedUser {
            claims: Claims {
                id: "e".into(),
                email: "e@example.com".into(),
                role: Role::Employee,
                exp: 0,
            },
        };

        assert!(employee.authorize::<AddItemCommand>().is_ok());
        assert!(employee.authorize::<ListReceptionsQuery>().is_ok());
        assert_eq!(
            employee.authorize::<CreatePickupPointCommand>(),
            Err(AuthError::Forbidden {
                use_case: "create_pickup_point",
                role: Role::Employee,
            })
        );
    }
}
