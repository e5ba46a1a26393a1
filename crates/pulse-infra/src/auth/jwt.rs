//! HS256 access tokens for Pulse sessions.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pulse_core::ports::{AuthError, TokenClaims, TokenService};

const DEFAULT_SECRET: &str = "change-me-in-production";

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            expiration_hours: 24,
            issuer: "pulse-api".to_string(),
        }
    }
}

impl JwtConfig {
    /// Load from `JWT_SECRET`, `JWT_EXPIRATION_HOURS` and `JWT_ISSUER`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let config = Self {
            secret: std::env::var("JWT_SECRET")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.secret),
            expiration_hours: std::env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|h: &i64| *h > 0)
                .unwrap_or(defaults.expiration_hours),
            issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
        };

        if config.uses_default_secret() {
            let production = std::env::var("RUST_ENV")
                .map(|v| v == "production" || v == "prod")
                .unwrap_or(false);
            if production {
                tracing::error!("JWT_SECRET is unset in production; tokens are forgeable");
            } else {
                tracing::warn!("Using the development JWT secret. Set JWT_SECRET.");
            }
        }

        config
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }
}

/// Token payload as it travels on the wire.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    username: String,
    iat: i64,
    exp: i64,
    iss: String,
}

impl From<Claims> for TokenClaims {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username,
            exp: claims.exp,
        }
    }
}

pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            config,
        }
    }
}

impl TokenService for JwtTokenService {
    fn generate_token(&self, user_id: Uuid, username: &str) -> Result<String, AuthError> {
        let issued = Utc::now();
        let claims = Claims {
            sub: user_id,
            username: username.to_string(),
            iat: issued.timestamp(),
            exp: (issued + TimeDelta::hours(self.config.expiration_hours)).timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims.into())
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            })
    }

    fn expiration_seconds(&self) -> i64 {
        self.config.expiration_hours * 3600
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtTokenService {
        JwtTokenService::new(JwtConfig {
            secret: "test-secret-key".to_string(),
            expiration_hours: 1,
            issuer: "pulse-test".to_string(),
        })
    }

    #[test]
    fn issued_token_identifies_the_user() {
        let tokens = service();
        let user_id = Uuid::new_v4();

        let claims = tokens
            .validate_token(&tokens.generate_token(user_id, "johndoe").unwrap())
            .unwrap();

        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.username, "johndoe");
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn garbage_is_invalid() {
        assert!(matches!(
            service().validate_token("not.a.jwt"),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let tokens = JwtTokenService::new(JwtConfig {
            expiration_hours: -2,
            ..service().config.clone()
        });

        let token = tokens.generate_token(Uuid::new_v4(), "late").unwrap();

        assert!(matches!(
            tokens.validate_token(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let forger = JwtTokenService::new(JwtConfig {
            secret: "someone-elses-secret".to_string(),
            ..service().config.clone()
        });

        let token = forger.generate_token(Uuid::new_v4(), "mallory").unwrap();

        assert!(matches!(
            service().validate_token(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn token_from_another_issuer_is_rejected() {
        let other = JwtTokenService::new(JwtConfig {
            issuer: "elsewhere".to_string(),
            ..service().config.clone()
        });

        let token = other.generate_token(Uuid::new_v4(), "someone").unwrap();

        assert!(service().validate_token(&token).is_err());
    }

    #[test]
    fn lifetime_is_reported_in_seconds() {
        let tokens = JwtTokenService::new(JwtConfig {
            expiration_hours: 24,
            ..JwtConfig::default()
        });

        assert_eq!(tokens.expiration_seconds(), 86_400);
        assert!(JwtConfig::default().uses_default_secret());
    }
}
