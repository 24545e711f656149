//! Bearer-token authentication: JWT issuance and verification, password
//! hashing.

use chrono::{DateTime, Duration, Utc};
use entities::user::{Role, User};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::JwtConfig;

pub mod password;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid token: {0}")]
    InvalidToken(jsonwebtoken::errors::Error),

    #[error("token expired")]
    ExpiredToken,

    #[error("couldn't sign token: {0}")]
    Signing(jsonwebtoken::errors::Error),

    #[error("password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error("hashing task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub role: Role,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn user_id(&self) -> Uuid {
        self.sub
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Owners manage their own resources, admins manage everything.
    pub fn can_manage(&self, owner: Uuid) -> bool {
        self.is_admin() || self.sub == owner
    }
}

/// HS256 keys plus the issuer/audience pair every token is bound to.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
    ttl: Duration,
}

impl TokenKeys {
    pub fn new(config: &JwtConfig) -> Self {
        TokenKeys {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            ttl: Duration::hours(config.ttl_hours),
        }
    }

    pub fn issue(&self, user: &User) -> Result<String, AuthError> {
        self.issue_at(user, Utc::now())
    }

    pub fn issue_at(&self, user: &User, now: DateTime<Utc>) -> Result<String, AuthError> {
        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            role: user.role(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(AuthError::Signing)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_audience(&[self.audience.as_str()]);
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                _ => AuthError::InvalidToken(err),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            username: "listener".to_string(),
            email: "listener@example.com".to_string(),
            password: String::new(),
            role: role.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn keys(secret: &str) -> TokenKeys {
        TokenKeys::new(&JwtConfig {
            secret: secret.to_string(),
            ..JwtConfig::default()
        })
    }

    #[test]
    fn issued_token_verifies() {
        let keys = keys("secret");
        let user = user(Role::Admin);
        let claims = keys.verify(&keys.issue(&user).unwrap()).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.username, "listener");
        assert!(claims.is_admin());
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn foreign_signature_is_rejected() {
        let token = keys("one").issue(&user(Role::User)).unwrap();
        assert!(matches!(keys("two").verify(&token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = keys("secret");
        let token = keys
            .issue_at(&user(Role::User), Utc::now() - Duration::days(2))
            .unwrap();
        assert!(matches!(keys.verify(&token), Err(AuthError::ExpiredToken)));
    }

    #[test]
    fn wrong_audience_is_rejected() {
        let token = keys("secret").issue(&user(Role::User)).unwrap();
        let other = TokenKeys::new(&JwtConfig {
            secret: "secret".to_string(),
            audience: "someone-else".to_string(),
            ..JwtConfig::default()
        });
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn owners_and_admins_can_manage() {
        let keys = keys("secret");
        let owner = user(Role::User);
        let claims = keys.verify(&keys.issue(&owner).unwrap()).unwrap();
        assert!(claims.can_manage(owner.id));
        assert!(!claims.can_manage(Uuid::new_v4()));
    }
}
