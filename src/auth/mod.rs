pub mod guard;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config;
use crate::database::models::User;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub username: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn for_user(user: &User) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            user_id: user.id,
            username: user.username.clone(),
            is_staff: user.is_staff,
            is_superuser: user.is_superuser,
            exp,
            iat: now.timestamp(),
        }
    }
}

/// Authenticated requester, injected by the auth middleware when a valid
/// bearer token is present. Its absence means an anonymous request.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: i64,
    pub username: String,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
            is_staff: claims.is_staff,
            is_superuser: claims.is_superuser,
        }
    }
}

#[derive(Debug)]
pub enum JwtError {
    TokenGeneration(String),
    InvalidSecret,
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::TokenGeneration(msg) => write!(f, "JWT generation error: {}", msg),
            JwtError::InvalidSecret => write!(f, "Invalid JWT secret"),
        }
    }
}

impl std::error::Error for JwtError {}

pub fn generate_jwt(claims: Claims) -> Result<String, JwtError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, &claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// Validate a bearer token and extract its claims
pub fn validate_jwt(token: &str) -> Result<Claims, String> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err("JWT secret not configured".to_string());
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| format!("Invalid JWT token: {}", e))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64) -> User {
        User {
            id,
            username: "kim".to_string(),
            is_staff: false,
            is_superuser: false,
        }
    }

    #[test]
    fn tokens_round_trip_through_validation() {
        let token = generate_jwt(Claims::for_user(&user(3))).unwrap();
        let claims = validate_jwt(&token).unwrap();
        assert_eq!(claims.user_id, 3);
        assert_eq!(claims.username, "kim");
        assert!(!claims.is_staff);
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        assert!(validate_jwt("not-a-token").is_err());
    }
}
