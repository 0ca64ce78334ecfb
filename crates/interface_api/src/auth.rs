//! Authentication and authorization

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// User's roles
    pub roles: Vec<String>,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

/// Auth errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Missing permission: {0}")]
    MissingPermission(String),
}

/// Creates a new JWT token
pub fn create_token(
    user_id: &str,
    roles: Vec<String>,
    secret: &str,
    expiration_secs: u64,
) -> Result<String, AuthError> {
    let now = Utc::now();
    let exp = now + Duration::seconds(expiration_secs as i64);

    let claims = Claims {
        sub: user_id.to_string(),
        roles,
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AuthError::InvalidToken)
}

/// Validates a JWT token
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        if e.to_string().contains("ExpiredSignature") {
            AuthError::TokenExpired
        } else {
            AuthError::InvalidToken
        }
    })?;

    Ok(token_data.claims)
}

/// Checks if user has required role
pub fn has_role(claims: &Claims, required_role: &str) -> bool {
    claims.roles.iter().any(|r| r == required_role || r == "admin")
}

/// Permission definitions
pub mod permissions {
    pub const DOCUMENT_READ: &str = "document:read";
    pub const DOCUMENT_WRITE: &str = "document:write";
    pub const PAYMENT_READ: &str = "payment:read";
    pub const PAYMENT_WRITE: &str = "payment:write";
    pub const PARTY_READ: &str = "party:read";
    pub const PARTY_WRITE: &str = "party:write";
    pub const NUMBERING_ADMIN: &str = "numbering:admin";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let token = create_token("u-1", vec!["document:write".to_string()], "secret", 60).unwrap();
        let claims = validate_token(&token, "secret").unwrap();
        assert_eq!(claims.sub, "u-1");
        assert!(has_role(&claims, "document:write"));
        assert!(!has_role(&claims, "numbering:admin"));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = create_token("u-1", vec![], "secret", 60).unwrap();
        assert!(validate_token(&token, "other").is_err());
    }

    #[test]
    fn test_admin_implies_all_roles() {
        let token = create_token("u-1", vec!["admin".to_string()], "secret", 60).unwrap();
        let claims = validate_token(&token, "secret").unwrap();
        assert!(has_role(&claims, "payment:write"));
    }
}
