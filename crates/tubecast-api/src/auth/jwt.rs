//! HS256 JWT issuance and validation with a shared secret.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tubecast_core::AppError;
use uuid::Uuid;

const ISSUER: &str = "tubecast-access";

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub iss: String,
    pub sub: Uuid, // user_id
    pub iat: i64,  // issued at timestamp
    pub exp: i64,  // expiration timestamp
}

/// Issue a token for `user_id` expiring after `expires_in`.
pub fn make_jwt(user_id: Uuid, secret: &str, expires_in: Duration) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = JwtClaims {
        iss: ISSUER.to_string(),
        sub: user_id,
        iat: now.timestamp(),
        exp: (now + expires_in).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to sign JWT: {}", e)))
}

/// Validate a token and return the user it was issued to.
pub fn validate_jwt(token: &str, secret: &str) -> Result<Uuid, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);

    let data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| AppError::Unauthorized(format!("Couldn't validate JWT: {}", e)))?;

    Ok(data.claims.sub)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-test-secret-test-secret";

    #[test]
    fn test_round_trip() {
        let user_id = Uuid::new_v4();
        let token = make_jwt(user_id, SECRET, Duration::hours(1)).unwrap();
        assert_eq!(validate_jwt(&token, SECRET).unwrap(), user_id);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = make_jwt(Uuid::new_v4(), SECRET, Duration::hours(1)).unwrap();
        let err = validate_jwt(&token, "another-secret").unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = make_jwt(Uuid::new_v4(), SECRET, Duration::hours(-2)).unwrap();
        assert!(validate_jwt(&token, SECRET).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(validate_jwt("not.a.jwt", SECRET).is_err());
    }
}
