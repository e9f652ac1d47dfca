use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::error::AppError;

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user id (ObjectId hex)
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,
    #[error("Invalid token")]
    Invalid,
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        AppError::Unauthorized(err.to_string())
    }
}

/// Issues and verifies signed, time-limited identity tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
}

impl TokenService {
    pub fn new(secret: &str, lifetime: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            lifetime,
        }
    }

    /// Signs a token for `user_id` valid for the configured lifetime.
    pub fn issue(&self, user_id: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };
        self.sign(&claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Returns the user id carried by a valid token.
    ///
    /// Expired-but-authentic tokens yield `TokenError::Expired`; everything else
    /// that fails (bad signature, garbage, wrong algorithm) is `TokenError::Invalid`.
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims.sub)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test-secret-key-for-jwt-testing-minimum-32-chars";

    fn service() -> TokenService {
        TokenService::new(TEST_SECRET, Duration::days(7))
    }

    fn token_with_exp(service: &TokenService, exp: i64) -> String {
        let claims = Claims {
            sub: "user123".into(),
            iat: exp - 60,
            exp,
            jti: Uuid::new_v4().to_string(),
        };
        service.sign(&claims).unwrap()
    }

    #[test]
    fn verify_returns_issued_identity() {
        let service = service();
        let token = service.issue("64f1c2a9e4b0a1b2c3d4e5f6").unwrap();
        assert_eq!(service.verify(&token).unwrap(), "64f1c2a9e4b0a1b2c3d4e5f6");
    }

    #[test]
    fn tokens_are_unique_per_issue() {
        let service = service();
        assert_ne!(service.issue("u").unwrap(), service.issue("u").unwrap());
    }

    #[test]
    fn expiry_matches_lifetime() {
        let service = service();
        let token = service.issue("u").unwrap();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        let claims = decode::<Claims>(&token, &service.decoding_key, &validation)
            .unwrap()
            .claims;
        assert_eq!(claims.exp - claims.iat, Duration::days(7).num_seconds());
    }

    #[test]
    fn expired_token_is_distinguished_from_invalid() {
        let service = service();
        let token = token_with_exp(&service, Utc::now().timestamp() - 1);
        assert_eq!(service.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn zero_lifetime_token_expires() {
        let service = TokenService::new(TEST_SECRET, Duration::seconds(-1));
        let token = service.issue("u").unwrap();
        assert_eq!(service.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn garbage_is_invalid() {
        let service = service();
        assert_eq!(service.verify("invalid.token.here"), Err(TokenError::Invalid));
        assert_eq!(service.verify(""), Err(TokenError::Invalid));
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let token = service().issue("u").unwrap();
        let other = TokenService::new("another-secret-key-for-testing-32-chars", Duration::days(7));
        assert_eq!(other.verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn expired_token_with_wrong_secret_is_invalid() {
        let token = token_with_exp(&service(), Utc::now().timestamp() - 3600);
        let other = TokenService::new("another-secret-key-for-testing-32-chars", Duration::days(7));
        assert_eq!(other.verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn token_error_maps_to_unauthorized() {
        match AppError::from(TokenError::Expired) {
            AppError::Unauthorized(msg) => assert_eq!(msg, "Token expired"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
