//! Access/refresh token pair issued after OTP verification.
//!
//! HS256-signed JWTs with a `token_use` discriminator so a refresh token can
//! never pass as an access token or vice versa.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

const ACCESS_TOKEN_MINUTES: i64 = 30;
const REFRESH_TOKEN_DAYS: i64 = 30;

const USE_ACCESS: &str = "access";
const USE_REFRESH: &str = "refresh";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User id
    pub sub: String,
    /// Expiration (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// "access" or "refresh"
    pub token_use: String,
}

#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issue the (access, refresh) pair for a user.
    pub fn issue_pair(&self, user_id: i32) -> Result<(String, String), jsonwebtoken::errors::Error> {
        let access = self.issue(user_id, USE_ACCESS, Duration::minutes(ACCESS_TOKEN_MINUTES))?;
        let refresh = self.issue(user_id, USE_REFRESH, Duration::days(REFRESH_TOKEN_DAYS))?;
        Ok((access, refresh))
    }

    /// Issue a fresh access token (used by the refresh endpoint).
    pub fn issue_access(&self, user_id: i32) -> Result<String, jsonwebtoken::errors::Error> {
        self.issue(user_id, USE_ACCESS, Duration::minutes(ACCESS_TOKEN_MINUTES))
    }

    fn issue(
        &self,
        user_id: i32,
        token_use: &str,
        ttl: Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: user_id.to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
            token_use: token_use.to_string(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
    }

    /// Returns the user id when the token is a valid, unexpired access token.
    pub fn verify_access(&self, token: &str) -> Option<i32> {
        self.verify(token, USE_ACCESS)
    }

    /// Returns the user id when the token is a valid, unexpired refresh token.
    pub fn verify_refresh(&self, token: &str) -> Option<i32> {
        self.verify(token, USE_REFRESH)
    }

    fn verify(&self, token: &str, expected_use: &str) -> Option<i32> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &Validation::default()).ok()?;
        if data.claims.token_use != expected_use {
            return None;
        }
        data.claims.sub.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_round_trip() {
        let service = TokenService::new("test-secret");
        let (access, refresh) = service.issue_pair(42).unwrap();
        assert_eq!(service.verify_access(&access), Some(42));
        assert_eq!(service.verify_refresh(&refresh), Some(42));
    }

    #[test]
    fn test_token_use_is_enforced() {
        let service = TokenService::new("test-secret");
        let (access, refresh) = service.issue_pair(7).unwrap();
        assert_eq!(service.verify_access(&refresh), None);
        assert_eq!(service.verify_refresh(&access), None);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let issuer = TokenService::new("secret-a");
        let verifier = TokenService::new("secret-b");
        let (access, _) = issuer.issue_pair(1).unwrap();
        assert_eq!(verifier.verify_access(&access), None);
    }
}
