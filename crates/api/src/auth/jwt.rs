//! JWT bearer-token generation and validation.
//!
//! Tokens are HS256-signed and carry the user's identity and role, so the
//! bearer gate never needs a database round trip.

use iras_core::types::DbId;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Issuer stamped into and required from every token.
pub const ISSUER: &str = "api-iras";

/// JWT claims embedded in every bearer token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    pub username: String,
    pub email: String,
    /// The user's role name (`"admin"` or `"user"`).
    pub role: String,
    pub iss: String,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Unique token identifier (UUID v4).
    pub jti: String,
}

/// Configuration for JWT token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Token lifetime in hours (default: 24).
    pub expiry_hours: i64,
}

impl JwtConfig {
    /// Token lifetime in seconds, as reported in `expires_in`.
    pub fn expires_in_secs(&self) -> i64 {
        self.expiry_hours.saturating_mul(3600)
    }
}

/// The identity a token is issued for.
#[derive(Debug, Clone, Copy)]
pub struct TokenSubject<'a> {
    pub user_id: DbId,
    pub username: &'a str,
    pub email: &'a str,
    pub role: &'a str,
}

/// Generate an HS256 token for the given subject.
pub fn generate_access_token(
    subject: TokenSubject<'_>,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();

    let claims = Claims {
        sub: subject.user_id,
        username: subject.username.to_string(),
        email: subject.email.to_string(),
        role: subject.role.to_string(),
        iss: ISSUER.to_string(),
        iat: now,
        exp: now.saturating_add(config.expires_in_secs()),
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode a token, returning the embedded [`Claims`].
///
/// Checks the signature, expiry and issuer.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default(); // HS256, validates exp
    validation.set_issuer(&[ISSUER]);
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            expiry_hours: 24,
        }
    }

    fn subject() -> TokenSubject<'static> {
        TokenSubject {
            user_id: 42,
            username: "tan",
            email: "tan@example.com",
            role: "admin",
        }
    }

    fn encode_claims(claims: &Claims, config: &JwtConfig) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .expect("encoding should succeed")
    }

    #[test]
    fn test_generate_and_validate_access_token() {
        let config = test_config();
        let token =
            generate_access_token(subject(), &config).expect("token generation should succeed");

        let claims = validate_token(&token, &config).expect("token validation should succeed");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.username, "tan");
        assert_eq!(claims.email, "tan@example.com");
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.iss, ISSUER);
        assert_eq!(claims.exp - claims.iat, 86_400);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn test_expired_token_fails() {
        let config = test_config();

        // Well beyond the default 60-second leeway.
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            username: "old".to_string(),
            email: "old@example.com".to_string(),
            role: "user".to_string(),
            iss: ISSUER.to_string(),
            exp: now - 300,
            iat: now - 600,
            jti: Uuid::new_v4().to_string(),
        };

        let result = validate_token(&encode_claims(&claims, &config), &config);
        assert!(result.is_err(), "expired token must fail validation");
    }

    #[test]
    fn test_foreign_issuer_fails() {
        let config = test_config();
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            username: "x".to_string(),
            email: "x@example.com".to_string(),
            role: "user".to_string(),
            iss: "someone-else".to_string(),
            exp: now + 3600,
            iat: now,
            jti: Uuid::new_v4().to_string(),
        };

        let result = validate_token(&encode_claims(&claims, &config), &config);
        assert!(result.is_err(), "token from another issuer must fail");
    }

    #[test]
    fn test_expiry_seconds_saturate() {
        let config = JwtConfig {
            secret: "s".to_string(),
            expiry_hours: i64::MAX,
        };
        assert_eq!(config.expires_in_secs(), i64::MAX);
    }

    #[test]
    fn test_different_secrets_fail() {
        let config_a = JwtConfig {
            secret: "secret-alpha".to_string(),
            expiry_hours: 24,
        };
        let config_b = JwtConfig {
            secret: "secret-bravo".to_string(),
            expiry_hours: 24,
        };

        let token =
            generate_access_token(subject(), &config_a).expect("token generation should succeed");

        let result = validate_token(&token, &config_b);
        assert!(
            result.is_err(),
            "token signed with a different secret must fail"
        );
    }
}
