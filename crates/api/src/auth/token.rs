//! Signed token issuance and validation
//!
//! Tokens are purpose-typed: a verification-email link must never grant a
//! login session, and a session token must never reset a password. Purpose is
//! a closed enum checked on every verification, and the service keeps no
//! per-token state; a token is a pure function of its claims and the signing
//! secret.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

/// What a token may be redeemed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPurpose {
    Access,
    EmailVerify,
    PasswordReset,
}

/// Claims carried by every issued token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: i64,
    /// Purpose discriminator
    pub purpose: TokenPurpose,
    /// Issued at
    pub iat: i64,
    /// Expiration
    pub exp: i64,
}

/// Token service for issuance and verification
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expiry_hours: i64,
    email_verify_expiry_hours: i64,
    password_reset_expiry_minutes: i64,
}

impl TokenService {
    /// Create a new token service from the signing secret
    pub fn new(secret: &str, access_token_expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expiry_hours,
            email_verify_expiry_hours: 24,
            // Short window: the token grants a sensitive action
            password_reset_expiry_minutes: 60,
        }
    }

    /// Issue a token for the given purpose and subject with an explicit TTL
    pub fn issue(
        &self,
        purpose: TokenPurpose,
        subject_id: i64,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            sub: subject_id,
            purpose,
            iat: now.unix_timestamp(),
            exp: (now + ttl).unix_timestamp(),
        };

        // Explicit algorithm prevents algorithm confusion attacks
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Issue a session token
    pub fn issue_access_token(&self, subject_id: i64) -> Result<String, TokenError> {
        self.issue(
            TokenPurpose::Access,
            subject_id,
            Duration::hours(self.access_token_expiry_hours),
        )
    }

    /// Issue an email-ownership verification token
    pub fn issue_email_verify_token(&self, subject_id: i64) -> Result<String, TokenError> {
        self.issue(
            TokenPurpose::EmailVerify,
            subject_id,
            Duration::hours(self.email_verify_expiry_hours),
        )
    }

    /// Issue a password-reset token
    pub fn issue_password_reset_token(&self, subject_id: i64) -> Result<String, TokenError> {
        self.issue(
            TokenPurpose::PasswordReset,
            subject_id,
            Duration::minutes(self.password_reset_expiry_minutes),
        )
    }

    /// Verify a token for an expected purpose and return its subject ID
    ///
    /// The signature is checked before any claim is trusted, the algorithm is
    /// pinned to HS256 rather than negotiated from the token, and expiry has
    /// no leeway: a token is invalid strictly after its `exp`. The caller must
    /// still resolve the subject through the repository; the token proves who,
    /// never current account state.
    pub fn verify(
        &self,
        token: &str,
        expected_purpose: TokenPurpose,
    ) -> Result<i64, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => TokenError::InvalidSignature,
                jsonwebtoken::errors::ErrorKind::InvalidAlgorithmName => {
                    TokenError::InvalidSignature
                }
                _ => TokenError::Malformed,
            })?;

        if claims.purpose != expected_purpose {
            return Err(TokenError::WrongPurpose);
        }

        Ok(claims.sub)
    }

    /// Access token lifetime in seconds, for the login response body
    pub fn access_token_expiry_seconds(&self) -> i64 {
        self.access_token_expiry_hours * 3600
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Token signature is invalid")]
    InvalidSignature,
    #[error("Token was issued for a different purpose")]
    WrongPurpose,
    #[error("Token has expired")]
    Expired,
    #[error("Token is malformed")]
    Malformed,
    #[error("Token encoding failed: {0}")]
    Encoding(String),
}
