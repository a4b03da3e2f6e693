use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::credentials::CredentialStore;
use crate::config::SecurityConfig;

/// Token type discriminator returned alongside every access token.
pub const TOKEN_TYPE: &str = "bearer";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

/// Body of a successful `POST /token`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedToken {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("unsupported signing algorithm '{0}' (expected HS256, HS384 or HS512)")]
    UnsupportedAlgorithm(String),

    #[error("signing secret is empty")]
    EmptySecret,

    #[error("token lifetime must be positive and representable")]
    InvalidLifetime,

    #[error("token generation failed: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),

    #[error("token has expired")]
    Expired,

    #[error("token is invalid: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    #[error("token subject is not a known user")]
    UnknownSubject,
}

/// Issues and validates stateless bearer tokens.
///
/// Tokens carry only the subject and timestamps. There is no server-side
/// session, so a token stays valid until `exp`.
pub struct TokenService {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
    credentials: Arc<CredentialStore>,
}

impl TokenService {
    pub fn new(security: &SecurityConfig, credentials: Arc<CredentialStore>) -> Result<Self, TokenError> {
        let algorithm = parse_algorithm(&security.jwt_algorithm)?;

        if security.jwt_secret.is_empty() {
            return Err(TokenError::EmptySecret);
        }
        if security.token_expiry_minutes <= 0 {
            return Err(TokenError::InvalidLifetime);
        }

        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(security.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(security.jwt_secret.as_bytes()),
            lifetime: Duration::try_minutes(security.token_expiry_minutes).ok_or(TokenError::InvalidLifetime)?,
            credentials,
        })
    }

    /// Issue a token expiring one configured lifetime from now. Callers must
    /// have verified the password first.
    pub fn issue(&self, username: &str) -> Result<IssuedToken, TokenError> {
        let expires_at = Utc::now()
            .checked_add_signed(self.lifetime)
            .ok_or(TokenError::InvalidLifetime)?;
        self.issue_with_expiry(username, expires_at)
    }

    pub fn issue_with_expiry(&self, username: &str, expires_at: DateTime<Utc>) -> Result<IssuedToken, TokenError> {
        let claims = Claims {
            sub: username.to_string(),
            exp: expires_at.timestamp(),
            iat: Utc::now().timestamp(),
        };

        let access_token = encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(TokenError::Encode)?;

        Ok(IssuedToken {
            access_token,
            token_type: TOKEN_TYPE.to_string(),
        })
    }

    /// Verify signature, algorithm and expiry, and return the subject.
    pub fn validate(&self, token: &str) -> Result<String, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid(e),
        })?;

        let subject = data.claims.sub;
        if !self.credentials.contains(&subject) {
            return Err(TokenError::UnknownSubject);
        }

        Ok(subject)
    }
}

fn parse_algorithm(name: &str) -> Result<Algorithm, TokenError> {
    let algorithm = Algorithm::from_str(name.trim())
        .map_err(|_| TokenError::UnsupportedAlgorithm(name.to_string()))?;

    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(algorithm),
        _ => Err(TokenError::UnsupportedAlgorithm(name.to_string())),
    }
}
