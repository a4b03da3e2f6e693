use std::collections::HashMap;
use std::fmt;

use thiserror::Error;
use tracing::{info, warn};

use super::password;
use crate::config::SecurityConfig;

/// Password used for the seeded admin account when no hash is configured.
/// Development and staging only; production validation refuses it.
pub const DEMO_ADMIN_PASSWORD: &str = "securepassword123";

/// Verified against when the username is unknown, so both failure paths pay
/// for one Argon2 run. Same parameters as `password::hash` output.
const DECOY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHRzYWx0$aGFzaGhhc2hoYXNoaGFzaGhhc2hoYXNoaGFzaGhhc2g";

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("configured password hash for '{0}' is not a valid PHC string")]
    InvalidHash(String),

    #[error("failed to hash seed password: {0}")]
    Hashing(String),
}

/// Fixed username -> password hash mapping, built once at startup and shared
/// read-only afterwards.
#[derive(Clone, Default)]
pub struct CredentialStore {
    entries: HashMap<String, String>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry from an existing PHC hash.
    pub fn with_hash(mut self, username: impl Into<String>, hashword: impl Into<String>) -> Result<Self, CredentialError> {
        let username = username.into();
        let hashword = hashword.into();
        if !password::is_phc(&hashword) {
            return Err(CredentialError::InvalidHash(username));
        }
        self.entries.insert(username, hashword);
        Ok(self)
    }

    /// Add an entry by hashing a plaintext password. The plaintext is not kept.
    pub fn with_password(mut self, username: impl Into<String>, plaintext: &str) -> Result<Self, CredentialError> {
        let hashword = password::hash(plaintext).map_err(|e| CredentialError::Hashing(e.to_string()))?;
        self.entries.insert(username.into(), hashword);
        Ok(self)
    }

    /// Seed the admin entry from configuration.
    pub fn from_config(security: &SecurityConfig) -> Result<Self, CredentialError> {
        let store = match &security.admin_password_hash {
            Some(hashword) => Self::new().with_hash(&security.admin_username, hashword)?,
            None => {
                info!(
                    "No AUTH_ADMIN_PASSWORD_HASH configured; seeding '{}' with the demo password",
                    security.admin_username
                );
                Self::new().with_password(&security.admin_username, DEMO_ADMIN_PASSWORD)?
            }
        };
        Ok(store)
    }

    /// True only for a known username whose hash matches `plaintext`.
    /// Unknown users and wrong passwords are indistinguishable to the caller.
    pub fn verify(&self, username: &str, plaintext: &str) -> bool {
        let verified = match self.entries.get(username) {
            Some(hashword) => password::verify(plaintext, hashword),
            None => {
                password::verify(plaintext, DECOY_HASH);
                false
            }
        };

        if !verified {
            warn!("Credential check failed for login attempt");
        }
        verified
    }

    pub fn contains(&self, username: &str) -> bool {
        self.entries.contains_key(username)
    }

}

// Hashes stay out of debug output.
impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore")
            .field("usernames", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}
