//! Credential verification and bearer token handling.
//!
//! - [`CredentialStore`]: fixed username -> Argon2 hash mapping
//! - [`TokenService`]: JWT issuance and validation
//! - [`password`]: Argon2 hashing helpers
pub mod credentials;
pub mod password;
pub mod token;

pub use credentials::{CredentialError, CredentialStore, DEMO_ADMIN_PASSWORD};
pub use token::{Claims, IssuedToken, TokenError, TokenService, TOKEN_TYPE};
