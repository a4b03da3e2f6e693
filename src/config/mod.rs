use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Signing secret used when nothing is configured. Fine for local work,
/// refused by the production preset.
pub const DEFAULT_JWT_SECRET: &str = "change-me-for-real-use";

/// Longest accepted token lifetime: one year.
pub const MAX_TOKEN_EXPIRY_MINUTES: i64 = 60 * 24 * 365;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub ingest: IngestConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_algorithm: String,
    pub token_expiry_minutes: i64,
    pub admin_username: String,
    #[serde(skip_serializing)]
    pub admin_password_hash: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    pub primary_csv: PathBuf,
    pub extra_csv: PathBuf,
    pub on_startup: bool,
}

impl IngestConfig {
    /// Sources in ingestion order: primary rows always precede extra rows.
    pub fn sources(&self) -> Vec<PathBuf> {
        vec![self.primary_csv.clone(), self.extra_csv.clone()]
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JWT_SECRET_KEY must not be empty")]
    EmptySecret,

    #[error("JWT_SECRET_KEY must be set to a non-default value in {0:?}")]
    DefaultSecret(Environment),

    #[error("AUTH_ADMIN_PASSWORD_HASH must be set in {0:?}")]
    MissingAdminHash(Environment),

    #[error("ACCESS_TOKEN_EXPIRE_MINUTES must be positive, got {0}")]
    NonPositiveExpiry(i64),

    #[error("ACCESS_TOKEN_EXPIRE_MINUTES must be at most 525600 (one year), got {0}")]
    ExpiryTooLong(i64),
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. `from_env` is this with
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_overrides(lookup)
    }

    fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Database overrides
        if let Some(v) = lookup("DATABASE_URL") {
            self.database.url = v;
        }
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Some(v) = lookup("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // API overrides
        if let Some(v) = lookup("IGS_API_PORT").or_else(|| lookup("PORT")) {
            self.api.port = v.parse().unwrap_or(self.api.port);
        }

        // Security overrides
        if let Some(v) = lookup("JWT_SECRET_KEY") {
            self.security.jwt_secret = v;
        }
        if let Some(v) = lookup("JWT_ALGORITHM") {
            self.security.jwt_algorithm = v;
        }
        if let Some(v) = lookup("ACCESS_TOKEN_EXPIRE_MINUTES") {
            self.security.token_expiry_minutes = v.parse().unwrap_or(self.security.token_expiry_minutes);
        }
        if let Some(v) = lookup("AUTH_ADMIN_USERNAME") {
            self.security.admin_username = v;
        }
        if let Some(v) = lookup("AUTH_ADMIN_PASSWORD_HASH") {
            self.security.admin_password_hash = Some(v).filter(|h| !h.trim().is_empty());
        }

        // Ingestion overrides
        if let Some(v) = lookup("IGS_PRIMARY_CSV") {
            self.ingest.primary_csv = PathBuf::from(v);
        }
        if let Some(v) = lookup("IGS_EXTRA_CSV") {
            self.ingest.extra_csv = PathBuf::from(v);
        }
        if let Some(v) = lookup("IGS_INGEST_ON_STARTUP") {
            self.ingest.on_startup = v.parse().unwrap_or(self.ingest.on_startup);
        }

        self
    }

    /// Reject settings that are unsafe for the selected environment.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.jwt_secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        if self.security.token_expiry_minutes <= 0 {
            return Err(ConfigError::NonPositiveExpiry(self.security.token_expiry_minutes));
        }
        if self.security.token_expiry_minutes > MAX_TOKEN_EXPIRY_MINUTES {
            return Err(ConfigError::ExpiryTooLong(self.security.token_expiry_minutes));
        }
        if self.environment == Environment::Production {
            if self.security.jwt_secret == DEFAULT_JWT_SECRET {
                return Err(ConfigError::DefaultSecret(self.environment));
            }
            if self.security.admin_password_hash.is_none() {
                return Err(ConfigError::MissingAdminHash(self.environment));
            }
        }
        Ok(())
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: "sqlite://igs_data.db".to_string(),
                max_connections: 5,
                connection_timeout: 30,
            },
            api: ApiConfig { port: 8000 },
            security: SecurityConfig::demo(),
            ingest: IngestConfig::default(),
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                url: "sqlite://igs_data.db".to_string(),
                max_connections: 10,
                connection_timeout: 10,
            },
            api: ApiConfig { port: 8000 },
            security: SecurityConfig::demo(),
            ingest: IngestConfig::default(),
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: "sqlite://igs_data.db".to_string(),
                max_connections: 20,
                connection_timeout: 5,
            },
            api: ApiConfig { port: 8000 },
            security: SecurityConfig {
                token_expiry_minutes: 15,
                ..SecurityConfig::demo()
            },
            ingest: IngestConfig::default(),
        }
    }
}

impl SecurityConfig {
    fn demo() -> Self {
        Self {
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            jwt_algorithm: "HS256".to_string(),
            token_expiry_minutes: 30,
            admin_username: "admin".to_string(),
            admin_password_hash: None,
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            primary_csv: PathBuf::from("igs_data.csv"),
            extra_csv: PathBuf::from("igs_data_extra.csv"),
            on_startup: true,
        }
    }
}
