use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Database
    pub database_path: PathBuf,

    // Artifact storage
    pub storage: StorageBackend,

    // Web Server
    pub web_host: String,
    pub web_port: u16,
    pub base_url: String,

    // Sessions
    pub session_lifetime: Duration,

    /// Read-only demo deployment: every mutating action is refused.
    ///
    /// Only the exact value `true` enables it; anything else, including `1`
    /// or `TRUE`, leaves the instance writable.
    pub demo_mode: bool,

    /// Account created at start-up if no user with that username exists yet.
    pub initial_user: Option<InitialUser>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitialUser {
    pub username: String,
    pub password: String,
}

/// Where archived artifacts (screenshots, PDFs, readable text, snapshots) live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Filesystem {
        root: PathBuf,
    },
    S3 {
        endpoint: String,
        region: String,
        bucket: String,
    },
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable is present but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_path: PathBuf::from(env_or_default(
                "DATABASE_PATH",
                "./data/linkwarden.sqlite",
            )),

            storage: storage_from_env(),

            web_host: env_or_default("WEB_HOST", "0.0.0.0"),
            web_port: parse_env_u16("WEB_PORT", 3000)?,
            base_url: env_or_default("BASE_URL", "http://localhost:3000")
                .trim_end_matches('/')
                .to_string(),

            session_lifetime: Duration::from_secs(parse_env_u64("SESSION_DAYS", 30)? * 86_400),

            demo_mode: env_flag("NEXT_PUBLIC_DEMO"),

            initial_user: match (optional_env("ADMIN_USERNAME"), optional_env("ADMIN_PASSWORD")) {
                (Some(username), Some(password)) => Some(InitialUser { username, password }),
                _ => None,
            },
        })
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session_lifetime.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "SESSION_DAYS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if url::Url::parse(&self.base_url).is_err() {
            return Err(ConfigError::InvalidValue {
                name: "BASE_URL".to_string(),
                message: format!("'{}' is not an absolute URL", self.base_url),
            });
        }
        if let Some(user) = &self.initial_user {
            if user.password.len() < 8 {
                return Err(ConfigError::InvalidValue {
                    name: "ADMIN_PASSWORD".to_string(),
                    message: "must be at least 8 characters".to_string(),
                });
            }
        }
        if let StorageBackend::S3 { bucket, .. } = &self.storage {
            if bucket.is_empty() {
                return Err(ConfigError::InvalidValue {
                    name: "SPACES_BUCKET_NAME".to_string(),
                    message: "cannot be empty".to_string(),
                });
            }
        }
        Ok(())
    }
}

fn storage_from_env() -> StorageBackend {
    match (optional_env("SPACES_ENDPOINT"), optional_env("SPACES_BUCKET_NAME")) {
        (Some(endpoint), Some(bucket)) => StorageBackend::S3 {
            endpoint,
            region: env_or_default("SPACES_REGION", "us-east-1"),
            bucket,
        },
        _ => StorageBackend::Filesystem {
            root: PathBuf::from(env_or_default("STORAGE_FOLDER", "./data")),
        },
    }
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u16(name: &str, default: u16) -> Result<u16, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name).is_ok_and(|val| is_flag_set(&val))
}

fn is_flag_set(value: &str) -> bool {
    value == "true"
}
