//! Study Assistant configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main Study Assistant configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Bearer token verification
    #[serde(default)]
    pub auth: AuthConfig,

    /// Upload storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Content generation configuration
    #[serde(default)]
    pub generation: GenerationConfig,
}

impl AppConfig {
    /// Parse a TOML configuration document
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed CORS origins (empty = any)
    pub cors_origins: Vec<String>,

    /// Maximum accepted upload size in bytes
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            cors_origins: Vec::new(),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Bearer token verification configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 shared secret (at least 32 characters)
    pub jwt_secret: Option<String>,

    /// Required `iss` claim, if any
    pub issuer: Option<String>,
}

/// Upload storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory receiving content-addressed uploads
    pub uploads_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            uploads_dir: PathBuf::from("uploads"),
        }
    }
}

/// Content generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Simulated backend latency per call, in milliseconds
    pub latency_ms: u64,

    /// Flashcards produced per generation request
    pub flashcard_count: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            latency_ms: 0,
            flashcard_count: 5,
        }
    }
}
