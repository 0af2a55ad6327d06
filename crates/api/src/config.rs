use talentdeck_storage::ImageLimits;

use crate::auth::jwt::JwtConfig;

/// Default cap on uploaded file size: 10 MiB.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Externally visible base URL, used when building media API paths.
    pub public_base_url: String,
    /// Maximum accepted upload size in bytes (default: 10 MiB).
    pub max_upload_bytes: usize,
    /// When the object store misses every candidate key, redirect to a
    /// presigned URL instead of answering 500 (default: `false`).
    pub signed_url_fallback: bool,
    /// Resize bounds for the upload pipeline.
    pub image_limits: ImageLimits,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                  |
    /// |-------------------------------|--------------------------|
    /// | `HOST`                        | `0.0.0.0`                |
    /// | `PORT`                        | `3000`                   |
    /// | `CORS_ORIGINS`                | `http://localhost:5173`  |
    /// | `REQUEST_TIMEOUT_SECS`        | `30`                     |
    /// | `PUBLIC_BASE_URL`             | `http://localhost:3000`  |
    /// | `MAX_UPLOAD_BYTES`            | `10485760`               |
    /// | `STORAGE_SIGNED_URL_FALLBACK` | `false`                  |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .trim_end_matches('/')
            .to_string();

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_BYTES.to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let signed_url_fallback = std::env::var("STORAGE_SIGNED_URL_FALLBACK")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            public_base_url,
            max_upload_bytes,
            signed_url_fallback,
            image_limits: ImageLimits::default(),
            jwt,
        }
    }
}
