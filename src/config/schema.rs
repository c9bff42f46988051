//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Environment variable overriding [`ApiConfig::base_path`].
pub const BASE_PATH_ENV: &str = "APPLICATION_BASE_URL";

/// Root configuration for the project service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Public API surface (base path).
    pub api: ApiConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request size limits.
    pub security: SecurityConfig,

    /// Authenticator settings.
    pub auth: AuthConfig,

    /// Where certificate files are served from.
    pub storage: StorageConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl ServiceConfig {
    /// Apply overrides taken from the process environment.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(base_path) = std::env::var(BASE_PATH_ENV) {
            if !base_path.trim().is_empty() {
                self.api.base_path = base_path.trim().to_string();
            }
        }
        self
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:4000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:4000".to_string(),
        }
    }
}

/// API surface configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Prefix every dispatched route lives under, e.g. "/project/".
    pub base_path: String,
}

impl ApiConfig {
    /// Base path in the form axum expects for nesting ("/project"), or
    /// `None` when the API is mounted at the root.
    pub fn mount_point(&self) -> Option<String> {
        let trimmed = self.base_path.trim_end_matches('/');
        if trimmed.is_empty() {
            None
        } else if trimmed.starts_with('/') {
            Some(trimmed.to_string())
        } else {
            Some(format!("/{}", trimmed))
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_path: "/project/".to_string(),
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,

    /// Timeout for outbound fetches of remote files, in seconds.
    pub upstream_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            upstream_secs: 60,
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Authenticator configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Require the internal access token on every dispatched request.
    pub enabled: bool,

    /// Expected value of the `internal-access-token` header.
    pub internal_access_token: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            internal_access_token: String::new(),
        }
    }
}

/// Certificate file storage.
///
/// Documents only name a file (`fileName`); its location is always derived
/// from these settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory local certificate files are served from.
    pub certificate_root: String,

    /// When set, files are fetched from below this URL instead of the
    /// local directory. Must end with '/'.
    pub remote_base_url: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            certificate_root: "./certificates".to_string(),
            remote_base_url: None,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
