//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check settings that only make sense together (auth token when enabled)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<InvalidSetting>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::ServiceConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidSetting {
    /// Dotted path of the offending key, e.g. `api.base_path`.
    pub field: &'static str,
    pub reason: String,
}

impl fmt::Display for InvalidSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<InvalidSetting>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(InvalidSetting {
            field: "listener.bind_address",
            reason: format!("'{}' is not a socket address", config.listener.bind_address),
        });
    }

    let base = &config.api.base_path;
    if !base.starts_with('/') || !base.ends_with('/') {
        errors.push(InvalidSetting {
            field: "api.base_path",
            reason: format!("'{}' must start and end with '/'", base),
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(InvalidSetting {
            field: "timeouts.request_secs",
            reason: "must be greater than zero".into(),
        });
    }

    if config.timeouts.upstream_secs == 0 {
        errors.push(InvalidSetting {
            field: "timeouts.upstream_secs",
            reason: "must be greater than zero".into(),
        });
    }

    if config.security.max_body_size == 0 {
        errors.push(InvalidSetting {
            field: "security.max_body_size",
            reason: "must be greater than zero".into(),
        });
    }

    if config.auth.enabled && config.auth.internal_access_token.is_empty() {
        errors.push(InvalidSetting {
            field: "auth.internal_access_token",
            reason: "required when auth is enabled".into(),
        });
    }

    if config.storage.certificate_root.trim().is_empty() {
        errors.push(InvalidSetting {
            field: "storage.certificate_root",
            reason: "must not be empty".into(),
        });
    }

    if let Some(base) = &config.storage.remote_base_url {
        let usable = url::Url::parse(base)
            .is_ok_and(|u| matches!(u.scheme(), "http" | "https") && u.path().ends_with('/'));
        if !usable {
            errors.push(InvalidSetting {
                field: "storage.remote_base_url",
                reason: format!("'{}' must be an http(s) URL ending with '/'", base),
            });
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(InvalidSetting {
            field: "observability.metrics_address",
            reason: format!(
                "'{}' is not a socket address",
                config.observability.metrics_address
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
