//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, path from PROJECT_CONFIG)
//!     → loader.rs (parse & deserialize)
//!     → schema.rs (environment overrides, e.g. APPLICATION_BASE_URL)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_from_env, ConfigError};
pub use schema::{
    ApiConfig, AuthConfig, ListenerConfig, ObservabilityConfig, SecurityConfig, ServiceConfig,
    StorageConfig, TimeoutConfig,
};
