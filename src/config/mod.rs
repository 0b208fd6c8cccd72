//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) + CLI overrides
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → handed by value to the store, renderer and server at startup
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup and never changes afterwards
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    AppConfig, DiagnosticsConfig, IntegrationConfig, LimitsConfig, ListenerConfig, LogFormat,
    ObservabilityConfig, ReadPolicy, RenderConfig, StorageConfig,
};
pub use validation::{validate_config, ValidationError};
