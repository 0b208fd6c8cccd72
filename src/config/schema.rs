//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration for the request log service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Log directory and read behaviour.
    pub storage: StorageConfig,

    /// HTML view settings.
    pub render: RenderConfig,

    /// Synthetic diagnostic endpoints.
    pub diagnostics: DiagnosticsConfig,

    /// Identity reported back to the calling integration.
    pub integration: IntegrationConfig,

    /// Request limits and timeouts.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// What to do when a stored line fails to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReadPolicy {
    /// The first malformed line fails the whole read.
    #[default]
    Strict,
    /// Malformed lines are reported and skipped.
    Skip,
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding one `<shop>.log` file per tenant.
    pub log_dir: PathBuf,

    /// Create `log_dir` at startup if it is missing.
    pub create_dir: bool,

    /// Decode policy for reads.
    pub read_policy: ReadPolicy,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("./logs"),
            create_dir: true,
            read_policy: ReadPolicy::Strict,
        }
    }
}

/// HTML view configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Escape tenant ids and record fields before embedding them in HTML.
    pub escape_html: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { escape_html: true }
    }
}

/// Diagnostic endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// How long the slow endpoint sleeps before answering, in seconds.
    pub slow_response_secs: u64,
}

impl DiagnosticsConfig {
    pub fn slow_response(&self) -> Duration {
        Duration::from_secs(self.slow_response_secs)
    }
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            slow_response_secs: 12,
        }
    }
}

/// Integration identity echoed in success payloads.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IntegrationConfig {
    pub name: String,
    pub version: String,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            name: "Тестовая интеграция".to_string(),
            version: "12312".to_string(),
        }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum accepted request body in bytes.
    pub max_body_size: usize,

    /// Request timeout (total time for request/response) in seconds.
    pub request_timeout_secs: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
            request_timeout_secs: 30,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human readable or JSON log lines.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
