//! Forced-error and forced-delay behaviours.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::time::Duration;

use crate::config::{DiagnosticsConfig, IntegrationConfig};

/// Success payload identifying this integration to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct IntegrationStamp {
    pub name: String,
    /// Current UTC time, RFC3339 with `Z`.
    pub time: String,
    pub version: String,
}

impl IntegrationStamp {
    pub fn now(integration: &IntegrationConfig) -> Self {
        Self {
            name: integration.name.clone(),
            time: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            version: integration.version.clone(),
        }
    }
}

/// Body of the forced 500 response.
#[derive(Debug, Clone, Serialize)]
pub struct ForcedErrorPayload {
    pub status: &'static str,
    pub message: &'static str,
}

/// Body of the delayed 200 response.
#[derive(Debug, Clone, Serialize)]
pub struct SlowPayload {
    #[serde(flatten)]
    pub stamp: IntegrationStamp,
    pub text: String,
}

/// Stateless synthetic endpoints for exercising caller timeouts and error paths.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    delay: Duration,
    integration: IntegrationConfig,
}

impl Diagnostics {
    pub fn new(config: &DiagnosticsConfig, integration: &IntegrationConfig) -> Self {
        Self {
            delay: config.slow_response(),
            integration: integration.clone(),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Always the same server-error payload.
    pub fn forced_error(&self) -> ForcedErrorPayload {
        ForcedErrorPayload {
            status: "500",
            message: "Внутренняя ошибка сервера",
        }
    }

    /// Sleep for the configured delay, suspending only the calling task.
    pub async fn forced_delay(&self) -> SlowPayload {
        tokio::time::sleep(self.delay).await;
        SlowPayload {
            stamp: IntegrationStamp::now(&self.integration),
            text: format!("Этот ответ занял {} секунд", self.delay.as_secs()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn diagnostics(secs: u64) -> Diagnostics {
        Diagnostics::new(
            &DiagnosticsConfig {
                slow_response_secs: secs,
            },
            &IntegrationConfig::default(),
        )
    }

    #[test]
    fn test_forced_error_payload() {
        let payload = serde_json::to_value(diagnostics(0).forced_error()).unwrap();
        assert_eq!(
            payload,
            serde_json::json!({"status": "500", "message": "Внутренняя ошибка сервера"})
        );
    }

    #[test]
    fn test_stamp_time_is_utc_seconds() {
        let stamp = IntegrationStamp::now(&IntegrationConfig::default());
        assert!(stamp.time.ends_with('Z'));
        assert!(!stamp.time.contains('.'));
        assert_eq!(stamp.name, "Тестовая интеграция");
    }

    #[tokio::test]
    async fn test_forced_delay_waits_for_configured_time() {
        let start = Instant::now();
        let payload = diagnostics(1).forced_delay().await;
        assert!(start.elapsed() >= Duration::from_secs(1));
        assert_eq!(payload.text, "Этот ответ занял 1 секунд");

        let json = serde_json::to_value(&payload).unwrap();
        for key in ["name", "time", "version", "text"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }

    #[tokio::test]
    async fn test_forced_delay_does_not_block_other_tasks() {
        let slow = tokio::spawn(async { diagnostics(1).forced_delay().await });
        let start = Instant::now();
        // The sleep below lets the delay task run on this single-threaded runtime.
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(start.elapsed() < Duration::from_millis(500));
        assert!(!slow.is_finished());
        slow.await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(1));
    }
}
