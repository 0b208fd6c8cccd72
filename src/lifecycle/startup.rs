//! Startup orchestration.
//!
//! # Responsibilities
//! - Apply command-line overrides on top of the loaded configuration
//! - Make sure the log directory exists before traffic arrives
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::{validate_config, AppConfig, ValidationError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("cannot create log directory {path}: {source}")]
    LogDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("log directory {0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("invalid configuration after overrides: {0:?}")]
    Invalid(Vec<ValidationError>),
}

/// Values given on the command line that replace config file entries.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub bind_address: Option<String>,
    pub log_dir: Option<PathBuf>,
}

/// Merge overrides into `config` and re-validate.
pub fn apply_overrides(mut config: AppConfig, overrides: Overrides) -> Result<AppConfig, StartupError> {
    if let Some(bind) = overrides.bind_address {
        config.listener.bind_address = bind;
    }
    if let Some(dir) = overrides.log_dir {
        config.storage.log_dir = dir;
    }
    validate_config(&config).map_err(StartupError::Invalid)?;
    Ok(config)
}

/// Create the log directory if configured to, and check it is usable.
pub fn prepare_log_dir(config: &AppConfig) -> Result<(), StartupError> {
    let dir: &Path = &config.storage.log_dir;
    if config.storage.create_dir {
        fs::create_dir_all(dir).map_err(|source| StartupError::LogDir {
            path: dir.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %dir.display(), "Log directory ready");
    }
    if dir.exists() && !dir.is_dir() {
        return Err(StartupError::NotADirectory(dir.to_path_buf()));
    }
    if !dir.exists() {
        tracing::warn!(path = %dir.display(), "Log directory does not exist; appends will fail");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_config_values() {
        let config = apply_overrides(
            AppConfig::default(),
            Overrides {
                bind_address: Some("127.0.0.1:7000".into()),
                log_dir: Some(PathBuf::from("/tmp/shops")),
            },
        )
        .unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:7000");
        assert_eq!(config.storage.log_dir, PathBuf::from("/tmp/shops"));
    }

    #[test]
    fn test_bad_override_is_rejected() {
        let err = apply_overrides(
            AppConfig::default(),
            Overrides {
                bind_address: Some("nope".into()),
                log_dir: None,
            },
        )
        .unwrap_err();
        assert!(matches!(err, StartupError::Invalid(_)));
    }

    #[test]
    fn test_prepare_creates_nested_directory() {
        let root = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.storage.log_dir = root.path().join("a/b/logs");

        prepare_log_dir(&config).unwrap();
        assert!(config.storage.log_dir.is_dir());
    }

    #[test]
    fn test_prepare_rejects_file_in_place_of_directory() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("logs");
        fs::write(&file, "").unwrap();

        let mut config = AppConfig::default();
        config.storage.log_dir = file;
        config.storage.create_dir = false;

        assert!(matches!(
            prepare_log_dir(&config),
            Err(StartupError::NotADirectory(_))
        ));
    }
}
