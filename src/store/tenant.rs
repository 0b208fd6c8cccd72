//! Tenant id → log file mapping.
//!
//! The tenant id is trusted to be a filesystem-safe token. It is only checked
//! for emptiness, so ids containing separators or `..` resolve outside the
//! log directory. The HTTP layer only ever passes a single path segment.

use std::path::{Path, PathBuf};

use crate::store::error::{StoreError, StoreResult};

/// Extension of every tenant log file.
pub const LOG_EXTENSION: &str = "log";

/// Maps tenant identifiers to `{log_dir}/{tenant}.log`.
#[derive(Debug, Clone)]
pub struct TenantResolver {
    log_dir: PathBuf,
}

impl TenantResolver {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
        }
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Path of the tenant's log file.
    pub fn resolve(&self, tenant: &str) -> StoreResult<PathBuf> {
        if tenant.is_empty() {
            return Err(StoreError::InvalidTenant);
        }
        Ok(self.log_dir.join(format!("{tenant}.{LOG_EXTENSION}")))
    }

    /// Inverse of [`resolve`](Self::resolve) for directory entries.
    pub fn tenant_of(&self, path: &Path) -> Option<String> {
        if path.extension()? != LOG_EXTENSION {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        (!stem.is_empty()).then(|| stem.to_string())
    }
}
