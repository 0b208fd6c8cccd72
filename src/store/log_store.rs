//! File-backed, append-only tenant logs.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use crate::config::{ReadPolicy, StorageConfig};
use crate::observability::metrics;
use crate::store::codec::{self, DecodeError};
use crate::store::error::{IoOp, StoreError, StoreResult};
use crate::store::record::LogRecord;
use crate::store::tenant::TenantResolver;

/// A line that was dropped under [`ReadPolicy::Skip`].
#[derive(Debug)]
pub struct SkippedLine {
    /// 1-based line number in the file.
    pub line: usize,
    pub error: DecodeError,
}

/// Outcome of reading a tenant log.
#[derive(Debug, Default)]
pub struct ReadReport {
    /// Decoded records in file order.
    pub records: Vec<LogRecord>,
    /// Lines dropped by the skip policy; always empty under strict.
    pub skipped: Vec<SkippedLine>,
}

/// Append, read and delete operations on per-tenant log files.
///
/// Holds no open handles and no cache: every call reopens the file, so a
/// clone can be moved into any task.
#[derive(Debug, Clone)]
pub struct LogStore {
    resolver: TenantResolver,
    policy: ReadPolicy,
}

impl LogStore {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            resolver: TenantResolver::new(&config.log_dir),
            policy: config.read_policy,
        }
    }

    pub fn resolver(&self) -> &TenantResolver {
        &self.resolver
    }

    pub fn policy(&self) -> ReadPolicy {
        self.policy
    }

    /// Append one record as a new line, creating the file if needed.
    pub fn append(&self, tenant: &str, record: &LogRecord) -> StoreResult<()> {
        let path = self.resolver.resolve(tenant)?;
        let mut line = codec::encode(record).map_err(StoreError::Encode)?;
        line.push('\n');

        let mut file = open_for_append(&path).map_err(StoreError::io(IoOp::Open))?;
        // A single write keeps concurrent appends from interleaving.
        file.write_all(line.as_bytes())
            .map_err(StoreError::io(IoOp::Write))?;

        metrics::record_append();
        tracing::debug!(tenant, path = %path.display(), bytes = line.len(), "Record appended");
        Ok(())
    }

    /// Every record of the tenant, in file order.
    pub fn read_all(&self, tenant: &str) -> StoreResult<Vec<LogRecord>> {
        self.read(tenant).map(|report| report.records)
    }

    /// Read the tenant log applying the configured decode policy.
    pub fn read(&self, tenant: &str) -> StoreResult<ReadReport> {
        let path = self.resolver.resolve(tenant)?;
        let content = fs::read(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound(tenant.to_string()),
            _ => StoreError::Io {
                op: IoOp::Read,
                source: e,
            },
        })?;

        let mut report = ReadReport::default();
        for (index, line) in content.split(|b| *b == b'\n').enumerate() {
            if line.trim_ascii().is_empty() {
                continue;
            }
            match codec::decode(line) {
                Ok(record) => report.records.push(record),
                Err(error) if self.policy == ReadPolicy::Skip => {
                    tracing::warn!(tenant, line = index + 1, error = %error, "Skipping malformed log line");
                    report.skipped.push(SkippedLine {
                        line: index + 1,
                        error,
                    });
                }
                Err(source) => {
                    return Err(StoreError::Decode {
                        line: index + 1,
                        source,
                    })
                }
            }
        }

        if !report.skipped.is_empty() {
            metrics::record_skipped_lines(report.skipped.len());
        }
        Ok(report)
    }

    /// Remove the tenant log.
    pub fn delete(&self, tenant: &str) -> StoreResult<()> {
        let path = self.resolver.resolve(tenant)?;
        fs::remove_file(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound(tenant.to_string()),
            _ => StoreError::Io {
                op: IoOp::Remove,
                source: e,
            },
        })?;

        tracing::debug!(tenant, path = %path.display(), "Log removed");
        Ok(())
    }

    /// Tenants that currently have a log file, sorted.
    pub fn tenants(&self) -> StoreResult<Vec<String>> {
        let entries = match fs::read_dir(self.resolver.log_dir()) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StoreError::Io {
                    op: IoOp::List,
                    source: e,
                })
            }
        };

        let mut tenants = Vec::new();
        for entry in entries {
            let entry = entry.map_err(StoreError::io(IoOp::List))?;
            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            if let Some(tenant) = self.resolver.tenant_of(&entry.path()) {
                tenants.push(tenant);
            }
        }
        tenants.sort();
        Ok(tenants)
    }
}

fn open_for_append(path: &Path) -> io::Result<fs::File> {
    let mut options = OpenOptions::new();
    options.create(true).append(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }
    options.open(path)
}
