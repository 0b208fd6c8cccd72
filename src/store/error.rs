//! Store error taxonomy.

use std::fmt;
use std::io;
use thiserror::Error;

use crate::store::codec::DecodeError;

/// Filesystem step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOp {
    Open,
    Write,
    Read,
    Remove,
    List,
}

impl fmt::Display for IoOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IoOp::Open => "open",
            IoOp::Write => "write",
            IoOp::Read => "read",
            IoOp::Remove => "remove",
            IoOp::List => "list",
        };
        f.write_str(name)
    }
}

/// Errors that can occur during log store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The tenant identifier was empty.
    #[error("tenant identifier is empty")]
    InvalidTenant,

    /// No log file exists for the tenant.
    #[error("no log for tenant '{0}'")]
    NotFound(String),

    /// Any filesystem failure other than absence.
    #[error("{op} failed: {source}")]
    Io {
        op: IoOp,
        #[source]
        source: io::Error,
    },

    /// A stored line is not a valid record (1-based line number).
    #[error("line {line} is not a valid record: {source}")]
    Decode {
        line: usize,
        #[source]
        source: DecodeError,
    },

    /// The record could not be serialized.
    #[error("failed to encode record: {0}")]
    Encode(#[source] serde_json::Error),
}

impl StoreError {
    pub(crate) fn io(op: IoOp) -> impl FnOnce(io::Error) -> Self {
        move |source| StoreError::Io { op, source }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
