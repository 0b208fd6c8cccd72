//! Per-tenant request log storage.
//!
//! # Data Flow
//! ```text
//! append:   tenant id → tenant.rs (resolve path)
//!                     → codec.rs (encode one JSON line)
//!                     → log_store.rs (O_APPEND write of line + '\n')
//!
//! read:     tenant id → tenant.rs → read whole file
//!                     → split on '\n', drop blank lines
//!                     → codec.rs (decode each line, strict or skip)
//! ```
//!
//! # Concurrency
//! - No locks and no shared in-memory state; every call reopens the file
//! - Same-tenant appends rely on append-mode writes: each line stays intact,
//!   but the order between racing callers is whichever write lands first
//! - Reads are best effort: a read racing an append may see it or not
//! - A delete racing an append may be followed by the append recreating the
//!   file, or by the append failing with an I/O error

pub mod codec;
pub mod error;
pub mod log_store;
pub mod record;
pub mod tenant;

pub use codec::DecodeError;
pub use error::{IoOp, StoreError, StoreResult};
pub use log_store::{LogStore, ReadReport, SkippedLine};
pub use record::{HeaderMultimap, LogRecord};
pub use tenant::TenantResolver;
