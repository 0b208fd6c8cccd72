//! Per-shop HTTP request log.
//!
//! Captures requests sent to `/shop/{shop_id}` into an append-only JSON-lines
//! file per shop, and serves them back as JSON or an HTML table.

pub mod config;
pub mod diagnostics;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod render;
pub mod store;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use store::{LogRecord, LogStore, StoreError};
