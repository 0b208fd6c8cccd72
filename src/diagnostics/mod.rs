//! Synthetic diagnostic endpoints.
//!
//! Neither behaviour touches the log store. They exist so that a calling
//! integration can test its own error handling and timeout/retry logic.

pub mod endpoints;

pub use endpoints::{Diagnostics, ForcedErrorPayload, IntegrationStamp, SlowPayload};
