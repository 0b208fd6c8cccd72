//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, header capture, metrics)
//!     → handlers.rs (shop id → log store / renderer / diagnostics)
//!     → response.rs (status + fixed message on failure)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuid, ReceivedHeaders, X_REQUEST_ID};
pub use server::{build_router, AppState, HttpServer};
