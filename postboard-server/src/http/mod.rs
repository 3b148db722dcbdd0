//! HTTP server layer
//!
//! Axum server with:
//! - Request tracing
//! - Graceful shutdown, followed by store shutdown
//! - JSON error responses

pub mod server;
pub mod error;
pub mod extractors;
pub mod routes;

pub use server::{build_router, run_server, AppState, ServerConfig, ServerError};
pub use error::ApiError;
