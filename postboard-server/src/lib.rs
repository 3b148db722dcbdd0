//! postboard-server: users and posts over HTTP, stored in MongoDB
//!
//! Layers, leaves first:
//! - `models`: record shapes and input validation
//! - `db`: the `Store` trait, its MongoDB and in-memory adapters, repositories
//! - `export`: streams every post into a text file
//! - `http`: axum router, handlers and server lifecycle

pub mod db;
pub mod export;
pub mod http;
pub mod models;

pub use db::{DbError, MemoryStore, MongoStore, Store};
pub use http::{build_router, run_server, AppState, ServerConfig};
