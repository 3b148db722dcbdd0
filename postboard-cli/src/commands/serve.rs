//! HTTP server command
//!
//! Connects to MongoDB (fatal on failure), ensures indexes, then serves until
//! Ctrl+C/SIGTERM.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use postboard_server::export::DEFAULT_EXPORT_PATH;
use postboard_server::http::server::DEFAULT_PORT;
use postboard_server::{run_server, MongoStore, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// MongoDB connection string (required)
    #[arg(long, env = "MONGO_URI", hide_env_values = true)]
    pub mongo_uri: Option<String>,

    /// Database name (default: the one in the URI, else "test")
    #[arg(long, env = "MONGO_DB")]
    pub database: Option<String>,

    /// Port to listen on
    #[arg(long, short = 'p', env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Address to bind to
    #[arg(long, env = "POSTBOARD_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// File written by GET /posts/export
    #[arg(long, env = "EXPORT_PATH", default_value = DEFAULT_EXPORT_PATH)]
    pub export_path: PathBuf,
}

impl ServeArgs {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_addr: SocketAddr::new(self.host, self.port),
            export_path: self.export_path.clone(),
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let config = args.server_config();
    let mongo_uri = args
        .mongo_uri
        .context("MONGO_URI not set. Set via --mongo-uri, MONGO_URI env, or .env")?;

    let store = MongoStore::connect(&mongo_uri, args.database.as_deref())
        .await
        .context("Failed to connect to MongoDB")?;
    store
        .ensure_indexes()
        .await
        .context("Failed to create indexes")?;

    tracing::info!("Starting postboard server on {}", config.bind_addr);

    // Run server (blocks until shutdown)
    run_server(Arc::new(store), config)
        .await
        .context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: ServeArgs,
    }

    #[test]
    fn defaults_and_overrides() {
        let harness = Harness::try_parse_from([
            "serve",
            "--mongo-uri",
            "mongodb://localhost/blog",
            "--port",
            "8080",
        ])
        .unwrap();
        let config = harness.args.server_config();

        assert_eq!(harness.args.mongo_uri.as_deref(), Some("mongodb://localhost/blog"));
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.export_path, PathBuf::from("posts.txt"));
    }
}
