//! Endpoints JSON-RPC server over STDIO.
//!
//! Usage:
//!   endpoints-mcp [root]
//!
//! If no root is given, uses the current working directory. Every tool call
//! re-scans the tree, so the answers track the files on disk.

use std::path::PathBuf;

use lambda_endpoints::mcp::server::{self, ServerContext};
use lambda_endpoints::EndpointsConfig;
use tracing::info;

fn main() {
    // Logs go to stderr; stdout carries the protocol.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let root = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    let config = EndpointsConfig::load(&EndpointsConfig::default_path(&root));
    info!(root = %root.display(), namespace = %config.namespace, "endpoints server ready");

    server::run(&ServerContext { root, config });
}
