//! CLI module for the `endpoints` binary.
//!
//! Commands:
//! - list: full manifest (json, lambda or table)
//! - show: one endpoint by route and verb
//! - inspect: describe a single script file

use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::Write as _;
use std::path::PathBuf;

use crate::error::Result;
use crate::manifest::EndpointDescriptor;

#[derive(Parser)]
#[command(name = "endpoints")]
#[command(about = "Static endpoint discovery for folder-routed scripts")]
pub struct Cli {
    /// Root directory (default: current directory)
    #[arg(short, long, default_value = ".")]
    pub root: PathBuf,

    /// Config file (default: <root>/.endpoints/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List every endpoint below the root
    List {
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,
    },

    /// Show one endpoint
    Show {
        /// Route, with or without the namespace (e.g. modules/shop/items)
        route: String,

        /// HTTP verb: get, post, put or delete
        verb: String,

        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,
    },

    /// Describe a single endpoint file
    Inspect {
        /// Path to a `<name>.<verb>.<ext>` file below the root
        file: PathBuf,

        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,
    },

    /// Show version
    #[command(hide = true)]
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// Indented node form
    Lambda,
    /// One line per endpoint
    Table,
}

/// Render descriptors in the requested format.
pub fn render(endpoints: &[EndpointDescriptor], format: OutputFormat) -> Result<String> {
    let out = match format {
        OutputFormat::Json => serde_json::to_string_pretty(endpoints)?,
        OutputFormat::Lambda => endpoints.iter().map(|e| e.to_node().to_string()).collect(),
        OutputFormat::Table => {
            let mut out = String::new();
            for e in endpoints {
                let kind = e.kind.map(|k| k.as_str()).unwrap_or("-");
                let auth = e.auth.as_ref().map(|a| a.join(",")).unwrap_or_default();
                let _ = writeln!(
                    out,
                    "{:<7} {:<48} {:<16} {}",
                    e.verb.as_str().to_uppercase(),
                    e.path,
                    kind,
                    auth
                );
            }
            out
        }
    };
    Ok(out)
}
