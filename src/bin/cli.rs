//! Endpoints CLI - static endpoint discovery.
//!
//! Usage:
//!   endpoints list                       # Manifest as JSON
//!   endpoints list --format table        # One line per endpoint
//!   endpoints show modules/shop/items get
//!   endpoints inspect modules/shop/items.get.hl

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use std::path::Path;

use lambda_endpoints::cli::{render, Cli, Commands};
use lambda_endpoints::scan::{classify, normalize, ScriptFile};
use lambda_endpoints::{describe_file, list_endpoints, EndpointsConfig, LambdaParser, Verb};

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let root = cli.root.canonicalize().unwrap_or(cli.root);
    let config_path = cli
        .config
        .unwrap_or_else(|| EndpointsConfig::default_path(&root));
    let config = EndpointsConfig::load(&config_path);

    match cli.command {
        Commands::List { format } => {
            let manifest = list_endpoints(&root, &config)
                .with_context(|| format!("listing endpoints under {}", root.display()))?;
            print!("{}", render(&manifest, format)?);
        }

        Commands::Show {
            route,
            verb,
            format,
        } => {
            let verb = Verb::from_segment(&verb.to_lowercase())
                .ok_or_else(|| anyhow!("unsupported verb '{}'", verb))?;
            let manifest = list_endpoints(&root, &config)?;
            let route = route.trim_matches('/');
            let prefixed = format!("{}/{}", config.namespace, route);
            let found: Vec<_> = manifest
                .into_iter()
                .filter(|e| e.verb == verb && (e.path == route || e.path == prefixed))
                .collect();
            if found.is_empty() {
                bail!("no endpoint {} {}", verb, route);
            }
            print!("{}", render(&found, format)?);
        }

        Commands::Inspect { file, format } => {
            let script = script_file(&root, &file, &config.extension)?;
            let descriptor = describe_file(&script, &config, &LambdaParser)?;
            print!("{}", render(&[descriptor], format)?);
        }

        Commands::Version => {
            println!("endpoints {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

/// Resolve a file argument against the root and apply the naming convention.
fn script_file(root: &Path, file: &Path, extension: &str) -> Result<ScriptFile> {
    let path = if file.is_absolute() {
        file.to_path_buf()
    } else {
        root.join(file)
    };
    let path = path.canonicalize().unwrap_or(path);
    let relative = path
        .strip_prefix(root)
        .with_context(|| format!("{} is outside {}", path.display(), root.display()))?;
    let (route, verb) = classify(&normalize(relative), extension).ok_or_else(|| {
        anyhow!(
            "{} is not named <route>.<verb>.{}",
            relative.display(),
            extension
        )
    })?;
    Ok(ScriptFile { path, route, verb })
}
