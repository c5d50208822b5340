//! Manifest builder: scans a root directory and describes every endpoint.
//!
//! Walks route folders in deterministic order, parses each endpoint file,
//! and assembles the ordered manifest. Any fatal error aborts the whole
//! pass; no partial manifest is returned.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::crud::classify;
use super::metadata;
use super::types::{EndpointDescriptor, Verb};
use crate::cancel::CancellationToken;
use crate::config::{EndpointsConfig, Vocabulary};
use crate::error::{ManifestError, Result};
use crate::scan::{endpoint_path, PathScanner, ScriptFile};
use crate::script::{LambdaParser, Node, ScriptLoader};

/// List every endpoint below `root` using the default script parser.
pub fn list_endpoints(root: &Path, config: &EndpointsConfig) -> Result<Vec<EndpointDescriptor>> {
    list_endpoints_with(root, config, &LambdaParser, &CancellationToken::new())
}

/// List every endpoint below `root` with an explicit loader and
/// cancellation token.
pub fn list_endpoints_with(
    root: &Path,
    config: &EndpointsConfig,
    loader: &dyn ScriptLoader,
    token: &CancellationToken,
) -> Result<Vec<EndpointDescriptor>> {
    let scanner = PathScanner::new(root, config).with_cancellation(token.clone());

    let mut manifest = Vec::new();
    let mut seen: HashSet<(String, Verb)> = HashSet::new();
    for file in scanner {
        let file = file?;
        let descriptor = describe_file(&file, config, loader)?;
        if !seen.insert((descriptor.path.clone(), descriptor.verb)) {
            return Err(ManifestError::DuplicateEndpoint {
                path: descriptor.path,
                verb: descriptor.verb.to_string(),
            });
        }
        manifest.push(descriptor);
    }

    info!(
        root = %root.display(),
        endpoints = manifest.len(),
        "endpoint discovery complete"
    );
    Ok(manifest)
}

/// Run discovery on tokio's blocking pool so async hosts are not stalled.
pub async fn list_endpoints_blocking(
    root: PathBuf,
    config: EndpointsConfig,
    token: CancellationToken,
) -> Result<Vec<EndpointDescriptor>> {
    tokio::task::spawn_blocking(move || {
        list_endpoints_with(&root, &config, &LambdaParser, &token)
    })
    .await
    .map_err(|e| ManifestError::Worker(e.to_string()))?
}

/// Describe one scanned endpoint file.
pub fn describe_file(
    file: &ScriptFile,
    config: &EndpointsConfig,
    loader: &dyn ScriptLoader,
) -> Result<EndpointDescriptor> {
    let lambda = loader.load(&file.path)?;
    let descriptor = describe(
        &lambda,
        endpoint_path(&config.namespace, &file.route),
        file.verb,
        &config.vocabulary,
    );
    debug!(
        path = %descriptor.path,
        verb = %descriptor.verb,
        kind = ?descriptor.kind,
        "described endpoint"
    );
    Ok(descriptor)
}

/// Build a descriptor from an already parsed script.
pub fn describe(lambda: &Node, path: String, verb: Verb, vocabulary: &Vocabulary) -> EndpointDescriptor {
    let meta = metadata::extract(lambda, vocabulary);
    let schema = classify(lambda, verb, meta.input.as_deref(), vocabulary);

    EndpointDescriptor {
        path,
        verb,
        input: meta.input,
        auth: meta.auth,
        description: meta.description,
        returns: schema.returns,
        array: schema.array,
        kind: schema.kind,
    }
}
