//! Deterministic walk over route folders.
//!
//! Entries are visited in pre-order with each folder's files ahead of its
//! sub-folders, both sorted by name. Illegal folders are pruned with
//! everything beneath them. Files directly inside the modules folder are not
//! endpoints. Any enumeration error ends the walk.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};
use walkdir::{DirEntry, FilterEntry, WalkDir};

use super::filename::{classify, is_legal_http_name, normalize, ScriptFile};
use crate::cancel::CancellationToken;
use crate::config::EndpointsConfig;
use crate::error::{ManifestError, Result};

type Walk = FilterEntry<walkdir::IntoIter, Box<dyn FnMut(&DirEntry) -> bool + Send>>;

/// Lazy iterator over endpoint files below `<root>/<modules_folder>`.
///
/// Yields at most one error, after which it is exhausted. Create a new
/// scanner to walk the tree again.
pub struct PathScanner {
    root: PathBuf,
    base: PathBuf,
    extension: String,
    legal: fn(&str) -> bool,
    token: CancellationToken,
    walk: Option<Walk>,
    done: bool,
}

impl PathScanner {
    pub fn new(root: &Path, config: &EndpointsConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            base: root.join(&config.modules_folder),
            extension: config.extension.clone(),
            legal: is_legal_http_name,
            token: CancellationToken::new(),
            walk: None,
            done: false,
        }
    }

    /// Replace the folder legality predicate.
    pub fn with_legal_name(mut self, legal: fn(&str) -> bool) -> Self {
        self.legal = legal;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    fn open(&self) -> Walk {
        let root = self.root.clone();
        let legal = self.legal;
        let keep: Box<dyn FnMut(&DirEntry) -> bool + Send> = Box::new(move |entry| {
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            let relative = relative_to(&root, entry.path());
            let keep = legal(&relative);
            if !keep {
                trace!(folder = %relative, "skipping illegal folder");
            }
            keep
        });
        WalkDir::new(&self.base)
            .sort_by(files_first)
            .into_iter()
            .filter_entry(keep)
    }

    fn walk_error(&self, err: walkdir::Error) -> ManifestError {
        let path = err
            .path()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.base.clone());
        ManifestError::io(path, err.into())
    }

    fn fail(&mut self, err: ManifestError) -> Option<Result<ScriptFile>> {
        self.done = true;
        self.walk = None;
        Some(Err(err))
    }
}

/// Files before folders, then by name.
fn files_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    (a.file_type().is_dir(), a.file_name()).cmp(&(b.file_type().is_dir(), b.file_name()))
}

fn relative_to(root: &Path, path: &Path) -> String {
    normalize(path.strip_prefix(root).unwrap_or(path))
}

impl Iterator for PathScanner {
    type Item = Result<ScriptFile>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.walk.is_none() {
            self.walk = Some(self.open());
        }
        loop {
            if self.token.is_cancelled() {
                warn!(root = %self.root.display(), "endpoint scan cancelled");
                return self.fail(ManifestError::Cancelled);
            }
            let entry = match self.walk.as_mut().and_then(|walk| walk.next()) {
                None => {
                    self.done = true;
                    self.walk = None;
                    return None;
                }
                Some(Err(e)) => {
                    let err = self.walk_error(e);
                    return self.fail(err);
                }
                Some(Ok(entry)) => entry,
            };
            if entry.file_type().is_dir() {
                if entry.depth() > 0 {
                    debug!(folder = %relative_to(&self.root, entry.path()), "scanning folder");
                }
                continue;
            }
            // Files at depth 1 sit directly in the modules folder. Symlinks are not followed.
            if entry.depth() < 2 || !entry.file_type().is_file() {
                continue;
            }
            let relative = relative_to(&self.root, entry.path());
            match classify(&relative, &self.extension) {
                Some((route, verb)) => {
                    return Some(Ok(ScriptFile {
                        path: entry.into_path(),
                        route,
                        verb,
                    }))
                }
                None => trace!(file = %relative, "skipping file outside naming convention"),
            }
        }
    }
}
