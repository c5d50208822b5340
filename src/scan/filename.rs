//! File and folder naming conventions.
//!
//! An endpoint file is named `<route>.<verb>.<ext>`, e.g. `items.get.hl`.

use std::path::{Path, PathBuf};

use crate::manifest::types::Verb;

/// An endpoint-eligible file found by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptFile {
    /// Path on disk.
    pub path: PathBuf,
    /// Route fragment relative to the scan root, `/`-separated, without verb
    /// or extension (e.g. `modules/shop/items`).
    pub route: String,
    pub verb: Verb,
}

/// Path as a string with `/` separators on every platform.
pub fn normalize(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Split a root-relative file path into route fragment and verb.
///
/// Returns `None` unless the path splits on `.` into exactly
/// `[route, verb, extension]` with a supported verb and the expected
/// extension.
pub fn classify(relative: &str, extension: &str) -> Option<(String, Verb)> {
    let entities: Vec<&str> = relative.split('.').collect();
    let [route, verb, ext] = entities.as_slice() else {
        return None;
    };
    if *ext != extension || route.is_empty() {
        return None;
    }
    let verb = Verb::from_segment(verb)?;
    Some((route.to_string(), verb))
}

/// Default legality predicate for folder paths used as route segments:
/// ASCII letters, digits, `-`, `_` and `/` only.
pub fn is_legal_http_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '/'))
}

/// Manifest path for a route fragment.
pub fn endpoint_path(namespace: &str, route: &str) -> String {
    if namespace.is_empty() {
        route.to_string()
    } else {
        format!("{}/{}", namespace.trim_end_matches('/'), route)
    }
}
