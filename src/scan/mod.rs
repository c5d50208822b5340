//! Endpoint file discovery: folder walk and file-name conventions.

pub mod filename;
pub mod walker;

pub use filename::{classify, endpoint_path, is_legal_http_name, normalize, ScriptFile};
pub use walker::PathScanner;
