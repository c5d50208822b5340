//! Discovery configuration, loaded from `.endpoints/config.toml`.
//!
//! ```toml
//! modules_folder = "modules"
//! namespace = "magic"
//! extension = "hl"
//!
//! [vocabulary]
//! invoke_slots = ["wait.signal", "signal"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::{ManifestError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointsConfig {
    /// Folder below the root that holds route folders.
    pub modules_folder: String,
    /// Segment prefixed to every manifest path.
    pub namespace: String,
    /// Extension of endpoint script files, without the dot.
    pub extension: String,
    pub vocabulary: Vocabulary,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            modules_folder: "modules".to_string(),
            namespace: "magic".to_string(),
            extension: "hl".to_string(),
            vocabulary: Vocabulary::default(),
        }
    }
}

impl EndpointsConfig {
    /// Default config location for a root directory.
    pub fn default_path(root: &Path) -> PathBuf {
        root.join(".endpoints").join("config.toml")
    }

    /// Load config, falling back to defaults if the file is missing or invalid.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::try_load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring invalid config");
                Self::default()
            }
        }
    }

    pub fn try_load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ManifestError::io(path, e))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ManifestError::Config(e.to_string()))
    }
}

/// Reserved node names the classifier looks for in script trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    pub arguments: String,
    pub description: String,
    pub ticket_verify: String,
    pub is_statistics: String,
    /// Synonymous names of the invoke-slot-and-wait instruction.
    pub invoke_slots: Vec<String>,
    /// Dialect-specific raw SQL connection instructions.
    pub sql_connects: Vec<String>,
    pub select_suffix: String,
    /// Column name that marks a count query.
    pub count_column: String,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            arguments: ".arguments".to_string(),
            description: ".description".to_string(),
            ticket_verify: "auth.ticket.verify".to_string(),
            is_statistics: ".is-statistics".to_string(),
            invoke_slots: vec!["wait.signal".to_string(), "signal".to_string()],
            sql_connects: vec![
                "wait.mysql.connect".to_string(),
                "wait.mssql.connect".to_string(),
                "wait.pgsql.connect".to_string(),
            ],
            select_suffix: ".select".to_string(),
            count_column: "count(*) as count".to_string(),
        }
    }
}

impl Vocabulary {
    pub fn is_invoke_slot(&self, name: &str) -> bool {
        self.invoke_slots.iter().any(|s| s == name)
    }

    pub fn is_sql_connect(&self, name: &str) -> bool {
        self.sql_connects.iter().any(|s| s == name)
    }
}
