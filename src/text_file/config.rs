//! config: TOML description of a text file handler
//!
//! ```toml
//! path = "out/report.txt"
//! encoding = "iso-8859-1"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::Result;

/// Default encoding label when the config omits one
pub const DEFAULT_ENCODING: &str = "utf-8";

/// Path and encoding label used to build a `TextFile`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextFileConfig {
    pub path: PathBuf,
    #[serde(default = "default_encoding")]
    pub encoding: String,
}

fn default_encoding() -> String {
    DEFAULT_ENCODING.to_string()
}

impl TextFileConfig {
    pub fn new(path: impl Into<PathBuf>, encoding: impl Into<String>) -> Self {
        TextFileConfig {
            path: path.into(),
            encoding: encoding.into(),
        }
    }

    /// Parse a config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
