// model = "claude-opus-4-5"
// created = "2026-10-18"
// modified = "2026-10-18"
// driver = "Isaac Clayton"

//! Configuration loading from `rankseq.toml`.
//!
//! ```toml
//! [sequence]
//! step = 8
//! stride = 2
//! bucket = 0
//! ```
//!
//! Every key is optional and falls back to the defaults above.

use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use crate::sequence::SequenceConfig;

/// File name looked up in the working directory.
pub const CONFIG_FILE: &str = "rankseq.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// File this config came from, if any.
    #[serde(skip)]
    pub source: Option<PathBuf>,

    pub sequence: SequenceConfig,
}

impl Config {
    /// Parse config text.
    pub fn from_toml(text: &str) -> Result<Config, toml::de::Error> {
        return toml::from_str(text);
    }

    /// Load a config file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Config::from_toml(&text).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        config.source = Some(path.to_path_buf());
        return Ok(config);
    }

    /// Load `rankseq.toml` from `dir` if present, else the defaults.
    pub fn discover(dir: &Path) -> Result<Config, ConfigError> {
        let path = dir.join(CONFIG_FILE);
        if !path.is_file() {
            return Ok(Config::default());
        }
        tracing::debug!(path = %path.display(), "loading config");
        return Config::load(&path);
    }
}
