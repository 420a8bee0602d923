//! Interpreter configuration
//!
//! Loaded from TOML:
//!
//! ```toml
//! max_call_depth = 256
//! arity = "strict"
//! ```

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default bound on simultaneously active calls
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1024;

/// How calls treat a mismatch between parameters and arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArityPolicy {
    /// Missing arguments bind `undefined`, extra arguments are dropped
    #[default]
    Lenient,
    /// Any mismatch is a fault
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub max_call_depth: usize,
    pub arity: ArityPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            arity: ArityPolicy::default(),
        }
    }
}

#[derive(Error, Debug, Diagnostic)]
pub enum ConfigError {
    #[error("Failed to read configuration file {}", path.display())]
    #[diagnostic(code(config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    #[diagnostic(code(config::parse))]
    Parse(#[from] toml::de::Error),

    #[error("`max_call_depth` must be at least 1")]
    #[diagnostic(code(config::zero_depth))]
    ZeroCallDepth,
}

impl Config {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(source)?;
        config.validate()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loaded configuration from {:?}", path);
        Self::from_toml_str(&source)
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.max_call_depth == 0 {
            return Err(ConfigError::ZeroCallDepth);
        }
        Ok(self)
    }

    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    pub fn with_arity(mut self, arity: ArityPolicy) -> Self {
        self.arity = arity;
        self
    }
}
