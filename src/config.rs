//! Configuration file (dataform-viz.toml)

use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "dataform-viz.toml";

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_index() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Dependency report to read when none is given on the command line
    #[serde(default)]
    pub report: Option<PathBuf>,

    /// Root directory for the per-schema diagram directories
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Glob patterns of schemas to skip
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Write per-schema and master index pages
    #[serde(default = "default_index")]
    pub index: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            report: None,
            output_dir: default_output_dir(),
            exclude: Vec::new(),
            index: default_index(),
        }
    }
}

impl Config {
    /// Load config from TOML file. Relative paths inside it are resolved
    /// against the file's directory.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&contents)?;

        if let Some(base) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            config.output_dir = base.join(&config.output_dir);
            config.report = config.report.map(|r| base.join(r));
        }
        Ok(config)
    }

    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load `path` if given, else the default file if present, else defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::from_file(p),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))
            }
            None => Ok(Self::default()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(String),
}
