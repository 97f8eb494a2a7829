use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub const LOCAL_CONFIG_FILE: &str = "facematch.toml";
pub const DEFAULT_SOURCE_IMAGE: &str = "a.png";
pub const DEFAULT_TARGET_IMAGE: &str = "b.png";
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 70.0;
pub const DEFAULT_CALL_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct ConfigFile {
    pub source_image: Option<PathBuf>,
    pub target_image: Option<PathBuf>,
    pub similarity_threshold: Option<f32>,
    pub region: Option<String>,
    pub profile: Option<String>,
    pub endpoint_url: Option<String>,
    pub call_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub source_image: PathBuf,
    pub target_image: PathBuf,
    pub similarity_threshold: f32,
    pub region: Option<String>,
    pub profile: Option<String>,
    pub endpoint_url: Option<String>,
    pub call_timeout: Duration,
}

impl ResolvedConfig {
    pub fn from_raw(raw: ConfigFile) -> Self {
        Self {
            source_image: raw
                .source_image
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE_IMAGE)),
            target_image: raw
                .target_image
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TARGET_IMAGE)),
            similarity_threshold: raw
                .similarity_threshold
                .unwrap_or(DEFAULT_SIMILARITY_THRESHOLD),
            region: raw.region,
            profile: raw.profile,
            endpoint_url: raw.endpoint_url,
            call_timeout: Duration::from_secs(
                raw.call_timeout_secs
                    .unwrap_or(DEFAULT_CALL_TIMEOUT_SECS)
                    .max(1),
            ),
        }
    }
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self::from_raw(ConfigFile::default())
    }
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub contents: ConfigFile,
    pub source: PathBuf,
}

impl LoadedConfig {
    pub fn new(contents: ConfigFile, source: PathBuf) -> Self {
        Self { contents, source }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Candidate config locations, highest priority first.
///
/// An explicit path replaces the search entirely; otherwise the working
/// directory is consulted before the per-user config directory.
pub fn config_search_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    if let Some(path) = explicit {
        return vec![path.to_path_buf()];
    }

    let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("facematch").join("config.toml"));
    }
    paths
}

pub fn load_config(explicit: Option<&Path>) -> Result<Option<LoadedConfig>, ConfigError> {
    match explicit {
        // A missing explicit file is an error rather than a silent fallback.
        Some(path) => read_config(path).map(Some),
        None => load_from_paths(&config_search_paths(None)),
    }
}

pub fn load_from_paths(paths: &[PathBuf]) -> Result<Option<LoadedConfig>, ConfigError> {
    for path in paths {
        match read_config(path) {
            Ok(loaded) => return Ok(Some(loaded)),
            Err(ConfigError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                continue
            }
            Err(err) => return Err(err),
        }
    }

    Ok(None)
}

fn read_config(path: &Path) -> Result<LoadedConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed = toml::from_str::<ConfigFile>(&contents).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    Ok(LoadedConfig::new(parsed, path.to_path_buf()))
}
