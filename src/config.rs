//! Configuration file support for builder-bumper
//!
//! Supports `.bumperrc.toml` and `bumper.toml` configuration files. Every key
//! is optional; the defaults describe the prometheus/golang-builder layout.
//!
//! Example configuration:
//! ```toml
//! # Where the release feed lives
//! release_url = "https://go.dev/dl/?mode=json"
//!
//! # Image references rewritten on a major rotation
//! image_prefix = "quay.io/prometheus/golang-builder:"
//!
//! # Discover new releases by probing archives instead of reading the feed
//! discovery = "probe"
//! ```

use crate::registry::{DEFAULT_ARCHIVE_SUFFIX, DEFAULT_DOWNLOAD_URL, DEFAULT_RELEASE_URL};
use crate::error::{BumpError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Config files are tiny; anything past 1 MB is a mistake
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// How the planner finds out which releases have shipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Discovery {
    /// Fetch the release catalog once and look versions up in it
    #[default]
    Catalog,
    /// Probe candidate releases one by one
    Probe,
}

/// Configuration loaded from .bumperrc.toml or bumper.toml
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BumperConfig {
    /// JSON feed listing published releases
    pub release_url: String,
    /// Base URL of the release archives and their `.sha256` files
    pub download_url: String,
    /// Archive flavour whose checksum is pinned in the Dockerfiles
    pub archive_suffix: String,
    /// Marker file inside each line directory holding `VERSION := 1.N.M`
    pub marker_file: String,
    /// Base image Dockerfile inside each line directory
    pub base_dockerfile: String,
    /// Token preceding the full version in Dockerfiles
    pub golang_version_prefix: String,
    /// Token preceding the line id in image references
    pub image_prefix: String,
    /// CI descriptor at the repository root
    pub ci_config: String,
    /// Top-level build file
    pub build_file: String,
    /// Top-level readme
    pub readme: String,
    pub discovery: Discovery,
}

impl Default for BumperConfig {
    fn default() -> Self {
        Self {
            release_url: DEFAULT_RELEASE_URL.to_string(),
            download_url: DEFAULT_DOWNLOAD_URL.to_string(),
            archive_suffix: DEFAULT_ARCHIVE_SUFFIX.to_string(),
            marker_file: "Makefile.COMMON".to_string(),
            base_dockerfile: "base/Dockerfile".to_string(),
            golang_version_prefix: "GOLANG_VERSION ".to_string(),
            image_prefix: "quay.io/prometheus/golang-builder:".to_string(),
            ci_config: ".circleci/config.yml".to_string(),
            build_file: "Makefile".to_string(),
            readme: "README.md".to_string(),
            discovery: Discovery::Catalog,
        }
    }
}

impl BumperConfig {
    const FILE_NAMES: [&'static str; 2] = [".bumperrc.toml", "bumper.toml"];

    /// Find the closest loadable config file in `start_dir` or its parents.
    ///
    /// A config file that cannot be loaded is skipped with a warning.
    pub fn discover(start_dir: &Path) -> Option<(Self, PathBuf)> {
        for dir in start_dir.ancestors() {
            for name in Self::FILE_NAMES {
                let path = dir.join(name);
                if !path.is_file() {
                    continue;
                }
                match Self::load(&path) {
                    Ok(config) => return Some((config, path)),
                    Err(err) => warn!(%err, "ignoring config file"),
                }
            }
        }
        None
    }

    /// Load one config file; unknown keys are rejected.
    pub fn load(path: &Path) -> Result<Self> {
        let metadata = fs::metadata(path).map_err(|e| BumpError::io(path, e))?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(BumpError::InvalidConfig {
                path: path.to_path_buf(),
                reason: format!(
                    "{} bytes, the limit is {} bytes",
                    metadata.len(),
                    MAX_CONFIG_FILE_SIZE
                ),
            });
        }

        let content = fs::read_to_string(path).map_err(|e| BumpError::io(path, e))?;
        toml::from_str(&content).map_err(|e| BumpError::InvalidConfig {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}
