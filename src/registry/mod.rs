mod go_dev;
#[cfg(test)]
pub mod mock;

pub use go_dev::{
    DEFAULT_ARCHIVE_SUFFIX, DEFAULT_DOWNLOAD_URL, DEFAULT_RELEASE_URL, GoDevReleaseSource,
};
#[cfg(test)]
pub use mock::MockReleaseSource;

use crate::error::Result;
use crate::version::GoVersion;
use async_trait::async_trait;

/// Create a descriptive error message for HTTP failures
/// Helps users understand why a request failed and what to do
///
/// # Arguments
/// * `status` - HTTP status code
/// * `entity` - What was requested (e.g., "release catalog", "checksum of go1.22.3")
pub fn http_error_message(status: reqwest::StatusCode, entity: &str) -> String {
    let code = status.as_u16();
    match code {
        401 | 403 => format!(
            "Access denied for {} (HTTP {}). Check whether the endpoint requires credentials.",
            entity, code
        ),
        404 => format!(
            "{} not found (HTTP 404). The release may not be published yet.",
            entity
        ),
        408 | 504 => format!(
            "Request timed out for {} (HTTP {}). The server may be slow or unreachable.",
            entity, code
        ),
        429 => format!(
            "Rate limited while fetching {} (HTTP 429). Wait a moment and run again.",
            entity
        ),
        500..=599 => format!(
            "Server error for {} (HTTP {}). The server may be experiencing issues.",
            entity, code
        ),
        _ => format!(
            "Failed to fetch {}: HTTP {} {}",
            entity,
            code,
            status.canonical_reason().unwrap_or("Unknown error")
        ),
    }
}

/// Where published Go releases and their archive checksums come from.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Every currently published stable release.
    async fn list_releases(&self) -> Result<Vec<GoVersion>>;

    /// Published checksum of the release archive for `version`.
    async fn checksum(&self, version: &GoVersion) -> Result<String>;

    /// Whether `version` has been released. Absence is `Ok(false)`, not an error.
    async fn exists(&self, version: &GoVersion) -> Result<bool> {
        // Default: look it up in the catalog
        Ok(self.list_releases().await?.contains(version))
    }

    /// Endpoint description for logs and errors
    fn location(&self) -> String;
}
