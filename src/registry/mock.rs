//! Mock release source for testing the planner without network calls.

use super::ReleaseSource;
use crate::error::{BumpError, Result};
use crate::version::GoVersion;
use async_trait::async_trait;
use std::collections::HashMap;

/// A release source that serves pre-configured releases and checksums.
#[derive(Default)]
pub struct MockReleaseSource {
    releases: Vec<GoVersion>,
    checksums: HashMap<GoVersion, String>,
    /// Fail every catalog fetch when set
    offline: bool,
}

impl MockReleaseSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a published release with a checksum derived from its name.
    pub fn with_release(self, version: &str) -> Self {
        let checksum = format!("sha-{}", version);
        self.with_release_and_checksum(version, &checksum)
    }

    pub fn with_release_and_checksum(mut self, version: &str, checksum: &str) -> Self {
        let version = GoVersion::parse(version).expect("invalid mock release");
        self.releases.push(version);
        self.checksums.insert(version, checksum.to_string());
        self
    }

    /// Add a published release whose checksum cannot be fetched.
    pub fn with_release_without_checksum(mut self, version: &str) -> Self {
        self.releases
            .push(GoVersion::parse(version).expect("invalid mock release"));
        self
    }

    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }
}

#[async_trait]
impl ReleaseSource for MockReleaseSource {
    async fn list_releases(&self) -> Result<Vec<GoVersion>> {
        if self.offline {
            return Err(BumpError::SourceUnavailable {
                url: self.location(),
                reason: "offline".to_string(),
            });
        }
        Ok(self.releases.clone())
    }

    async fn checksum(&self, version: &GoVersion) -> Result<String> {
        self.checksums
            .get(version)
            .cloned()
            .ok_or_else(|| BumpError::ChecksumUnavailable {
                version: version.to_string(),
                reason: "not published".to_string(),
            })
    }

    async fn exists(&self, version: &GoVersion) -> Result<bool> {
        Ok(self.releases.contains(version))
    }

    fn location(&self) -> String {
        "mock".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_source_basic() {
        let source = MockReleaseSource::new()
            .with_release("1.22.3")
            .with_release_and_checksum("1.23.1", "deadbeef");

        assert_eq!(
            source.list_releases().await.unwrap(),
            vec![GoVersion::new(22, 3), GoVersion::new(23, 1)]
        );
        assert_eq!(
            source.checksum(&GoVersion::new(22, 3)).await.unwrap(),
            "sha-1.22.3"
        );
        assert_eq!(
            source.checksum(&GoVersion::new(23, 1)).await.unwrap(),
            "deadbeef"
        );
        assert!(source.checksum(&GoVersion::new(24, 0)).await.is_err());
        assert!(source.exists(&GoVersion::new(23, 1)).await.unwrap());
        assert!(!source.exists(&GoVersion::new(23, 2)).await.unwrap());
    }

    #[tokio::test]
    async fn test_mock_source_offline() {
        let source = MockReleaseSource::new().with_release("1.22.3").offline();
        assert!(matches!(
            source.list_releases().await,
            Err(BumpError::SourceUnavailable { .. })
        ));
    }
}
