use super::{ReleaseSource, http_error_message};
use crate::error::{BumpError, Result};
use crate::version::GoVersion;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_RELEASE_URL: &str = "https://go.dev/dl/?mode=json";
pub const DEFAULT_DOWNLOAD_URL: &str = "https://dl.google.com/go";
pub const DEFAULT_ARCHIVE_SUFFIX: &str = "linux-amd64.tar.gz";

/// Release feed and archive checksums served by go.dev / dl.google.com.
pub struct GoDevReleaseSource {
    client: Client,
    release_url: String,
    download_url: String,
    archive_suffix: String,
}

#[derive(Debug, Deserialize)]
struct ReleaseEntry {
    version: String,
    #[serde(default = "default_stable")]
    stable: bool,
}

fn default_stable() -> bool {
    true
}

impl GoDevReleaseSource {
    pub fn new() -> Self {
        Self::with_endpoints(
            DEFAULT_RELEASE_URL.to_string(),
            DEFAULT_DOWNLOAD_URL.to_string(),
        )
    }

    pub fn with_endpoints(release_url: String, download_url: String) -> Self {
        let client = Client::builder()
            .gzip(true)
            .user_agent(concat!("builder-bumper/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            release_url,
            download_url: download_url.trim_end_matches('/').to_string(),
            archive_suffix: DEFAULT_ARCHIVE_SUFFIX.to_string(),
        }
    }

    /// Use a different archive flavour, e.g. `linux-arm64.tar.gz`
    pub fn with_archive_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.archive_suffix = suffix.into();
        self
    }

    /// URL of the release archive for `version`
    pub fn archive_url(&self, version: &GoVersion) -> String {
        format!(
            "{}/go{}.{}",
            self.download_url,
            version.full_string(),
            self.archive_suffix
        )
    }

    fn unavailable(&self, reason: impl Into<String>) -> BumpError {
        BumpError::SourceUnavailable {
            url: self.release_url.clone(),
            reason: reason.into(),
        }
    }

    /// Strip the "go" prefix from a feed entry like "go1.22.0"
    fn parse_entry(version: &str) -> Result<GoVersion> {
        GoVersion::parse(version.strip_prefix("go").unwrap_or(version))
    }
}

impl Default for GoDevReleaseSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReleaseSource for GoDevReleaseSource {
    async fn list_releases(&self) -> Result<Vec<GoVersion>> {
        let response = self
            .client
            .get(&self.release_url)
            .send()
            .await
            .map_err(|e| self.unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(self.unavailable(http_error_message(
                response.status(),
                "release catalog",
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.unavailable(e.to_string()))?;
        let entries: Vec<ReleaseEntry> = serde_json::from_slice(&body)
            .map_err(|e| self.unavailable(format!("invalid release catalog: {}", e)))?;

        let releases = entries
            .iter()
            .filter(|entry| entry.stable)
            .map(|entry| {
                Self::parse_entry(&entry.version).map_err(|e| self.unavailable(e.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(url = %self.release_url, num = releases.len(), "fetched release catalog");
        Ok(releases)
    }

    async fn checksum(&self, version: &GoVersion) -> Result<String> {
        let url = format!("{}.sha256", self.archive_url(version));
        let unavailable = |reason: String| BumpError::ChecksumUnavailable {
            version: version.to_string(),
            reason,
        };

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(unavailable(http_error_message(
                response.status(),
                &format!("checksum of go{}", version),
            )));
        }

        let body = response.text().await.map_err(|e| unavailable(e.to_string()))?;
        let checksum = body.trim();
        if checksum.is_empty() {
            return Err(unavailable(format!("empty response from {}", url)));
        }

        debug!(%version, %checksum, "fetched archive checksum");
        Ok(checksum.to_string())
    }

    async fn exists(&self, version: &GoVersion) -> Result<bool> {
        let url = self.archive_url(version);
        let response = self
            .client
            .head(&url)
            .send()
            .await
            .map_err(|e| BumpError::SourceUnavailable {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        match response.status() {
            status if status.is_success() => Ok(true),
            status if status == StatusCode::NOT_FOUND => Ok(false),
            status => Err(BumpError::SourceUnavailable {
                url,
                reason: http_error_message(status, &format!("go{} archive", version)),
            }),
        }
    }

    fn location(&self) -> String {
        self.release_url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn source_for(server: &MockServer) -> GoDevReleaseSource {
        GoDevReleaseSource::with_endpoints(
            format!("{}/dl/?mode=json", server.uri()),
            format!("{}/go/", server.uri()),
        )
    }

    #[test]
    fn test_parse_entry_strips_go_prefix() {
        assert_eq!(
            GoDevReleaseSource::parse_entry("go1.22.0").unwrap(),
            GoVersion::new(22, 0)
        );
        assert_eq!(
            GoDevReleaseSource::parse_entry("go1.20").unwrap(),
            GoVersion::new(20, 0)
        );
        assert!(GoDevReleaseSource::parse_entry("go1.23rc1").is_err());
    }

    #[test]
    fn test_archive_url() {
        let source = GoDevReleaseSource::new();
        assert_eq!(
            source.archive_url(&GoVersion::new(22, 3)),
            "https://dl.google.com/go/go1.22.3.linux-amd64.tar.gz"
        );
        assert_eq!(
            source.archive_url(&GoVersion::new(20, 0)),
            "https://dl.google.com/go/go1.20.linux-amd64.tar.gz"
        );

        let source = source.with_archive_suffix("linux-arm64.tar.gz");
        assert_eq!(
            source.archive_url(&GoVersion::new(23, 1)),
            "https://dl.google.com/go/go1.23.1.linux-arm64.tar.gz"
        );
    }

    #[tokio::test]
    async fn test_list_releases_skips_unstable() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/dl/"))
            .and(query_param("mode", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"[
                    {"version": "go1.23.2", "stable": true, "files": []},
                    {"version": "go1.24rc1", "stable": false, "files": []},
                    {"version": "go1.22.8", "stable": true, "files": []}
                ]"#,
            ))
            .expect(1)
            .mount(&mock_server)
            .await;

        let releases = source_for(&mock_server).list_releases().await.unwrap();
        assert_eq!(releases, vec![GoVersion::new(23, 2), GoVersion::new(22, 8)]);
    }

    #[tokio::test]
    async fn test_list_releases_server_error() {
        let mock_server = MockServer::start().await;

        // No retries: a single failing request fails the fetch
        Mock::given(method("GET"))
            .and(path("/dl/"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&mock_server)
            .await;

        let err = source_for(&mock_server).list_releases().await.unwrap_err();
        assert!(matches!(err, BumpError::SourceUnavailable { .. }));
        assert!(err.to_string().contains("HTTP 503"));
    }

    #[tokio::test]
    async fn test_list_releases_invalid_json() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/dl/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&mock_server)
            .await;

        let err = source_for(&mock_server).list_releases().await.unwrap_err();
        assert!(matches!(err, BumpError::SourceUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_checksum_is_trimmed() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/go/go1.22.3.linux-amd64.tar.gz.sha256"))
            .respond_with(ResponseTemplate::new(200).set_body_string("  abc123def\n"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let checksum = source_for(&mock_server)
            .checksum(&GoVersion::new(22, 3))
            .await
            .unwrap();
        assert_eq!(checksum, "abc123def");
    }

    #[tokio::test]
    async fn test_checksum_missing_release() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/go/go1.99.0.linux-amd64.tar.gz.sha256"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let err = source_for(&mock_server)
            .checksum(&GoVersion::new(99, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, BumpError::ChecksumUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_exists_probes_archive() {
        let mock_server = MockServer::start().await;

        Mock::given(method("HEAD"))
            .and(path("/go/go1.24.0.linux-amd64.tar.gz"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/go/go1.25.0.linux-amd64.tar.gz"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/go/go1.26.0.linux-amd64.tar.gz"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let source = source_for(&mock_server);
        assert!(source.exists(&GoVersion::new(24, 0)).await.unwrap());
        assert!(!source.exists(&GoVersion::new(25, 0)).await.unwrap());
        assert!(matches!(
            source.exists(&GoVersion::new(26, 0)).await,
            Err(BumpError::SourceUnavailable { .. })
        ));
    }
}
