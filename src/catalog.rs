//! The set of Go releases currently published upstream.

use crate::error::{BumpError, Result};
use crate::version::GoVersion;
use std::collections::BTreeSet;
use std::ops::Bound::{Excluded, Unbounded};

/// Every published release, fetched once per run.
#[derive(Debug, Clone)]
pub struct ReleaseCatalog {
    releases: BTreeSet<GoVersion>,
}

impl ReleaseCatalog {
    /// Build a catalog. An empty catalog is an error since no safe decision
    /// can be made without it.
    pub fn new(releases: impl IntoIterator<Item = GoVersion>, url: &str) -> Result<Self> {
        let releases: BTreeSet<_> = releases.into_iter().collect();
        if releases.is_empty() {
            return Err(BumpError::SourceUnavailable {
                url: url.to_string(),
                reason: "no releases published".to_string(),
            });
        }
        Ok(Self { releases })
    }

    pub fn len(&self) -> usize {
        self.releases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }

    pub fn contains(&self, version: &GoVersion) -> bool {
        self.releases.contains(version)
    }

    /// Whether any release of the given line has shipped.
    pub fn has_line(&self, major: u64) -> bool {
        self.releases.iter().any(|v| v.major == major)
    }

    /// Highest release of `pinned`'s line strictly newer than `pinned`.
    pub fn latest_in_line(&self, pinned: &GoVersion) -> Option<GoVersion> {
        self.releases
            .range((Excluded(*pinned), Unbounded))
            .take_while(|v| v.major == pinned.major)
            .last()
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(versions: &[&str]) -> ReleaseCatalog {
        ReleaseCatalog::new(
            versions.iter().map(|v| GoVersion::parse(v).unwrap()),
            "test",
        )
        .unwrap()
    }

    #[test]
    fn test_empty_catalog_is_rejected() {
        let result = ReleaseCatalog::new(Vec::new(), "https://go.dev/dl/?mode=json");
        assert!(matches!(result, Err(BumpError::SourceUnavailable { .. })));
    }

    #[test]
    fn test_latest_in_line_picks_highest_newer() {
        let catalog = catalog(&["1.22.1", "1.22.2", "1.22.3", "1.23.0", "1.23.1"]);

        let pinned = GoVersion::parse("1.22.1").unwrap();
        assert_eq!(
            catalog.latest_in_line(&pinned),
            Some(GoVersion::parse("1.22.3").unwrap())
        );

        let pinned = GoVersion::parse("1.23.0").unwrap();
        assert_eq!(
            catalog.latest_in_line(&pinned),
            Some(GoVersion::parse("1.23.1").unwrap())
        );
    }

    #[test]
    fn test_latest_in_line_none_when_up_to_date() {
        let catalog = catalog(&["1.22.3", "1.23.1"]);
        assert_eq!(
            catalog.latest_in_line(&GoVersion::parse("1.22.3").unwrap()),
            None
        );
        // Pinned ahead of the catalog never downgrades
        assert_eq!(
            catalog.latest_in_line(&GoVersion::parse("1.23.2").unwrap()),
            None
        );
    }

    #[test]
    fn test_latest_in_line_at_component_limit() {
        let catalog = ReleaseCatalog::new(
            [GoVersion::new(u64::MAX, 1), GoVersion::new(u64::MAX, u64::MAX)],
            "test",
        )
        .unwrap();
        assert_eq!(
            catalog.latest_in_line(&GoVersion::new(u64::MAX, 0)),
            Some(GoVersion::new(u64::MAX, u64::MAX))
        );
        assert_eq!(
            catalog.latest_in_line(&GoVersion::new(u64::MAX, u64::MAX)),
            None
        );
    }

    #[test]
    fn test_has_line() {
        let catalog = catalog(&["1.22.3", "1.23.1", "1.24.0"]);
        assert!(catalog.has_line(24));
        assert!(!catalog.has_line(25));
        assert!(catalog.contains(&GoVersion::new(24, 0)));
        assert_eq!(catalog.len(), 3);
    }
}
