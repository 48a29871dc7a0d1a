mod transform;

pub use transform::{Substitution, Transform, apply_all, resolve_all};

use crate::config::BumperConfig;
use crate::error::{BumpError, Result};
use crate::registry::ReleaseSource;
use crate::version::GoVersion;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Kind of file inside a version line directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// The file holding `VERSION := 1.N.M`
    Marker,
    Dockerfile,
    Other,
}

impl FileKind {
    pub fn detect(path: &Path, marker_file: &str) -> Self {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            return FileKind::Other;
        };

        let marker_name = Path::new(marker_file)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(marker_file);

        if file_name == marker_name {
            FileKind::Marker
        } else if file_name == "Dockerfile" {
            FileKind::Dockerfile
        } else {
            FileKind::Other
        }
    }

    /// Rewrite chain moving a file of this kind from `old` to `new`.
    ///
    /// Checksums come last so every textual step has been computed before the
    /// network is consulted.
    pub fn transforms(
        &self,
        old: GoVersion,
        new: GoVersion,
        config: &BumperConfig,
    ) -> Vec<Transform> {
        match self {
            FileKind::Marker => vec![Transform::full_version(old, new)],
            FileKind::Dockerfile => vec![
                Transform::golang_version(&config.golang_version_prefix, old, new),
                Transform::line_id(&config.image_prefix, old, new),
                Transform::checksum(old, new),
            ],
            FileKind::Other => vec![
                Transform::golang_version("", old, new),
                Transform::line_id("", old, new),
            ],
        }
    }
}

/// Chain for shared files naming both lines: `current -> next` first, then
/// `old -> current`, so nothing gets substituted twice.
pub fn rotate_line_ids(old: GoVersion, current: GoVersion, next: GoVersion) -> Vec<Transform> {
    vec![
        Transform::line_id("", current, next),
        Transform::line_id("", old, current),
    ]
}

/// Like [`rotate_line_ids`], also moving full release names.
pub fn rotate_releases(old: GoVersion, current: GoVersion, next: GoVersion) -> Vec<Transform> {
    vec![
        Transform::full_version(current, next),
        Transform::line_id("", current, next),
        Transform::full_version(old, current),
        Transform::line_id("", old, current),
    ]
}

/// New content for one file, computed but not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingWrite {
    pub path: PathBuf,
    pub content: String,
}

impl PendingWrite {
    pub fn commit(&self) -> Result<()> {
        fs::write(&self.path, &self.content).map_err(|e| BumpError::io(&self.path, e))?;
        debug!(path = %self.path.display(), "rewrote file");
        Ok(())
    }
}

/// Run a whole file through a transform chain without touching the disk.
///
/// Returns `None` when the content would not change. Files that are not
/// UTF-8 text carry no version strings and are passed through.
pub async fn plan_rewrite(
    path: &Path,
    transforms: &[Transform],
    source: &dyn ReleaseSource,
) -> Result<Option<PendingWrite>> {
    let bytes = fs::read(path).map_err(|e| BumpError::io(path, e))?;
    let Ok(content) = String::from_utf8(bytes) else {
        debug!(path = %path.display(), "skipping non-text file");
        return Ok(None);
    };

    let substitutions = resolve_all(transforms, source).await?;
    let new_content = apply_all(&content, &substitutions);

    if new_content == content {
        debug!(path = %path.display(), "no change");
        return Ok(None);
    }

    Ok(Some(PendingWrite {
        path: path.to_path_buf(),
        content: new_content,
    }))
}
