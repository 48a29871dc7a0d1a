//! Error types for builder-bumper

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a bump run.
///
/// None of these are retried. The caller logs the error and exits non-zero;
/// files rewritten before the failure stay on disk.
#[derive(Error, Debug)]
pub enum BumpError {
    /// A version string is not of the form `1.N` or `1.N.M`.
    #[error("invalid Go version '{0}'")]
    InvalidVersion(String),

    /// The repository does not contain exactly two version line directories.
    #[error("expected 2 versions of Go but got {}: [{}]", .found, .dirs.join(", "))]
    UnexpectedLineCount {
        /// Number of matching directories.
        found: usize,
        /// Names of the matching directories.
        dirs: Vec<String>,
    },

    /// The marker file of a line directory is missing or has no version line.
    #[error("couldn't get exact version for {dir}: {reason}")]
    VersionNotFound {
        /// Line directory that was inspected.
        dir: String,
        /// What went wrong.
        reason: String,
    },

    /// The release catalog could not be fetched or parsed.
    #[error("release source unavailable ({url}): {reason}")]
    SourceUnavailable {
        /// Endpoint that was queried.
        url: String,
        /// What went wrong.
        reason: String,
    },

    /// The checksum of a release archive could not be fetched.
    #[error("checksum unavailable for Go {version}: {reason}")]
    ChecksumUnavailable {
        /// Release whose checksum was requested.
        version: String,
        /// What went wrong.
        reason: String,
    },

    /// A config file exists but cannot be used.
    #[error("invalid config {}: {}", .path.display(), .reason)]
    InvalidConfig {
        /// Offending config file.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// Reading, writing or renaming a file failed.
    #[error("{}: {}", .path.display(), .source)]
    Io {
        /// Path the operation targeted.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Walking a line directory failed.
    #[error("failed to walk directory: {0}")]
    Walk(#[from] ignore::Error),
}

impl BumpError {
    /// Attach a path to an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias using [`BumpError`].
pub type Result<T> = std::result::Result<T, BumpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_line_count_lists_dirs() {
        let err = BumpError::UnexpectedLineCount {
            found: 3,
            dirs: vec!["1.21".to_string(), "1.22".to_string(), "1.23".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "expected 2 versions of Go but got 3: [1.21, 1.22, 1.23]"
        );
    }

    #[test]
    fn test_io_error_includes_path() {
        let err = BumpError::io(
            "1.22/Makefile.COMMON",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        assert_eq!(err.to_string(), "1.22/Makefile.COMMON: not found");
    }
}
