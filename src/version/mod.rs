pub mod semver_util;

pub use semver_util::{normalize_version, parse_stable};

use crate::error::{BumpError, Result};
use std::fmt;

/// First Go release line whose initial release carries an explicit `.0`.
const EXPLICIT_ZERO_SINCE: u64 = 21;

/// Largest accepted line or patch number, so candidates never overflow.
const MAX_COMPONENT: u64 = u32::MAX as u64;

/// A Go release under the `1.N.M` scheme.
///
/// `major` is the release line (`N` in `1.N`) and `minor` the patch number
/// within that line (`M`). The derived ordering compares `major` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GoVersion {
    pub major: u64,
    pub minor: u64,
}

impl GoVersion {
    pub fn new(major: u64, minor: u64) -> Self {
        Self { major, minor }
    }

    /// Parse `1.N` or `1.N.M`; a missing `M` means `0`.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        let components = text.split('.').count();
        if !(2..=3).contains(&components) {
            return Err(BumpError::InvalidVersion(text.to_string()));
        }

        match parse_stable(text) {
            Some(v)
                if v.major == 1 && v.minor <= MAX_COMPONENT && v.patch <= MAX_COMPONENT =>
            {
                Ok(Self::new(v.minor, v.patch))
            }
            _ => Err(BumpError::InvalidVersion(text.to_string())),
        }
    }

    /// The release line, e.g. `1.22`.
    pub fn line_id(&self) -> String {
        format!("1.{}", self.major)
    }

    /// The release name as Go publishes it.
    ///
    /// Before Go 1.21 the first release of a line had no `.0` suffix
    /// (`1.20`, not `1.20.0`).
    pub fn full_string(&self) -> String {
        if self.major < EXPLICIT_ZERO_SINCE && self.minor == 0 {
            self.line_id()
        } else {
            format!("1.{}.{}", self.major, self.minor)
        }
    }

    /// First release of the following line.
    pub fn next_major_candidate(&self) -> Self {
        Self::new(self.major + 1, 0)
    }

    /// Next patch release of the same line.
    pub fn next_minor_candidate(&self) -> Self {
        Self::new(self.major, self.minor + 1)
    }
}

impl fmt::Display for GoVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_string())
    }
}
