//! Version line directories of a builder repository.
//!
//! A repository tracks exactly two Go release lines, each in a directory named
//! after the line (`1.22/`, `1.23/`). A marker file inside each directory pins
//! the exact release with a `VERSION := 1.N.M` line.

use crate::error::{BumpError, Result};
use crate::version::GoVersion;
use regex::Regex;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

static LINE_DIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^1\.(\d+)(\.\d+)?$").expect("Invalid line dir regex"));

/// The two supported line directories, oldest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDirs {
    pub old: String,
    pub current: String,
}

impl LineDirs {
    /// Both directory names, oldest first
    pub fn names(&self) -> [&str; 2] {
        [&self.old, &self.current]
    }

    /// The line tracked by the newer directory
    pub fn current_line(&self) -> Result<GoVersion> {
        GoVersion::parse(&self.current)
    }
}

pub fn is_line_dir(name: &str) -> bool {
    LINE_DIR_RE.is_match(name)
}

/// Find the two version line directories directly under `root`.
///
/// Anything but exactly two matches is an error; the tool never guesses which
/// lines are meant to be supported.
pub fn detect_lines(root: &Path) -> Result<LineDirs> {
    let entries = fs::read_dir(root).map_err(|e| BumpError::io(root, e))?;

    let mut dirs: Vec<(GoVersion, String)> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| BumpError::io(root, e))?;
        let file_type = entry.file_type().map_err(|e| BumpError::io(entry.path(), e))?;
        if !file_type.is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if !is_line_dir(&name) {
            continue;
        }
        dirs.push((GoVersion::parse(&name)?, name));
    }

    dirs.sort();

    let [(_, old), (_, current)]: [(GoVersion, String); 2] =
        dirs.try_into()
            .map_err(|dirs: Vec<(GoVersion, String)>| BumpError::UnexpectedLineCount {
                found: dirs.len(),
                dirs: dirs.into_iter().map(|(_, name)| name).collect(),
            })?;

    debug!(%old, %current, "detected version lines");
    Ok(LineDirs { old, current })
}

/// Read the exact version pinned in `<root>/<dir>/<marker_file>`.
///
/// The first line of the form `VERSION := <dir>[.<patch>]` wins.
pub fn read_pinned_version(root: &Path, dir: &str, marker_file: &str) -> Result<GoVersion> {
    let not_found = |reason: String| BumpError::VersionNotFound {
        dir: dir.to_string(),
        reason,
    };

    let re = Regex::new(&format!(
        r"^\s*VERSION\s*:=\s*({}(?:\.\d+)?)\b",
        regex::escape(dir)
    ))
    .map_err(|e| not_found(e.to_string()))?;

    let path = root.join(dir).join(marker_file);
    let file = fs::File::open(&path).map_err(|e| not_found(format!("{}: {}", path.display(), e)))?;

    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| not_found(format!("{}: {}", path.display(), e)))?;
        if let Some(caps) = re.captures(&line) {
            let version = GoVersion::parse(&caps[1])?;
            debug!(dir, %version, "read pinned version");
            return Ok(version);
        }
    }

    Err(not_found(format!(
        "no 'VERSION := {}' line in {}",
        dir,
        path.display()
    )))
}
