//! Decides between a major rotation and per-line patch bumps, then drives the
//! rewrites.
//!
//! A run goes through four steps:
//!
//! 1. detect the two line directories,
//! 2. check whether the line after the current one has shipped,
//! 3. either rotate the lines (`[1.22, 1.23]` -> `[1.23, 1.24]`) or bump each
//!    line to its latest patch release,
//! 4. report the new versions, oldest first.
//!
//! Every error aborts the run. A rotation, or a single line's bump, computes
//! all of its rewrites before writing any of them.

use crate::catalog::ReleaseCatalog;
use crate::config::{BumperConfig, Discovery};
use crate::error::{BumpError, Result};
use crate::layout::{LineDirs, detect_lines, read_pinned_version};
use crate::registry::ReleaseSource;
use crate::rewrite::{self, FileKind, PendingWrite, Transform};
use crate::version::GoVersion;
use ignore::WalkBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Versions a run bumped to, sorted ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BumpReport {
    pub versions: Vec<GoVersion>,
}

impl BumpReport {
    pub fn new(mut versions: Vec<GoVersion>) -> Self {
        versions.sort();
        Self { versions }
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Suggested branch name, e.g. `golang-1.22.3-1.23.1`
    pub fn branch_name(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        Some(format!("golang-{}", self.joined("-")))
    }

    /// Suggested commit message, e.g. `Bump to Go 1.22.3 and 1.23.1`
    pub fn commit_message(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        Some(format!("Bump to Go {}", self.joined(" and ")))
    }

    fn joined(&self, separator: &str) -> String {
        self.versions
            .iter()
            .map(GoVersion::to_string)
            .collect::<Vec<_>>()
            .join(separator)
    }
}

/// What the planner knows about published releases
enum Releases {
    Catalog(ReleaseCatalog),
    /// Ask the source about each candidate
    Probe,
}

pub struct Planner<'a> {
    root: PathBuf,
    source: &'a dyn ReleaseSource,
    config: &'a BumperConfig,
    dry_run: bool,
}

impl<'a> Planner<'a> {
    pub fn new(
        root: impl Into<PathBuf>,
        source: &'a dyn ReleaseSource,
        config: &'a BumperConfig,
    ) -> Self {
        Self {
            root: root.into(),
            source,
            config,
            dry_run: false,
        }
    }

    /// Compute every rewrite without writing files or renaming directories
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub async fn run(&self) -> Result<BumpReport> {
        let lines = detect_lines(&self.root)?;
        let releases = self.load_releases().await?;

        let versions = match self.decide_major(&lines, &releases).await? {
            Some(next) => vec![self.major_rotation(&lines, next).await?],
            None => self.minor_sweep(&lines, &releases).await?,
        };

        Ok(BumpReport::new(versions))
    }

    async fn load_releases(&self) -> Result<Releases> {
        match self.config.discovery {
            Discovery::Catalog => {
                let releases = self.source.list_releases().await?;
                let catalog = ReleaseCatalog::new(releases, &self.source.location())?;
                info!(
                    num = catalog.len(),
                    source = %self.source.location(),
                    "found available versions"
                );
                Ok(Releases::Catalog(catalog))
            }
            Discovery::Probe => Ok(Releases::Probe),
        }
    }

    /// The first release of the line after `lines.current`, if it has shipped.
    async fn decide_major(
        &self,
        lines: &LineDirs,
        releases: &Releases,
    ) -> Result<Option<GoVersion>> {
        let candidate = lines.current_line()?.next_major_candidate();

        let shipped = match releases {
            Releases::Catalog(catalog) => catalog.has_line(candidate.major),
            Releases::Probe => self.source.exists(&candidate).await?,
        };

        if shipped {
            info!(version = %candidate, "found a new major version of Go");
            Ok(Some(candidate))
        } else {
            debug!(candidate = %candidate.line_id(), "no new major version");
            Ok(None)
        }
    }

    /// Highest release of `pinned`'s line newer than `pinned`.
    async fn next_patch(
        &self,
        pinned: GoVersion,
        releases: &Releases,
    ) -> Result<Option<GoVersion>> {
        match releases {
            Releases::Catalog(catalog) => Ok(catalog.latest_in_line(&pinned)),
            Releases::Probe => {
                let mut latest = None;
                let mut candidate = pinned.next_minor_candidate();
                while self.source.exists(&candidate).await? {
                    latest = Some(candidate);
                    candidate = candidate.next_minor_candidate();
                }
                Ok(latest)
            }
        }
    }

    /// Switch the tracked lines from `[old, current]` to `[current, next]`.
    async fn major_rotation(&self, lines: &LineDirs, next: GoVersion) -> Result<GoVersion> {
        let old = read_pinned_version(&self.root, &lines.old, &self.config.marker_file)?;
        let current = read_pinned_version(&self.root, &lines.current, &self.config.marker_file)?;
        info!(%old, %current, %next, "rotating version lines");

        // The old line's tree becomes the next line's tree. Every new file
        // content is computed before anything is written.
        let old_dir = self.root.join(&lines.old);
        let mut writes = Vec::new();
        for path in self.files_under(&old_dir)? {
            let kind = FileKind::detect(&path, &self.config.marker_file);
            let chain = kind.transforms(old, next, self.config);
            self.plan(&path, &chain, &mut writes).await?;
        }

        let line_ids = rewrite::rotate_line_ids(old, current, next);
        self.plan(&self.root.join(&self.config.ci_config), &line_ids, &mut writes)
            .await?;
        self.plan(&self.root.join(&self.config.build_file), &line_ids, &mut writes)
            .await?;
        self.plan(
            &self.root.join(&self.config.readme),
            &rewrite::rotate_releases(old, current, next),
            &mut writes,
        )
        .await?;

        self.commit(&writes)?;

        let next_dir = self.root.join(next.line_id());
        if self.dry_run {
            info!(
                from = %old_dir.display(),
                to = %next_dir.display(),
                "would rename version directory"
            );
        } else {
            fs::rename(&old_dir, &next_dir).map_err(|e| BumpError::io(&next_dir, e))?;
            info!(
                from = %old_dir.display(),
                to = %next_dir.display(),
                "renamed version directory"
            );
        }

        Ok(next)
    }

    /// Bump each line to its latest patch release.
    async fn minor_sweep(&self, lines: &LineDirs, releases: &Releases) -> Result<Vec<GoVersion>> {
        let mut bumped = Vec::new();
        for dir in lines.names() {
            info!(dir, "processing version dir");
            if let Some(next) = self.bump_line(dir, releases).await? {
                bumped.push(next);
            }
        }
        Ok(bumped)
    }

    async fn bump_line(&self, dir: &str, releases: &Releases) -> Result<Option<GoVersion>> {
        let current = read_pinned_version(&self.root, dir, &self.config.marker_file)?;

        let Some(next) = self.next_patch(current, releases).await? else {
            info!(version = %current, "no version change for Go");
            return Ok(None);
        };

        let line_dir = self.root.join(dir);
        let mut writes = Vec::new();
        self.plan(
            &line_dir.join(&self.config.base_dockerfile),
            &FileKind::Dockerfile.transforms(current, next, self.config),
            &mut writes,
        )
        .await?;
        self.plan(
            &line_dir.join(&self.config.marker_file),
            &FileKind::Marker.transforms(current, next, self.config),
            &mut writes,
        )
        .await?;
        self.plan(
            &self.root.join(&self.config.readme),
            &[Transform::full_version(current, next)],
            &mut writes,
        )
        .await?;
        self.commit(&writes)?;

        info!(%current, %next, "updated version");
        Ok(Some(next))
    }

    async fn plan(
        &self,
        path: &Path,
        chain: &[Transform],
        writes: &mut Vec<PendingWrite>,
    ) -> Result<()> {
        if let Some(pending) = rewrite::plan_rewrite(path, chain, self.source).await? {
            debug!(path = %path.display(), dry_run = self.dry_run, "file will change");
            writes.push(pending);
        }
        Ok(())
    }

    fn commit(&self, writes: &[PendingWrite]) -> Result<()> {
        if self.dry_run {
            return Ok(());
        }
        writes.iter().try_for_each(PendingWrite::commit)
    }

    /// Every regular file below `dir`, in a stable order
    fn files_under(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let walker = WalkBuilder::new(dir)
            .standard_filters(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry?;
            if entry.file_type().is_some_and(|t| t.is_file()) {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}
