use crate::error::Result;
use crate::registry::ReleaseSource;
use crate::version::GoVersion;

/// One step of a rewrite chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transform {
    /// Replace the full release name, e.g. `1.22.5` -> `1.22.7`
    FullVersion { old: GoVersion, new: GoVersion },
    /// Replace the line id after `prefix`, e.g. `builder:1.22` -> `builder:1.24`
    LineId {
        prefix: String,
        old: GoVersion,
        new: GoVersion,
    },
    /// Replace the full release name after `prefix`, e.g. `GOLANG_VERSION 1.22.5`
    GolangVersion {
        prefix: String,
        old: GoVersion,
        new: GoVersion,
    },
    /// Replace the published archive checksum of `old` with that of `new`
    Checksum { old: GoVersion, new: GoVersion },
}

/// A literal find/replace pair, ready to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub from: String,
    pub to: String,
}

impl Transform {
    pub fn full_version(old: GoVersion, new: GoVersion) -> Self {
        Self::FullVersion { old, new }
    }

    pub fn line_id(prefix: &str, old: GoVersion, new: GoVersion) -> Self {
        Self::LineId {
            prefix: prefix.to_string(),
            old,
            new,
        }
    }

    pub fn golang_version(prefix: &str, old: GoVersion, new: GoVersion) -> Self {
        Self::GolangVersion {
            prefix: prefix.to_string(),
            old,
            new,
        }
    }

    pub fn checksum(old: GoVersion, new: GoVersion) -> Self {
        Self::Checksum { old, new }
    }

    /// Turn the transform into a literal substitution.
    ///
    /// Only checksums need the release source; a failed lookup fails the whole
    /// chain so no file is written with a stale checksum.
    pub async fn resolve(&self, source: &dyn ReleaseSource) -> Result<Substitution> {
        let substitution = match self {
            Self::FullVersion { old, new } => {
                Substitution::new(old.full_string(), new.full_string())
            }
            Self::LineId { prefix, old, new } => Substitution::new(
                format!("{}{}", prefix, old.line_id()),
                format!("{}{}", prefix, new.line_id()),
            ),
            Self::GolangVersion { prefix, old, new } => Substitution::new(
                format!("{}{}", prefix, old.full_string()),
                format!("{}{}", prefix, new.full_string()),
            ),
            Self::Checksum { old, new } => {
                let from = source.checksum(old).await?;
                let to = source.checksum(new).await?;
                Substitution::new(from, to)
            }
        };
        Ok(substitution)
    }
}

impl Substitution {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn apply(&self, content: &str) -> String {
        if self.from.is_empty() || self.from == self.to {
            return content.to_string();
        }
        content.replace(&self.from, &self.to)
    }
}

/// Resolve a chain in order, stopping at the first failure.
pub async fn resolve_all(
    transforms: &[Transform],
    source: &dyn ReleaseSource,
) -> Result<Vec<Substitution>> {
    let mut substitutions = Vec::with_capacity(transforms.len());
    for transform in transforms {
        substitutions.push(transform.resolve(source).await?);
    }
    Ok(substitutions)
}

/// Apply substitutions strictly in order.
pub fn apply_all(content: &str, substitutions: &[Substitution]) -> String {
    substitutions
        .iter()
        .fold(content.to_string(), |out, substitution| substitution.apply(&out))
}
