use semver::Version;

/// Normalize a version string to full semver format (MAJOR.MINOR.PATCH)
/// "1" -> "1.0.0", "1.2" -> "1.2.0", "1.2.3" -> "1.2.3"
pub fn normalize_version(version_str: &str) -> String {
    // Keep a prerelease suffix (e.g., "1.23rc1" stays unparseable, "1.0-alpha" -> "1.0.0-alpha")
    let (base, suffix) = if let Some(idx) = version_str.find('-') {
        (&version_str[..idx], &version_str[idx..])
    } else {
        (version_str, "")
    };

    let parts: Vec<&str> = base.split('.').collect();
    let normalized = match parts.len() {
        1 => format!("{}.0.0", parts[0]),
        2 => format!("{}.{}.0", parts[0], parts[1]),
        _ => base.to_string(),
    };

    format!("{}{}", normalized, suffix)
}

/// Parse a stable release version, filling in missing components with zero.
/// Returns None for prereleases, build metadata and anything semver rejects.
pub fn parse_stable(version_str: &str) -> Option<Version> {
    let version = Version::parse(&normalize_version(version_str)).ok()?;
    if version.pre.is_empty() && version.build.is_empty() {
        Some(version)
    } else {
        None
    }
}
