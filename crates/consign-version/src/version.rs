use std::cmp::Ordering;

use semver::{BuildMetadata, Prerelease, Version};

use crate::error::VersionError;

/// Parses `MAJOR.MINOR.PATCH[-prerelease][+build]`.
///
/// # Errors
///
/// Returns `VersionError::Parse` for malformed input, including leading zeros
/// in numeric components and missing release numbers.
pub fn parse_version(input: &str) -> Result<Version, VersionError> {
    Version::parse(input).map_err(|source| VersionError::Parse {
        input: input.to_string(),
        source,
    })
}

/// Semver precedence. Build metadata is ignored, so `1.0.0+a` and `1.0.0+b`
/// compare equal.
#[must_use]
pub fn compare(a: &Version, b: &Version) -> Ordering {
    (a.major, a.minor, a.patch)
        .cmp(&(b.major, b.minor, b.patch))
        .then_with(|| match (a.pre.is_empty(), b.pre.is_empty()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => a.pre.cmp(&b.pre),
        })
}

/// Strips pre-release and build metadata, leaving the release numbers.
#[must_use]
pub fn base_version(version: &Version) -> Version {
    Version::new(version.major, version.minor, version.patch)
}

/// Replaces the pre-release field, keeping release numbers and dropping build metadata.
///
/// # Errors
///
/// Returns `VersionError::InvalidPrerelease` if `identifier` is not a valid
/// dot-separated pre-release identifier.
pub fn with_prerelease(version: &Version, identifier: &str) -> Result<Version, VersionError> {
    let pre = Prerelease::new(identifier).map_err(|source| VersionError::InvalidPrerelease {
        identifier: identifier.to_string(),
        source,
    })?;

    Ok(Version {
        major: version.major,
        minor: version.minor,
        patch: version.patch,
        pre,
        build: BuildMetadata::EMPTY,
    })
}

#[must_use]
pub fn is_prerelease(version: &Version) -> bool {
    !version.pre.is_empty()
}
