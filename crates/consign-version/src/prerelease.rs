use chrono::{DateTime, Utc};
use semver::Version;

use crate::error::VersionError;
use crate::version::{base_version, with_prerelease};

pub const SNAPSHOT_IDENTIFIER: &str = "snapshot";

const SNAPSHOT_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Builds `<target>-<stage>.<counter>`, e.g. `1.2.0-alpha.1`.
///
/// # Errors
///
/// Returns `VersionError::InvalidPrerelease` if `stage` is not a valid
/// pre-release identifier.
pub fn stage_version(target: &Version, stage: &str, counter: u32) -> Result<Version, VersionError> {
    with_prerelease(&base_version(target), &format!("{stage}.{counter}"))
}

/// Builds `<target>-snapshot.<YYYYMMDDHHMMSS>` from the supplied timestamp.
///
/// # Errors
///
/// Returns `VersionError::InvalidPrerelease` for timestamps whose formatted
/// form is not a valid numeric identifier (years before 1000).
pub fn snapshot_version(target: &Version, timestamp: DateTime<Utc>) -> Result<Version, VersionError> {
    let stamp = timestamp.format(SNAPSHOT_TIMESTAMP_FORMAT);
    with_prerelease(
        &base_version(target),
        &format!("{SNAPSHOT_IDENTIFIER}.{stamp}"),
    )
}
