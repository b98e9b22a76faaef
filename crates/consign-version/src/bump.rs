use consign_core::BumpType;
use semver::Version;

use crate::error::VersionError;
use crate::version::{base_version, is_prerelease};

/// Applies `bump_type` to the stable base of `version`.
///
/// Any pre-release or build metadata is dropped first, so `1.2.0-beta.3`
/// bumped by `patch` yields `1.2.1`.
///
/// # Errors
///
/// Returns `VersionError::Overflow` if the bumped component is already at
/// `u64::MAX`.
pub fn bump_version(version: &Version, bump_type: BumpType) -> Result<Version, VersionError> {
    let mut new_version = base_version(version);
    let overflow = || VersionError::Overflow {
        version: version.to_string(),
        bump_type,
    };

    match bump_type {
        BumpType::Major => {
            new_version.major = new_version.major.checked_add(1).ok_or_else(overflow)?;
            new_version.minor = 0;
            new_version.patch = 0;
        }
        BumpType::Minor => {
            new_version.minor = new_version.minor.checked_add(1).ok_or_else(overflow)?;
            new_version.patch = 0;
        }
        BumpType::Patch => {
            new_version.patch = new_version.patch.checked_add(1).ok_or_else(overflow)?;
        }
    }

    Ok(new_version)
}

/// The stable release that carries `bump_type` on top of `version`.
///
/// Same as [`bump_version`] for a stable version. A pre-release already leads
/// up to its base, so the base is returned whenever it is shaped like the
/// requested bump: `1.2.0-snapshot.1` with `minor` yields `1.2.0`, with
/// `major` it yields `2.0.0`.
///
/// # Errors
///
/// Returns `VersionError::Overflow` like [`bump_version`].
pub fn release_version(version: &Version, bump_type: BumpType) -> Result<Version, VersionError> {
    if !is_prerelease(version) {
        return bump_version(version, bump_type);
    }

    let base = base_version(version);
    let carries_bump = match bump_type {
        BumpType::Major => base.minor == 0 && base.patch == 0,
        BumpType::Minor => base.patch == 0,
        BumpType::Patch => true,
    };
    if carries_bump {
        Ok(base)
    } else {
        bump_version(version, bump_type)
    }
}

#[must_use]
pub fn max_bump_type(bumps: &[BumpType]) -> Option<BumpType> {
    bumps.iter().copied().max()
}
