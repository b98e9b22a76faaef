use consign_core::BumpType;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VersionError {
    #[error("invalid version '{input}'")]
    Parse {
        input: String,
        #[source]
        source: semver::Error,
    },

    #[error("invalid pre-release identifier '{identifier}'")]
    InvalidPrerelease {
        identifier: String,
        #[source]
        source: semver::Error,
    },

    #[error("{bump_type} bump of '{version}' exceeds the numeric limit")]
    Overflow { version: String, bump_type: BumpType },
}
