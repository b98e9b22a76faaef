mod bump;
mod error;
mod prerelease;
mod version;

pub use bump::{bump_version, max_bump_type, release_version};
pub use error::VersionError;
pub use prerelease::{SNAPSHOT_IDENTIFIER, snapshot_version, stage_version};
pub use version::{base_version, compare, is_prerelease, parse_version, with_prerelease};
