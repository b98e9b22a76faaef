use std::path::{Path, PathBuf};

use consign_project::{PackageConfig, VersionFileFormat};
use semver::Version;

use crate::Result;

/// Reads and writes the version recorded in a package's version file.
pub trait PackageVersionIO: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the version file cannot be read or holds no valid version.
    fn read_version(&self, root: &Path, package: &PackageConfig) -> Result<Version>;

    /// # Errors
    ///
    /// Returns an error if the version file cannot be updated.
    fn write_version(&self, root: &Path, package: &PackageConfig, version: &Version)
    -> Result<()>;

    /// Every version file of `format` below `root`, configured or not.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be read.
    fn list_version_files(&self, root: &Path, format: VersionFileFormat) -> Result<Vec<PathBuf>>;
}
