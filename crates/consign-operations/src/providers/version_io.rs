use std::path::{Path, PathBuf};

use consign_manifest::version_file_for;
use consign_project::{PackageConfig, VersionFileFormat};
use semver::Version;
use tracing::debug;

use crate::Result;
use crate::traits::PackageVersionIO;

/// Dispatches on each package's configured version file format.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystemVersionIO;

impl FileSystemVersionIO {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl PackageVersionIO for FileSystemVersionIO {
    fn read_version(&self, root: &Path, package: &PackageConfig) -> Result<Version> {
        let path = root.join(&package.version_file);
        Ok(version_file_for(package.format).read_version(&path)?)
    }

    fn write_version(
        &self,
        root: &Path,
        package: &PackageConfig,
        version: &Version,
    ) -> Result<()> {
        let path = root.join(&package.version_file);
        version_file_for(package.format).update_version(&path, version)?;
        debug!(package = %package.name, version = %version, path = %path.display(), "wrote version");
        Ok(())
    }

    fn list_version_files(&self, root: &Path, format: VersionFileFormat) -> Result<Vec<PathBuf>> {
        Ok(version_file_for(format).list_version_files(root)?)
    }
}
