use std::path::{Path, PathBuf};

use consign_project::VersionFileFormat;
use semver::Version;

use crate::cargo::CargoVersionFile;
use crate::error::ManifestError;
use crate::plain::PlainVersionFile;

/// Reads and writes the version of a package in one ecosystem's file format.
pub trait VersionFile: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, or holds no valid version.
    fn read_version(&self, path: &Path) -> Result<Version, ManifestError>;

    /// Replaces the version in place, leaving the rest of the file untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or written.
    fn update_version(&self, path: &Path, version: &Version) -> Result<(), ManifestError>;

    /// Version files of this format below `root`, sorted. Hidden directories
    /// and `target` are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be read.
    fn list_version_files(&self, root: &Path) -> Result<Vec<PathBuf>, ManifestError>;
}

#[must_use]
pub fn version_file_for(format: VersionFileFormat) -> &'static dyn VersionFile {
    match format {
        VersionFileFormat::Plain => &PlainVersionFile,
        VersionFileFormat::Cargo => &CargoVersionFile,
    }
}

pub(crate) fn walk_files(
    root: &Path,
    matches: impl Fn(&Path) -> bool,
) -> Result<Vec<PathBuf>, ManifestError> {
    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries = std::fs::read_dir(&dir).map_err(|source| ManifestError::Read {
            path: dir.clone(),
            source,
        })?;
        for entry in entries {
            let entry = entry.map_err(|source| ManifestError::Read {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if path.is_dir() {
                if !name.starts_with('.') && name != "target" {
                    pending.push(path);
                }
            } else if matches(&path) {
                found.push(path);
            }
        }
    }

    found.sort();
    Ok(found)
}
