use std::path::{Path, PathBuf};

use semver::Version;

use crate::error::ManifestError;
use crate::traits::{VersionFile, walk_files};

const FILE_NAME: &str = "VERSION";

/// A text file whose only content is the version.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainVersionFile;

impl VersionFile for PlainVersionFile {
    fn read_version(&self, path: &Path) -> Result<Version, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let version_str = content.trim();
        if version_str.is_empty() {
            return Err(ManifestError::Empty {
                path: path.to_path_buf(),
            });
        }

        Version::parse(version_str).map_err(|source| ManifestError::InvalidVersion {
            path: path.to_path_buf(),
            version: version_str.to_string(),
            source,
        })
    }

    fn update_version(&self, path: &Path, version: &Version) -> Result<(), ManifestError> {
        std::fs::write(path, format!("{version}\n")).map_err(|source| ManifestError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    fn list_version_files(&self, root: &Path) -> Result<Vec<PathBuf>, ManifestError> {
        walk_files(root, |path| {
            path.file_name().is_some_and(|name| name == FILE_NAME)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn write_file(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join(FILE_NAME);
        fs::write(&path, content).expect("write version file");
        path
    }

    #[test]
    fn reads_trimmed_version() {
        let dir = TempDir::new().expect("temp dir");
        let path = write_file(&dir, "  2.0.0-beta.1\n\n");

        let version = PlainVersionFile.read_version(&path).expect("read");

        assert_eq!(version.to_string(), "2.0.0-beta.1");
    }

    #[test]
    fn rejects_empty_file() {
        let dir = TempDir::new().expect("temp dir");
        let path = write_file(&dir, "\n");

        let err = PlainVersionFile.read_version(&path).expect_err("empty");

        assert!(matches!(err, ManifestError::Empty { .. }));
    }

    #[test]
    fn rejects_malformed_version() {
        let dir = TempDir::new().expect("temp dir");
        let path = write_file(&dir, "01.2.3\n");

        let err = PlainVersionFile.read_version(&path).expect_err("leading zero");

        assert!(matches!(
            err,
            ManifestError::InvalidVersion { ref version, .. } if version == "01.2.3"
        ));
    }

    #[test]
    fn update_replaces_content() {
        let dir = TempDir::new().expect("temp dir");
        let path = write_file(&dir, "1.0.0\n");

        PlainVersionFile
            .update_version(&path, &Version::new(1, 1, 0))
            .expect("update");

        assert_eq!(fs::read_to_string(&path).expect("read"), "1.1.0\n");
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = TempDir::new().expect("temp dir");

        let err = PlainVersionFile
            .read_version(&dir.path().join(FILE_NAME))
            .expect_err("missing");

        assert!(matches!(err, ManifestError::Read { .. }));
    }

    #[test]
    fn lists_only_version_files() {
        let dir = TempDir::new().expect("temp dir");
        write_file(&dir, "1.0.0\n");
        fs::write(dir.path().join("README.md"), "# readme\n").expect("write");

        let found = PlainVersionFile
            .list_version_files(dir.path())
            .expect("list");

        assert_eq!(found, vec![dir.path().join(FILE_NAME)]);
    }
}
