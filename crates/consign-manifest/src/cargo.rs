use std::path::{Path, PathBuf};

use semver::Version;
use toml_edit::{DocumentMut, value};

use crate::error::ManifestError;
use crate::traits::{VersionFile, walk_files};

const FILE_NAME: &str = "Cargo.toml";

/// `package.version` in a `Cargo.toml`, edited with formatting preserved.
#[derive(Debug, Clone, Copy, Default)]
pub struct CargoVersionFile;

fn read_document(path: &Path) -> Result<DocumentMut, ManifestError> {
    let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    content
        .parse::<DocumentMut>()
        .map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

fn has_package_table(path: &Path) -> bool {
    read_document(path).is_ok_and(|doc| doc.get("package").is_some())
}

impl VersionFile for CargoVersionFile {
    fn read_version(&self, path: &Path) -> Result<Version, ManifestError> {
        let doc = read_document(path)?;

        let package = doc
            .get("package")
            .ok_or_else(|| ManifestError::MissingField {
                path: path.to_path_buf(),
                field: "package".to_string(),
            })?;

        let version_str = package
            .get("version")
            .and_then(toml_edit::Item::as_str)
            .ok_or_else(|| ManifestError::MissingField {
                path: path.to_path_buf(),
                field: "package.version (as string)".to_string(),
            })?;

        Version::parse(version_str).map_err(|source| ManifestError::InvalidVersion {
            path: path.to_path_buf(),
            version: version_str.to_string(),
            source,
        })
    }

    fn update_version(&self, path: &Path, version: &Version) -> Result<(), ManifestError> {
        let mut doc = read_document(path)?;

        let package_table = doc
            .get_mut("package")
            .and_then(toml_edit::Item::as_table_like_mut)
            .ok_or_else(|| ManifestError::MissingField {
                path: path.to_path_buf(),
                field: "package (as table)".to_string(),
            })?;

        package_table.insert("version", value(version.to_string()));

        std::fs::write(path, doc.to_string()).map_err(|source| ManifestError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    fn list_version_files(&self, root: &Path) -> Result<Vec<PathBuf>, ManifestError> {
        walk_files(root, |path| {
            path.file_name().is_some_and(|name| name == FILE_NAME) && has_package_table(path)
        })
    }
}
