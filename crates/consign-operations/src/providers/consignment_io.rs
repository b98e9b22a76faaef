use std::fs;
use std::path::{Path, PathBuf};

use consign_core::Consignment;
use consign_parse::{parse_consignment, serialize_consignment};

use crate::Result;
use crate::error::OperationError;
use crate::traits::{ConsignmentReader, ConsignmentWriter};

const EXTENSION: &str = "md";
const MAX_ID_ATTEMPTS: usize = 100;

#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystemConsignmentIO;

impl FileSystemConsignmentIO {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn consignment_path(consignment_dir: &Path, id: &str) -> PathBuf {
    consignment_dir.join(format!("{id}.{EXTENSION}"))
}

impl ConsignmentReader for FileSystemConsignmentIO {
    fn list_consignments(&self, consignment_dir: &Path) -> Result<Vec<PathBuf>> {
        let entries = match fs::read_dir(consignment_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(OperationError::ConsignmentList {
                    path: consignment_dir.to_path_buf(),
                    source,
                });
            }
        };

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| OperationError::ConsignmentList {
                path: consignment_dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == EXTENSION) {
                paths.push(path);
            }
        }

        paths.sort();
        Ok(paths)
    }

    fn read_consignment(&self, path: &Path) -> Result<Consignment> {
        let id = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| OperationError::InvalidConsignmentPath {
                path: path.to_path_buf(),
            })?;

        let content =
            fs::read_to_string(path).map_err(|source| OperationError::ConsignmentFileRead {
                path: path.to_path_buf(),
                source,
            })?;

        parse_consignment(id, &content).map_err(|source| OperationError::ConsignmentParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl ConsignmentWriter for FileSystemConsignmentIO {
    fn generate_id(&self, consignment_dir: &Path) -> String {
        for _ in 0..MAX_ID_ATTEMPTS {
            if let Some(name) = petname::petname(3, "-") {
                if !consignment_path(consignment_dir, &name).exists() {
                    return name;
                }
            }
        }

        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        format!("consignment-{timestamp}")
    }

    fn write_consignment(
        &self,
        consignment_dir: &Path,
        consignment: &Consignment,
    ) -> Result<PathBuf> {
        let path = consignment_path(consignment_dir, &consignment.id);
        let content = serialize_consignment(consignment)?;

        fs::create_dir_all(consignment_dir).map_err(|source| {
            OperationError::ConsignmentFileWrite {
                path: path.clone(),
                source,
            }
        })?;
        fs::write(&path, content).map_err(|source| OperationError::ConsignmentFileWrite {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }

    fn remove_consignment(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).map_err(|source| OperationError::ConsignmentFileRemove {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use consign_core::BumpType;
    use indexmap::IndexMap;
    use tempfile::TempDir;

    use super::*;

    fn make_consignment(id: &str) -> Consignment {
        Consignment {
            id: id.to_string(),
            timestamp: DateTime::<Utc>::UNIX_EPOCH,
            packages: std::iter::once("core".to_string()).collect(),
            change_type: BumpType::Patch,
            summary: "Fix overflow".to_string(),
            metadata: IndexMap::new(),
        }
    }

    #[test]
    fn missing_directory_lists_nothing() {
        let dir = TempDir::new().expect("temp dir");

        let paths = FileSystemConsignmentIO::new()
            .list_consignments(&dir.path().join(".consign"))
            .expect("missing dir is empty");

        assert!(paths.is_empty());
    }

    #[test]
    fn write_then_read() {
        let dir = TempDir::new().expect("temp dir");
        let consignment_dir = dir.path().join(".consign");
        let io = FileSystemConsignmentIO::new();

        let path = io
            .write_consignment(&consignment_dir, &make_consignment("calm-river"))
            .expect("write");
        let read = io.read_consignment(&path).expect("read");

        assert_eq!(path, consignment_dir.join("calm-river.md"));
        assert_eq!(read, make_consignment("calm-river"));
    }

    #[test]
    fn lists_only_markdown_files_sorted() {
        let dir = TempDir::new().expect("temp dir");
        let io = FileSystemConsignmentIO::new();
        for id in ["zeta", "alpha"] {
            io.write_consignment(dir.path(), &make_consignment(id))
                .expect("write");
        }
        fs::write(dir.path().join("pre-release.toml"), "").expect("write state");

        let paths = io.list_consignments(dir.path()).expect("list");

        assert_eq!(
            paths,
            vec![dir.path().join("alpha.md"), dir.path().join("zeta.md")]
        );
    }

    #[test]
    fn parse_error_carries_path() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("broken.md");
        fs::write(&path, "no front matter\n").expect("write");

        let err = FileSystemConsignmentIO::new()
            .read_consignment(&path)
            .expect_err("malformed");

        assert!(matches!(
            err,
            OperationError::ConsignmentParse { path: ref p, .. } if p == &path
        ));
    }

    #[test]
    fn generated_ids_are_unused() {
        let dir = TempDir::new().expect("temp dir");
        let io = FileSystemConsignmentIO::new();

        let id = io.generate_id(dir.path());

        assert!(!id.is_empty());
        assert!(!consignment_path(dir.path(), &id).exists());
    }

    #[test]
    fn remove_deletes_file() {
        let dir = TempDir::new().expect("temp dir");
        let io = FileSystemConsignmentIO::new();
        let path = io
            .write_consignment(dir.path(), &make_consignment("brief-fox"))
            .expect("write");

        io.remove_consignment(&path).expect("remove");

        assert!(!path.exists());
    }
}
