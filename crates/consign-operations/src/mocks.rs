use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, Utc};
use consign_core::{BumpType, Consignment};
use consign_project::{PackageConfig, PreReleaseState, ProjectConfig, VersionFileFormat, parse_config};
use indexmap::IndexMap;
use semver::Version;

use crate::Result;
use crate::error::OperationError;
use crate::traits::{
    ConsignmentReader, ConsignmentWriter, PackageVersionIO, ProjectProvider, ReleaseStateIO,
};

pub const MOCK_ROOT: &str = "/mock/project";

pub struct MockProjectProvider {
    config: ProjectConfig,
}

impl MockProjectProvider {
    /// # Panics
    ///
    /// Panics if the configuration text is invalid.
    #[must_use]
    pub fn from_toml(content: &str) -> Self {
        Self {
            config: parse_config(Path::new(MOCK_ROOT), content).expect("valid mock configuration"),
        }
    }

    /// `core` and `api`, with `api` linked to `core`, and stages alpha, beta, rc.
    #[must_use]
    pub fn core_api() -> Self {
        Self::from_toml(
            r#"
[[packages]]
name = "core"
version_file = "core/VERSION"

[[packages]]
name = "api"
version_file = "api/VERSION"
dependencies = [{ package = "core" }]

[[stages]]
name = "alpha"
order = 1

[[stages]]
name = "beta"
order = 2

[[stages]]
name = "rc"
order = 3
"#,
        )
    }

    #[must_use]
    pub fn consignment_dir(&self) -> PathBuf {
        self.config.consignment_path()
    }
}

impl ProjectProvider for MockProjectProvider {
    fn discover_project(&self, _start_path: &Path) -> Result<ProjectConfig> {
        Ok(self.config.clone())
    }
}

pub struct MockConsignmentIO {
    consignments: RwLock<BTreeMap<PathBuf, Consignment>>,
    removed: Mutex<Vec<PathBuf>>,
    next_id: Mutex<usize>,
}

impl MockConsignmentIO {
    #[must_use]
    pub fn new() -> Self {
        Self {
            consignments: RwLock::new(BTreeMap::new()),
            removed: Mutex::new(Vec::new()),
            next_id: Mutex::new(0),
        }
    }

    #[must_use]
    pub fn with_consignment(self, consignment: Consignment) -> Self {
        let path = PathBuf::from(MOCK_ROOT)
            .join(".consign")
            .join(format!("{}.md", consignment.id));
        self.consignments
            .write()
            .expect("lock poisoned")
            .insert(path, consignment);
        self
    }

    #[must_use]
    pub fn consignments(&self) -> Vec<Consignment> {
        self.consignments
            .read()
            .expect("lock poisoned")
            .values()
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn removed(&self) -> Vec<PathBuf> {
        self.removed.lock().expect("lock poisoned").clone()
    }
}

impl Default for MockConsignmentIO {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsignmentReader for MockConsignmentIO {
    fn list_consignments(&self, consignment_dir: &Path) -> Result<Vec<PathBuf>> {
        Ok(self
            .consignments
            .read()
            .expect("lock poisoned")
            .keys()
            .filter(|path| path.starts_with(consignment_dir))
            .cloned()
            .collect())
    }

    fn read_consignment(&self, path: &Path) -> Result<Consignment> {
        self.consignments
            .read()
            .expect("lock poisoned")
            .get(path)
            .cloned()
            .ok_or_else(|| OperationError::ConsignmentFileRead {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not in mock"),
            })
    }
}

impl ConsignmentWriter for MockConsignmentIO {
    fn generate_id(&self, _consignment_dir: &Path) -> String {
        let mut next = self.next_id.lock().expect("lock poisoned");
        *next += 1;
        format!("mock-consignment-{next}")
    }

    fn write_consignment(
        &self,
        consignment_dir: &Path,
        consignment: &Consignment,
    ) -> Result<PathBuf> {
        let path = consignment_dir.join(format!("{}.md", consignment.id));
        self.consignments
            .write()
            .expect("lock poisoned")
            .insert(path.clone(), consignment.clone());
        Ok(path)
    }

    fn remove_consignment(&self, path: &Path) -> Result<()> {
        self.consignments
            .write()
            .expect("lock poisoned")
            .remove(path);
        self.removed
            .lock()
            .expect("lock poisoned")
            .push(path.to_path_buf());
        Ok(())
    }
}

impl ConsignmentReader for Arc<MockConsignmentIO> {
    fn list_consignments(&self, consignment_dir: &Path) -> Result<Vec<PathBuf>> {
        (**self).list_consignments(consignment_dir)
    }

    fn read_consignment(&self, path: &Path) -> Result<Consignment> {
        (**self).read_consignment(path)
    }
}

impl ConsignmentWriter for Arc<MockConsignmentIO> {
    fn generate_id(&self, consignment_dir: &Path) -> String {
        (**self).generate_id(consignment_dir)
    }

    fn write_consignment(
        &self,
        consignment_dir: &Path,
        consignment: &Consignment,
    ) -> Result<PathBuf> {
        (**self).write_consignment(consignment_dir, consignment)
    }

    fn remove_consignment(&self, path: &Path) -> Result<()> {
        (**self).remove_consignment(path)
    }
}

pub struct MockVersionIO {
    versions: RwLock<BTreeMap<String, Version>>,
    written: Mutex<Vec<(String, Version)>>,
    version_files: Vec<PathBuf>,
}

impl MockVersionIO {
    /// # Panics
    ///
    /// Panics if any version string is not valid semver.
    #[must_use]
    pub fn new(versions: &[(&str, &str)]) -> Self {
        Self {
            versions: RwLock::new(
                versions
                    .iter()
                    .map(|(name, version)| {
                        (
                            (*name).to_string(),
                            version.parse().expect("valid version"),
                        )
                    })
                    .collect(),
            ),
            written: Mutex::new(Vec::new()),
            version_files: Vec::new(),
        }
    }

    /// Files reported by `list_version_files`, relative to [`MOCK_ROOT`].
    #[must_use]
    pub fn with_version_files(mut self, paths: &[&str]) -> Self {
        self.version_files = paths.iter().map(|p| Path::new(MOCK_ROOT).join(p)).collect();
        self
    }

    #[must_use]
    pub fn written(&self) -> Vec<(String, Version)> {
        self.written.lock().expect("lock poisoned").clone()
    }

    #[must_use]
    pub fn version(&self, package: &str) -> Option<Version> {
        self.versions
            .read()
            .expect("lock poisoned")
            .get(package)
            .cloned()
    }
}

impl PackageVersionIO for MockVersionIO {
    fn read_version(&self, root: &Path, package: &PackageConfig) -> Result<Version> {
        self.version(&package.name).ok_or_else(|| {
            OperationError::Manifest(consign_manifest::ManifestError::Read {
                path: root.join(&package.version_file),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not in mock"),
            })
        })
    }

    fn write_version(
        &self,
        _root: &Path,
        package: &PackageConfig,
        version: &Version,
    ) -> Result<()> {
        self.versions
            .write()
            .expect("lock poisoned")
            .insert(package.name.clone(), version.clone());
        self.written
            .lock()
            .expect("lock poisoned")
            .push((package.name.clone(), version.clone()));
        Ok(())
    }

    fn list_version_files(&self, _root: &Path, _format: VersionFileFormat) -> Result<Vec<PathBuf>> {
        Ok(self.version_files.clone())
    }
}

impl PackageVersionIO for Arc<MockVersionIO> {
    fn read_version(&self, root: &Path, package: &PackageConfig) -> Result<Version> {
        (**self).read_version(root, package)
    }

    fn write_version(
        &self,
        root: &Path,
        package: &PackageConfig,
        version: &Version,
    ) -> Result<()> {
        (**self).write_version(root, package, version)
    }

    fn list_version_files(&self, root: &Path, format: VersionFileFormat) -> Result<Vec<PathBuf>> {
        (**self).list_version_files(root, format)
    }
}

#[derive(Default)]
pub struct MockReleaseStateIO {
    pre_release_state: RwLock<Option<PreReleaseState>>,
}

impl MockReleaseStateIO {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_pre_release_state(self, state: PreReleaseState) -> Self {
        *self.pre_release_state.write().expect("lock poisoned") = Some(state);
        self
    }

    #[must_use]
    pub fn pre_release_state(&self) -> Option<PreReleaseState> {
        self.pre_release_state
            .read()
            .expect("lock poisoned")
            .clone()
    }
}

impl ReleaseStateIO for MockReleaseStateIO {
    fn load_pre_release_state(&self, _consignment_dir: &Path) -> Result<Option<PreReleaseState>> {
        Ok(self.pre_release_state())
    }

    fn save_pre_release_state(
        &self,
        _consignment_dir: &Path,
        state: &PreReleaseState,
    ) -> Result<()> {
        *self.pre_release_state.write().expect("lock poisoned") = if state.is_empty() {
            None
        } else {
            Some(state.clone())
        };
        Ok(())
    }
}

impl ReleaseStateIO for Arc<MockReleaseStateIO> {
    fn load_pre_release_state(&self, consignment_dir: &Path) -> Result<Option<PreReleaseState>> {
        (**self).load_pre_release_state(consignment_dir)
    }

    fn save_pre_release_state(
        &self,
        consignment_dir: &Path,
        state: &PreReleaseState,
    ) -> Result<()> {
        (**self).save_pre_release_state(consignment_dir, state)
    }
}

/// # Panics
///
/// Panics if the fixed timestamp is out of range.
#[must_use]
pub fn make_consignment(id: &str, packages: &[&str], change_type: BumpType) -> Consignment {
    Consignment {
        id: id.to_string(),
        timestamp: DateTime::<Utc>::from_timestamp(1_767_225_600, 0).expect("valid timestamp"),
        packages: packages.iter().map(|p| (*p).to_string()).collect(),
        change_type,
        summary: format!("Change {id}"),
        metadata: IndexMap::new(),
    }
}
