use std::path::{Path, PathBuf};

use consign_core::{Consignment, VersionBump};
use consign_project::{PreReleaseState, ProjectConfig};

use crate::Result;
use crate::operations::context::ReleaseContext;
use crate::traits::{ConsignmentReader, PackageVersionIO, ProjectProvider, ReleaseStateIO};

pub struct StatusOutput {
    pub consignments: Vec<Consignment>,
    /// Sorted by package name.
    pub bumps: Vec<VersionBump>,
    pub unknown_packages: Vec<String>,
    pub cycles: Vec<Vec<String>>,
    pub unchanged_packages: Vec<String>,
    /// Version files found in the project that no package is configured
    /// with, relative to the project root and sorted.
    pub untracked_version_files: Vec<PathBuf>,
    pub pre_release: PreReleaseState,
}

pub struct StatusOperation<P, R, V, S> {
    project_provider: P,
    consignment_reader: R,
    version_io: V,
    release_state_io: S,
}

impl<P, R, V, S> StatusOperation<P, R, V, S>
where
    P: ProjectProvider,
    R: ConsignmentReader,
    V: PackageVersionIO,
    S: ReleaseStateIO,
{
    pub fn new(project_provider: P, consignment_reader: R, version_io: V, release_state_io: S) -> Self {
        Self {
            project_provider,
            consignment_reader,
            version_io,
            release_state_io,
        }
    }

    /// Previews the bumps pending consignments would produce. Nothing is written.
    ///
    /// # Errors
    ///
    /// Returns an error if the project, consignments, versions or pre-release
    /// state cannot be read, or the dependency graph is invalid.
    pub fn execute(&self, start_path: &Path) -> Result<StatusOutput> {
        let config = self.project_provider.discover_project(start_path)?;
        let pre_release = self
            .release_state_io
            .load_pre_release_state(&config.consignment_path())?
            .unwrap_or_default();

        let context = ReleaseContext::load(
            config,
            &self.consignment_reader,
            &self.version_io,
            &pre_release,
        )?;

        let untracked_version_files = self.untracked_version_files(&context.config)?;
        let bumps: Vec<VersionBump> = context.plan.iter().cloned().collect();
        let unchanged_packages = context
            .graph
            .names()
            .filter(|name| context.plan.get(name).is_none())
            .map(str::to_string)
            .collect();

        Ok(StatusOutput {
            consignments: context.consignments.into_iter().map(|(_, c)| c).collect(),
            bumps,
            unknown_packages: context.plan.unknown_packages().to_vec(),
            cycles: context.graph.cycles(),
            unchanged_packages,
            untracked_version_files,
            pre_release,
        })
    }

    fn untracked_version_files(&self, config: &ProjectConfig) -> Result<Vec<PathBuf>> {
        let root = config.root();
        let claimed: Vec<PathBuf> = config
            .packages()
            .iter()
            .map(|p| root.join(&p.version_file))
            .collect();
        let mut formats = Vec::new();
        for package in config.packages() {
            if !formats.contains(&package.format) {
                formats.push(package.format);
            }
        }

        let mut untracked = Vec::new();
        for format in formats {
            for path in self.version_io.list_version_files(root, format)? {
                if claimed.contains(&path) {
                    continue;
                }
                let relative = path.strip_prefix(root).map_or_else(|_| path.clone(), Path::to_path_buf);
                untracked.push(relative);
            }
        }
        untracked.sort();
        untracked.dedup();
        Ok(untracked)
    }
}
