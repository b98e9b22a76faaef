use std::path::Path;

use chrono::{DateTime, Utc};
use consign_project::PreReleaseState;
use consign_version::{SNAPSHOT_IDENTIFIER, snapshot_version};
use semver::Version;
use tracing::info;

use crate::Result;
use crate::operations::context::ReleaseContext;
use crate::traits::{ConsignmentReader, PackageVersionIO, ProjectProvider, TagContext, TagRenderer};

#[derive(Debug, Clone, Copy)]
pub struct SnapshotInput {
    pub timestamp: DateTime<Utc>,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRelease {
    pub package: String,
    pub old_version: Version,
    /// `<target>-snapshot.<YYYYMMDDHHMMSS>`.
    pub version: Version,
    pub tag_name: String,
}

#[derive(Debug)]
pub struct SnapshotOutput {
    pub releases: Vec<SnapshotRelease>,
    pub dry_run: bool,
}

/// Timestamped pre-releases outside the stage progression. The pre-release
/// state file is neither read nor written.
pub struct SnapshotOperation<P, R, V, T> {
    project_provider: P,
    consignment_reader: R,
    version_io: V,
    tag_renderer: T,
}

impl<P, R, V, T> SnapshotOperation<P, R, V, T>
where
    P: ProjectProvider,
    R: ConsignmentReader,
    V: PackageVersionIO,
    T: TagRenderer,
{
    pub fn new(project_provider: P, consignment_reader: R, version_io: V, tag_renderer: T) -> Self {
        Self {
            project_provider,
            consignment_reader,
            version_io,
            tag_renderer,
        }
    }

    /// # Errors
    ///
    /// Returns `OperationError::UnknownPackage` or
    /// `OperationError::NothingToRelease` like a stable release, and an error
    /// if any file cannot be read or written.
    pub fn execute(&self, start_path: &Path, input: SnapshotInput) -> Result<SnapshotOutput> {
        let config = self.project_provider.discover_project(start_path)?;
        let context = ReleaseContext::load(
            config,
            &self.consignment_reader,
            &self.version_io,
            &PreReleaseState::new(),
        )?;
        context.ensure_known_packages()?;
        context.ensure_pending()?;

        let mut releases = Vec::with_capacity(context.plan.len());
        for bump in context.plan.iter() {
            let version = snapshot_version(&bump.new_version, input.timestamp)?;
            let tag_name = self.tag_renderer.render(
                context.config.tag_template(),
                &TagContext {
                    package: &bump.package,
                    version: &version,
                    stage: Some(SNAPSHOT_IDENTIFIER),
                    counter: None,
                },
            );
            releases.push(SnapshotRelease {
                package: bump.package.clone(),
                old_version: bump.old_version.clone(),
                version,
                tag_name,
            });
        }

        if !input.dry_run {
            for release in &releases {
                let package = context.package(&release.package)?;
                self.version_io
                    .write_version(context.config.root(), package, &release.version)?;
                info!(package = %release.package, version = %release.version, "snapshot written");
            }
        }

        Ok(SnapshotOutput {
            releases,
            dry_run: input.dry_run,
        })
    }
}
