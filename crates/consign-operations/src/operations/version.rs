use std::path::{Path, PathBuf};

use consign_core::VersionBump;
use tracing::info;

use crate::Result;
use crate::operations::context::ReleaseContext;
use crate::stage::finish_pre_release;
use crate::traits::{
    ConsignmentReader, ConsignmentWriter, PackageVersionIO, ProjectProvider, ReleaseStateIO,
    TagContext, TagRenderer,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct VersionInput {
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub bump: VersionBump,
    pub tag_name: String,
}

#[derive(Debug)]
pub struct VersionOutput {
    /// In package-name order.
    pub releases: Vec<Release>,
    pub removed_consignments: Vec<PathBuf>,
    pub dry_run: bool,
}

pub struct VersionOperation<P, C, V, S, T> {
    project_provider: P,
    consignment_io: C,
    version_io: V,
    release_state_io: S,
    tag_renderer: T,
}

impl<P, C, V, S, T> VersionOperation<P, C, V, S, T>
where
    P: ProjectProvider,
    C: ConsignmentReader + ConsignmentWriter,
    V: PackageVersionIO,
    S: ReleaseStateIO,
    T: TagRenderer,
{
    pub fn new(
        project_provider: P,
        consignment_io: C,
        version_io: V,
        release_state_io: S,
        tag_renderer: T,
    ) -> Self {
        Self {
            project_provider,
            consignment_io,
            version_io,
            release_state_io,
            tag_renderer,
        }
    }

    /// Applies pending consignments as stable releases.
    ///
    /// New versions are written, the consumed consignments removed and any
    /// pre-release state for the released packages dropped. With `dry_run`
    /// nothing is written.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::UnknownPackage` if a consignment names a package
    /// that is not configured, `OperationError::NothingToRelease` if no package
    /// is bumped, and an error if any file cannot be read or written.
    pub fn execute(&self, start_path: &Path, input: VersionInput) -> Result<VersionOutput> {
        let config = self.project_provider.discover_project(start_path)?;
        let consignment_dir = config.consignment_path();
        let state = self
            .release_state_io
            .load_pre_release_state(&consignment_dir)?
            .unwrap_or_default();

        let context =
            ReleaseContext::load(config, &self.consignment_io, &self.version_io, &state)?;
        context.ensure_known_packages()?;
        context.ensure_pending()?;

        let releases: Vec<Release> = context
            .plan
            .iter()
            .map(|bump| Release {
                tag_name: self.tag_renderer.render(
                    context.config.tag_template(),
                    &TagContext {
                        package: &bump.package,
                        version: &bump.new_version,
                        stage: None,
                        counter: None,
                    },
                ),
                bump: bump.clone(),
            })
            .collect();
        let consumed: Vec<PathBuf> = context
            .consignments
            .iter()
            .map(|(path, _)| path.clone())
            .collect();

        if input.dry_run {
            return Ok(VersionOutput {
                releases,
                removed_consignments: consumed,
                dry_run: true,
            });
        }

        for release in &releases {
            let package = context.package(&release.bump.package)?;
            self.version_io
                .write_version(context.config.root(), package, &release.bump.new_version)?;
            info!(
                package = %release.bump.package,
                from = %release.bump.old_version,
                to = %release.bump.new_version,
                "released"
            );
        }

        for path in &consumed {
            self.consignment_io.remove_consignment(path)?;
        }

        let next = finish_pre_release(
            &state,
            releases.iter().map(|r| r.bump.package.as_str()),
        );
        if next != state {
            self.release_state_io
                .save_pre_release_state(&consignment_dir, &next)?;
        }

        Ok(VersionOutput {
            releases,
            removed_consignments: consumed,
            dry_run: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use consign_core::{BumpType, ChangeSource};
    use consign_project::{PackageStageState, PreReleaseState};
    use semver::Version;

    use super::*;
    use crate::OperationError;
    use crate::mocks::{
        MockConsignmentIO, MockProjectProvider, MockReleaseStateIO, MockVersionIO,
        make_consignment,
    };
    use crate::providers::PlaceholderTagRenderer;

    struct Fixture {
        consignments: Arc<MockConsignmentIO>,
        versions: Arc<MockVersionIO>,
        state: Arc<MockReleaseStateIO>,
    }

    impl Fixture {
        fn new(consignments: MockConsignmentIO, versions: &[(&str, &str)]) -> Self {
            Self {
                consignments: Arc::new(consignments),
                versions: Arc::new(MockVersionIO::new(versions)),
                state: Arc::new(MockReleaseStateIO::new()),
            }
        }

        fn with_state(mut self, state: PreReleaseState) -> Self {
            self.state = Arc::new(MockReleaseStateIO::new().with_pre_release_state(state));
            self
        }

        fn run(&self, dry_run: bool) -> Result<VersionOutput> {
            VersionOperation::new(
                MockProjectProvider::core_api(),
                Arc::clone(&self.consignments),
                Arc::clone(&self.versions),
                Arc::clone(&self.state),
                PlaceholderTagRenderer,
            )
            .execute(Path::new("/any"), VersionInput { dry_run })
        }
    }

    #[test]
    fn releases_direct_and_propagated_packages() {
        let fixture = Fixture::new(
            MockConsignmentIO::new()
                .with_consignment(make_consignment("one", &["core"], BumpType::Minor)),
            &[("core", "1.0.0"), ("api", "2.0.0")],
        );

        let output = fixture.run(false).expect("version");

        let tags: Vec<_> = output.releases.iter().map(|r| r.tag_name.as_str()).collect();
        assert_eq!(tags, vec!["api@2.1.0", "core@1.1.0"]);
        assert_eq!(output.releases[0].bump.source, ChangeSource::Propagated);
        assert_eq!(fixture.versions.version("core"), Some(Version::new(1, 1, 0)));
        assert_eq!(fixture.versions.version("api"), Some(Version::new(2, 1, 0)));
        assert_eq!(
            fixture.consignments.removed(),
            vec![PathBuf::from("/mock/project/.consign/one.md")]
        );
        assert!(fixture.consignments.consignments().is_empty());
    }

    #[test]
    fn dry_run_changes_nothing() {
        let fixture = Fixture::new(
            MockConsignmentIO::new()
                .with_consignment(make_consignment("one", &["core"], BumpType::Patch)),
            &[("core", "1.0.0"), ("api", "2.0.0")],
        );

        let output = fixture.run(true).expect("version");

        assert!(output.dry_run);
        assert_eq!(output.releases.len(), 2);
        assert_eq!(output.removed_consignments.len(), 1);
        assert!(fixture.versions.written().is_empty());
        assert!(fixture.consignments.removed().is_empty());
    }

    #[test]
    fn nothing_pending_is_an_error() {
        let fixture = Fixture::new(MockConsignmentIO::new(), &[("core", "1.0.0"), ("api", "2.0.0")]);

        let err = fixture.run(false).expect_err("nothing pending");

        assert!(matches!(err, OperationError::NothingToRelease));
    }

    #[test]
    fn unknown_package_aborts_before_writing() {
        let fixture = Fixture::new(
            MockConsignmentIO::new()
                .with_consignment(make_consignment("one", &["core"], BumpType::Patch))
                .with_consignment(make_consignment("two", &["ghost"], BumpType::Major)),
            &[("core", "1.0.0"), ("api", "2.0.0")],
        );

        let err = fixture.run(false).expect_err("ghost is unknown");

        assert!(matches!(err, OperationError::UnknownPackage { ref name, .. } if name == "ghost"));
        assert!(fixture.versions.written().is_empty());
        assert!(fixture.consignments.removed().is_empty());
    }

    #[test]
    fn stable_release_ends_pre_release() {
        let mut state = PreReleaseState::new();
        state.insert(
            "core".to_string(),
            PackageStageState::new("rc", 2, Version::new(1, 1, 0))
                .with_stable_version(Version::new(1, 0, 0)),
        );
        state.insert(
            "api".to_string(),
            PackageStageState::new("alpha", 1, Version::new(2, 1, 0))
                .with_stable_version(Version::new(2, 0, 0)),
        );
        let fixture = Fixture::new(
            MockConsignmentIO::new()
                .with_consignment(make_consignment("one", &["core"], BumpType::Minor)),
            &[("core", "1.1.0-rc.2"), ("api", "2.1.0-alpha.1")],
        )
        .with_state(state);

        let output = fixture.run(false).expect("version");

        let versions: Vec<_> = output
            .releases
            .iter()
            .map(|r| (r.bump.old_version.to_string(), r.bump.new_version.to_string()))
            .collect();
        assert_eq!(
            versions,
            vec![
                ("2.0.0".to_string(), "2.1.0".to_string()),
                ("1.0.0".to_string(), "1.1.0".to_string()),
            ]
        );
        assert!(fixture.state.pre_release_state().is_none());
    }
}
