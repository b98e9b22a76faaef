use std::path::Path;

use tracing::info;

use crate::Result;
use crate::operations::context::ReleaseContext;
use crate::stage::{StageMachine, StageOutcome, TargetDrift};
use crate::traits::{
    ConsignmentReader, PackageVersionIO, ProjectProvider, ReleaseStateIO, TagRenderer,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct PreReleaseInput {
    pub dry_run: bool,
}

#[derive(Debug)]
pub struct PreReleaseOutput {
    /// In package-name order.
    pub outcomes: Vec<StageOutcome>,
    pub drift: Vec<TargetDrift>,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Transition {
    Next,
    Promote,
}

pub(super) struct StageProviders<'a, P, R, V, S, T: ?Sized> {
    pub project_provider: &'a P,
    pub consignment_reader: &'a R,
    pub version_io: &'a V,
    pub release_state_io: &'a S,
    pub tag_renderer: &'a T,
}

/// Read state, run one stage transition for every bumped package, write
/// versions and state. Consignments are left in place.
pub(super) fn run_transition<P, R, V, S, T>(
    providers: &StageProviders<'_, P, R, V, S, T>,
    start_path: &Path,
    input: PreReleaseInput,
    transition: Transition,
) -> Result<PreReleaseOutput>
where
    P: ProjectProvider,
    R: ConsignmentReader,
    V: PackageVersionIO,
    S: ReleaseStateIO,
    T: TagRenderer + ?Sized,
{
    let config = providers.project_provider.discover_project(start_path)?;
    let machine = StageMachine::new(config.stages(), config.tag_template())?;

    let consignment_dir = config.consignment_path();
    let state = providers
        .release_state_io
        .load_pre_release_state(&consignment_dir)?
        .unwrap_or_default();

    let context = ReleaseContext::load(
        config,
        providers.consignment_reader,
        providers.version_io,
        &state,
    )?;
    context.ensure_known_packages()?;
    context.ensure_pending()?;

    let bumps = context.plan.bumps();
    let run = match transition {
        Transition::Next => machine.pre_release(&state, bumps, providers.tag_renderer)?,
        Transition::Promote => machine.promote(&state, bumps, providers.tag_renderer)?,
    };

    if !input.dry_run {
        for outcome in &run.outcomes {
            let package = context.package(&outcome.package)?;
            providers
                .version_io
                .write_version(context.config.root(), package, &outcome.version)?;
            info!(package = %outcome.package, version = %outcome.version, "pre-release written");
        }
        providers
            .release_state_io
            .save_pre_release_state(&consignment_dir, &run.state)?;
    }

    Ok(PreReleaseOutput {
        outcomes: run.outcomes,
        drift: run.drift,
        dry_run: input.dry_run,
    })
}

pub struct PreReleaseOperation<P, R, V, S, T> {
    project_provider: P,
    consignment_reader: R,
    version_io: V,
    release_state_io: S,
    tag_renderer: T,
}

impl<P, R, V, S, T> PreReleaseOperation<P, R, V, S, T>
where
    P: ProjectProvider,
    R: ConsignmentReader,
    V: PackageVersionIO,
    S: ReleaseStateIO,
    T: TagRenderer,
{
    pub fn new(
        project_provider: P,
        consignment_reader: R,
        version_io: V,
        release_state_io: S,
        tag_renderer: T,
    ) -> Self {
        Self {
            project_provider,
            consignment_reader,
            version_io,
            release_state_io,
            tag_renderer,
        }
    }

    /// Cuts the next pre-release of every package the pending consignments bump.
    ///
    /// # Errors
    ///
    /// Returns `StageError::NoStagesConfigured` (wrapped) before reading anything
    /// else if no stages are configured, `OperationError::NothingToRelease` if
    /// nothing is pending, and an error if state or files cannot be read or
    /// written.
    pub fn execute(&self, start_path: &Path, input: PreReleaseInput) -> Result<PreReleaseOutput> {
        run_transition(
            &StageProviders {
                project_provider: &self.project_provider,
                consignment_reader: &self.consignment_reader,
                version_io: &self.version_io,
                release_state_io: &self.release_state_io,
                tag_renderer: &self.tag_renderer,
            },
            start_path,
            input,
            Transition::Next,
        )
    }
}
