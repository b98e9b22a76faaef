use std::path::Path;

use crate::Result;
use crate::operations::pre_release::{
    PreReleaseInput, PreReleaseOutput, StageProviders, Transition, run_transition,
};
use crate::traits::{
    ConsignmentReader, PackageVersionIO, ProjectProvider, ReleaseStateIO, TagRenderer,
};

pub struct PromoteOperation<P, R, V, S, T> {
    project_provider: P,
    consignment_reader: R,
    version_io: V,
    release_state_io: S,
    tag_renderer: T,
}

impl<P, R, V, S, T> PromoteOperation<P, R, V, S, T>
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

    /// Moves every bumped package to its next pre-release stage.
    ///
    /// # Errors
    ///
    /// Returns a recoverable `StageError::NoPriorState` or
    /// `StageError::AlreadyAtHighestStage` (wrapped) if any package cannot be
    /// promoted, in which case nothing is written. Otherwise fails like
    /// [`PreReleaseOperation::execute`](crate::operations::PreReleaseOperation::execute).
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
            Transition::Promote,
        )
    }
}
