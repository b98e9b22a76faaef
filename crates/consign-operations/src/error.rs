use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PropagationError {
    #[error(transparent)]
    Graph(#[from] consign_graph::GraphError),

    #[error("no current version known for package '{package}'")]
    MissingVersion { package: String },

    #[error(transparent)]
    Version(#[from] consign_version::VersionError),
}

#[derive(Debug, Error)]
pub enum StageError {
    #[error("no pre-release stages configured; add at least one [[stages]] entry")]
    NoStagesConfigured,

    #[error("stages '{first}' and '{second}' share order {order}")]
    DuplicateStageOrder {
        order: u32,
        first: String,
        second: String,
    },

    #[error("package '{package}' is in stage '{stage}', which is not configured")]
    UnknownStage { package: String, stage: String },

    #[error("package '{package}' has no active pre-release; run `consign pre` first")]
    NoPriorState { package: String },

    #[error(
        "package '{package}' is already at the highest stage '{stage}'; run `consign version` for a stable release"
    )]
    AlreadyAtHighestStage { package: String, stage: String },

    #[error("failed to build pre-release version")]
    Version(#[from] consign_version::VersionError),
}

impl StageError {
    /// Conditions a caller reports and exits cleanly on, rather than configuration
    /// or internal failures.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NoPriorState { .. } | Self::AlreadyAtHighestStage { .. }
        )
    }
}

#[derive(Debug, Error)]
pub enum OperationError {
    #[error(transparent)]
    Project(#[from] consign_project::ProjectError),

    #[error(transparent)]
    Graph(#[from] consign_graph::GraphError),

    #[error(transparent)]
    Propagation(#[from] PropagationError),

    #[error(transparent)]
    Stage(#[from] StageError),

    #[error(transparent)]
    Manifest(#[from] consign_manifest::ManifestError),

    #[error(transparent)]
    Parse(#[from] consign_parse::FormatError),

    #[error("version calculation failed")]
    Version(#[from] consign_version::VersionError),

    #[error("failed to read consignment file '{path}'")]
    ConsignmentFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse consignment file '{path}'")]
    ConsignmentParse {
        path: PathBuf,
        #[source]
        source: consign_parse::FormatError,
    },

    #[error("failed to write consignment file '{path}'")]
    ConsignmentFileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to remove consignment file '{path}'")]
    ConsignmentFileRemove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to list consignment files in '{path}'")]
    ConsignmentList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid consignment file name '{path}'")]
    InvalidConsignmentPath { path: PathBuf },

    #[error("failed to read release state file '{path}'")]
    ReleaseStateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write release state file '{path}'")]
    ReleaseStateWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse release state file '{path}'")]
    ReleaseStateParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize release state for '{path}'")]
    ReleaseStateSerialize {
        path: PathBuf,
        #[source]
        source: toml::ser::Error,
    },

    #[error("no packages configured in '{0}'")]
    EmptyProject(PathBuf),

    #[error("unknown package '{name}' (available: {available})")]
    UnknownPackage { name: String, available: String },

    #[error("no pending consignments; nothing to release")]
    NothingToRelease,

    #[error("no packages selected")]
    NoPackagesSelected,

    #[error("summary cannot be empty")]
    EmptySummary,

    #[error("IO error")]
    Io(#[from] std::io::Error),
}

impl OperationError {
    /// The stage-machine error behind this failure, if any.
    #[must_use]
    pub fn as_stage_error(&self) -> Option<&StageError> {
        match self {
            Self::Stage(err) => Some(err),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        self.as_stage_error().is_some_and(StageError::is_recoverable)
    }
}

pub type Result<T> = std::result::Result<T, OperationError>;
