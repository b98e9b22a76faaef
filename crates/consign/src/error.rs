use consign_operations::OperationError;
use thiserror::Error;

pub(crate) const FAILURE_EXIT_CODE: u8 = 1;
/// Stage conditions the user resolves by running another command.
pub(crate) const RECOVERABLE_EXIT_CODE: u8 = 2;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error("failed to determine current directory")]
    CurrentDir(#[source] std::io::Error),

    #[error("failed to read summary from stdin")]
    Stdin(#[source] std::io::Error),

    #[error("invalid metadata '{0}': expected KEY=VALUE")]
    InvalidMetadata(String),

    #[error("duplicate metadata key '{0}'")]
    DuplicateMetadata(String),

    #[error("failed to render JSON output")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    pub(crate) fn exit_code(&self) -> u8 {
        match self {
            Self::Operation(e) if e.is_recoverable() => RECOVERABLE_EXIT_CODE,
            _ => FAILURE_EXIT_CODE,
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
