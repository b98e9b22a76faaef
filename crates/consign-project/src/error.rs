use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("no consign.toml found traversing from '{start_dir}'")]
    NotFound { start_dir: PathBuf },

    #[error("failed to read configuration at '{path}'")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration at '{path}'")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("stages '{first}' and '{second}' share order {order}")]
    DuplicateStageOrder {
        order: u32,
        first: String,
        second: String,
    },

    #[error("stage '{name}' is defined more than once")]
    DuplicateStageName { name: String },

    #[error(
        "invalid stage name '{name}': use ASCII letters, digits and hyphens, starting with a letter"
    )]
    InvalidStageName { name: String },
}

impl ProjectError {
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        !matches!(self, Self::Io(_) | Self::ConfigRead { .. })
    }
}
