mod config;
mod error;
mod release_state;

pub const DEFAULT_CONSIGNMENT_DIR: &str = ".consign";
pub const DEFAULT_TAG_TEMPLATE: &str = "{package}@{version}";
pub const CONFIG_FILENAME: &str = "consign.toml";

pub use config::{
    PackageConfig, ProjectConfig, StageConfig, VersionFileFormat, discover_project, load_config,
    parse_config,
};
pub use error::ProjectError;
pub use release_state::{PackageStageState, PreReleaseState};

pub type Result<T> = std::result::Result<T, ProjectError>;
