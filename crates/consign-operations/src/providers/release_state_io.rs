use std::fs;
use std::path::Path;

use consign_project::PreReleaseState;

use crate::Result;
use crate::error::OperationError;
use crate::traits::ReleaseStateIO;

pub const PRE_RELEASE_FILENAME: &str = "pre-release.toml";

#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystemReleaseStateIO;

impl FileSystemReleaseStateIO {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ReleaseStateIO for FileSystemReleaseStateIO {
    fn load_pre_release_state(&self, consignment_dir: &Path) -> Result<Option<PreReleaseState>> {
        let path = consignment_dir.join(PRE_RELEASE_FILENAME);
        if !path.exists() {
            return Ok(None);
        }

        let content =
            fs::read_to_string(&path).map_err(|source| OperationError::ReleaseStateRead {
                path: path.clone(),
                source,
            })?;

        let state = toml::from_str(&content)
            .map_err(|source| OperationError::ReleaseStateParse { path, source })?;

        Ok(Some(state))
    }

    fn save_pre_release_state(
        &self,
        consignment_dir: &Path,
        state: &PreReleaseState,
    ) -> Result<()> {
        let path = consignment_dir.join(PRE_RELEASE_FILENAME);

        if state.is_empty() {
            return match fs::remove_file(&path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(source) => Err(OperationError::ReleaseStateWrite { path, source }),
            };
        }

        let content = toml::to_string_pretty(state).map_err(|source| {
            OperationError::ReleaseStateSerialize {
                path: path.clone(),
                source,
            }
        })?;
        fs::create_dir_all(consignment_dir).map_err(|source| OperationError::ReleaseStateWrite {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, content)
            .map_err(|source| OperationError::ReleaseStateWrite { path, source })
    }
}
