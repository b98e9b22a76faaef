use std::path::Path;

use consign_project::PreReleaseState;

use crate::Result;

/// Persists pre-release progress in `<consignment_dir>/pre-release.toml`.
///
/// Callers read, compute and write back; there is no locking.
pub trait ReleaseStateIO: Send + Sync {
    /// Returns `Ok(None)` if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    fn load_pre_release_state(&self, consignment_dir: &Path) -> Result<Option<PreReleaseState>>;

    /// Deletes the file if state is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or deleted.
    fn save_pre_release_state(&self, consignment_dir: &Path, state: &PreReleaseState)
    -> Result<()>;
}
