use std::path::Path;

use consign_project::ProjectConfig;

use crate::Result;

pub trait ProjectProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if no configuration is found or it cannot be loaded.
    fn discover_project(&self, start_path: &Path) -> Result<ProjectConfig>;
}
