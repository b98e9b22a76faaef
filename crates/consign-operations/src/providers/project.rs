use std::path::Path;

use consign_project::{ProjectConfig, discover_project};

use crate::Result;
use crate::traits::ProjectProvider;

#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystemProjectProvider;

impl FileSystemProjectProvider {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ProjectProvider for FileSystemProjectProvider {
    fn discover_project(&self, start_path: &Path) -> Result<ProjectConfig> {
        Ok(discover_project(start_path)?)
    }
}
