use std::path::{Path, PathBuf};

use consign_core::Consignment;

use crate::Result;

pub trait ConsignmentReader: Send + Sync {
    /// Consignment files in `consignment_dir`, sorted. A missing directory
    /// holds no consignments.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    fn list_consignments(&self, consignment_dir: &Path) -> Result<Vec<PathBuf>>;

    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    fn read_consignment(&self, path: &Path) -> Result<Consignment>;
}

pub trait ConsignmentWriter: Send + Sync {
    /// An id not yet used by any consignment in `consignment_dir`.
    fn generate_id(&self, consignment_dir: &Path) -> String;

    /// Writes `<consignment_dir>/<id>.md`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the consignment cannot be serialized or written.
    fn write_consignment(
        &self,
        consignment_dir: &Path,
        consignment: &Consignment,
    ) -> Result<PathBuf>;

    /// # Errors
    ///
    /// Returns an error if the file cannot be removed.
    fn remove_consignment(&self, path: &Path) -> Result<()>;
}
