mod cargo;
mod error;
mod plain;
mod traits;

pub use cargo::CargoVersionFile;
pub use error::ManifestError;
pub use plain::PlainVersionFile;
pub use traits::{VersionFile, version_file_for};
