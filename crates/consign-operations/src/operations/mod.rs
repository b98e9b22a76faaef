mod add;
mod context;
mod pre_release;
mod promote;
mod snapshot;
mod status;
mod version;

pub use add::{AddInput, AddOperation, AddOutput};
pub use pre_release::{PreReleaseInput, PreReleaseOperation, PreReleaseOutput};
pub use promote::PromoteOperation;
pub use snapshot::{SnapshotInput, SnapshotOperation, SnapshotOutput, SnapshotRelease};
pub use status::{StatusOperation, StatusOutput};
pub use version::{Release, VersionInput, VersionOperation, VersionOutput};
