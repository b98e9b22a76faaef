mod consignment_io;
mod project_provider;
mod release_state_io;
mod tag_renderer;
mod version_io;

pub use consignment_io::{ConsignmentReader, ConsignmentWriter};
pub use project_provider::ProjectProvider;
pub use release_state_io::ReleaseStateIO;
pub use tag_renderer::{TagContext, TagRenderer};
pub use version_io::PackageVersionIO;
