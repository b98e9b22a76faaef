mod consignment_io;
mod project;
mod release_state_io;
mod tag_renderer;
mod version_io;

pub use consignment_io::FileSystemConsignmentIO;
pub use project::FileSystemProjectProvider;
pub use release_state_io::{FileSystemReleaseStateIO, PRE_RELEASE_FILENAME};
pub use tag_renderer::PlaceholderTagRenderer;
pub use version_io::FileSystemVersionIO;
