use std::path::Path;

use consign_operations::operations::{PreReleaseInput, PromoteOperation};
use consign_operations::providers::{
    FileSystemConsignmentIO, FileSystemProjectProvider, FileSystemReleaseStateIO,
    FileSystemVersionIO, PlaceholderTagRenderer,
};

use super::ReleaseArgs;
use super::pre::print_stage_output;
use crate::error::Result;

pub(super) fn run(args: &ReleaseArgs, start_path: &Path) -> Result<()> {
    let operation = PromoteOperation::new(
        FileSystemProjectProvider::new(),
        FileSystemConsignmentIO::new(),
        FileSystemVersionIO::new(),
        FileSystemReleaseStateIO::new(),
        PlaceholderTagRenderer,
    );
    let output = operation.execute(
        start_path,
        PreReleaseInput {
            dry_run: args.dry_run,
        },
    )?;

    print_stage_output("Promoted", &output);

    Ok(())
}
