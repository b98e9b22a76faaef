use std::path::Path;

use chrono::Utc;
use consign_operations::operations::{SnapshotInput, SnapshotOperation};
use consign_operations::providers::{
    FileSystemConsignmentIO, FileSystemProjectProvider, FileSystemVersionIO,
    PlaceholderTagRenderer,
};

use super::SnapshotArgs;
use crate::error::Result;

pub(super) fn run(args: &SnapshotArgs, start_path: &Path) -> Result<()> {
    let operation = SnapshotOperation::new(
        FileSystemProjectProvider::new(),
        FileSystemConsignmentIO::new(),
        FileSystemVersionIO::new(),
        PlaceholderTagRenderer,
    );
    let output = operation.execute(
        start_path,
        SnapshotInput {
            timestamp: args.timestamp.unwrap_or_else(Utc::now),
            dry_run: args.dry_run,
        },
    )?;

    if output.dry_run {
        println!("Dry run - no changes will be made.\n");
    }
    println!("Snapshots:");
    for release in &output.releases {
        println!(
            "  {} {} -> {} tag {}",
            release.package, release.old_version, release.version, release.tag_name
        );
    }

    Ok(())
}
