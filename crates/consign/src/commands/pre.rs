use std::path::Path;

use consign_operations::operations::{PreReleaseInput, PreReleaseOperation, PreReleaseOutput};
use consign_operations::providers::{
    FileSystemConsignmentIO, FileSystemProjectProvider, FileSystemReleaseStateIO,
    FileSystemVersionIO, PlaceholderTagRenderer,
};

use super::ReleaseArgs;
use crate::error::Result;

pub(super) fn run(args: &ReleaseArgs, start_path: &Path) -> Result<()> {
    let operation = PreReleaseOperation::new(
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

    print_stage_output("Pre-releases", &output);

    Ok(())
}

/// Shared by `pre` and `promote`.
pub(super) fn print_stage_output(heading: &str, output: &PreReleaseOutput) {
    if output.dry_run {
        println!("Dry run - no changes will be made.\n");
    }

    println!("{heading}:");
    for outcome in &output.outcomes {
        println!(
            "  {} {} (stage {}, target {}) tag {}",
            outcome.package, outcome.version, outcome.stage, outcome.target_version, outcome.tag_name
        );
    }

    if !output.drift.is_empty() {
        println!("\nWarning: Target versions changed since the last pre-release:");
        for drift in &output.drift {
            println!("  {}: {} -> {}", drift.package, drift.previous, drift.current);
        }
    }
}
