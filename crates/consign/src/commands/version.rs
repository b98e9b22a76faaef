use std::path::Path;

use consign_operations::operations::{VersionInput, VersionOperation, VersionOutput};
use consign_operations::providers::{
    FileSystemConsignmentIO, FileSystemProjectProvider, FileSystemReleaseStateIO,
    FileSystemVersionIO, PlaceholderTagRenderer,
};

use super::ReleaseArgs;
use crate::error::Result;

pub(super) fn run(args: &ReleaseArgs, start_path: &Path) -> Result<()> {
    let operation = VersionOperation::new(
        FileSystemProjectProvider::new(),
        FileSystemConsignmentIO::new(),
        FileSystemVersionIO::new(),
        FileSystemReleaseStateIO::new(),
        PlaceholderTagRenderer,
    );
    let output = operation.execute(
        start_path,
        VersionInput {
            dry_run: args.dry_run,
        },
    )?;

    print_output(&output);

    Ok(())
}

fn print_output(output: &VersionOutput) {
    if output.dry_run {
        println!("Dry run - no changes will be made.\n");
    }

    println!("Releases:");
    for release in &output.releases {
        let bump = &release.bump;
        println!(
            "  {} {} -> {} ({}, {})",
            bump.package, bump.old_version, bump.new_version, bump.change_type, bump.source
        );
    }

    println!("\nTags:");
    for release in &output.releases {
        println!("  {}", release.tag_name);
    }

    let verb = if output.dry_run { "to consume" } else { "consumed" };
    println!(
        "\nConsignments {verb}: {}",
        output.removed_consignments.len()
    );
}
