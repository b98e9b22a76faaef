use std::io::Read as _;
use std::path::Path;

use chrono::Utc;
use consign_operations::operations::{AddInput, AddOperation};
use consign_operations::providers::{FileSystemConsignmentIO, FileSystemProjectProvider};
use indexmap::IndexMap;

use super::AddArgs;
use crate::error::{CliError, Result};

pub(super) fn run(args: AddArgs, start_path: &Path) -> Result<()> {
    let metadata = parse_metadata(&args.metadata)?;
    let summary = if args.message == "-" {
        read_summary_from_stdin()?
    } else {
        args.message
    };

    let operation = AddOperation::new(
        FileSystemProjectProvider::new(),
        FileSystemConsignmentIO::new(),
    );
    let output = operation.execute(
        start_path,
        AddInput {
            packages: args.packages,
            change_type: args.bump,
            summary,
            metadata,
            timestamp: Utc::now(),
        },
    )?;

    println!("Created consignment: {}", output.path.display());
    println!();
    println!("Summary: {}", output.consignment.summary);
    println!("Change type: {}", output.consignment.change_type);
    println!("Packages:");
    for package in &output.consignment.packages {
        println!("  - {package}");
    }

    Ok(())
}

fn parse_metadata(entries: &[String]) -> Result<IndexMap<String, String>> {
    let mut metadata = IndexMap::new();

    for entry in entries {
        let Some((key, value)) = entry.split_once('=') else {
            return Err(CliError::InvalidMetadata(entry.clone()));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(CliError::InvalidMetadata(entry.clone()));
        }
        if metadata
            .insert(key.to_string(), value.trim().to_string())
            .is_some()
        {
            return Err(CliError::DuplicateMetadata(key.to_string()));
        }
    }

    Ok(metadata)
}

fn read_summary_from_stdin() -> Result<String> {
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .map_err(CliError::Stdin)?;
    Ok(buffer)
}
