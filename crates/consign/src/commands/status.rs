use std::path::Path;

use consign_operations::operations::StatusOperation;
use consign_operations::providers::{
    FileSystemConsignmentIO, FileSystemProjectProvider, FileSystemReleaseStateIO,
    FileSystemVersionIO,
};

use super::{OutputFormat, StatusArgs};
use crate::error::Result;
use crate::output::{JsonStatusFormatter, PlainTextStatusFormatter, StatusFormatter};

pub(super) fn run(args: &StatusArgs, start_path: &Path) -> Result<()> {
    let operation = StatusOperation::new(
        FileSystemProjectProvider::new(),
        FileSystemConsignmentIO::new(),
        FileSystemVersionIO::new(),
        FileSystemReleaseStateIO::new(),
    );
    let output = operation.execute(start_path)?;

    let formatter: &dyn StatusFormatter = match args.format {
        OutputFormat::Plain => &PlainTextStatusFormatter,
        OutputFormat::Json => &JsonStatusFormatter,
    };
    print!("{}", formatter.format_status(&output)?);

    Ok(())
}
