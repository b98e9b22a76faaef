mod add;
mod pre;
mod promote;
mod snapshot;
mod status;
mod version;

use std::path::Path;

use chrono::{DateTime, Utc};
use clap::{Args, Subcommand, ValueEnum};
use consign_core::BumpType;

use crate::error::Result;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Record a new consignment
    Add(AddArgs),
    /// Preview the version bumps pending consignments would produce
    Status(StatusArgs),
    /// Apply pending consignments as stable releases
    Version(ReleaseArgs),
    /// Cut the next pre-release in the current stage
    Pre(ReleaseArgs),
    /// Move pre-releases to the next stage
    Promote(ReleaseArgs),
    /// Write timestamped snapshot versions without touching pre-release state
    Snapshot(SnapshotArgs),
}

impl Commands {
    pub(crate) fn execute(self, start_path: &Path) -> Result<()> {
        match self {
            Self::Add(args) => add::run(args, start_path),
            Self::Status(args) => status::run(&args, start_path),
            Self::Version(args) => version::run(&args, start_path),
            Self::Pre(args) => pre::run(&args, start_path),
            Self::Promote(args) => promote::run(&args, start_path),
            Self::Snapshot(args) => snapshot::run(&args, start_path),
        }
    }
}

#[derive(Args)]
pub(crate) struct AddArgs {
    /// Package affected by the change (repeatable)
    #[arg(long = "package", short = 'p', required = true)]
    pub packages: Vec<String>,

    /// Severity of the change
    #[arg(long, short = 'b', value_enum)]
    pub bump: BumpType,

    /// Summary of the change; `-` reads it from stdin
    #[arg(long, short = 'm')]
    pub message: String,

    /// Extra KEY=VALUE metadata (repeatable)
    #[arg(long = "meta")]
    pub metadata: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Plain,
    Json,
}

#[derive(Args)]
pub(crate) struct StatusArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
    pub format: OutputFormat,
}

#[derive(Args)]
pub(crate) struct ReleaseArgs {
    /// Show what would change without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub(crate) struct SnapshotArgs {
    /// Show what would change without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// UTC timestamp for the snapshot identifier, RFC 3339 (default: now)
    #[arg(long)]
    pub timestamp: Option<DateTime<Utc>>,
}
