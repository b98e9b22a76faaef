use std::fmt::Write as _;
use std::path::PathBuf;

use consign_core::VersionBump;
use consign_operations::operations::StatusOutput;
use consign_project::PreReleaseState;
use serde::Serialize;

use crate::error::Result;

pub(crate) trait StatusFormatter {
    /// # Errors
    ///
    /// Returns an error if the output cannot be rendered.
    fn format_status(&self, output: &StatusOutput) -> Result<String>;
}

pub(crate) struct PlainTextStatusFormatter;

impl PlainTextStatusFormatter {
    fn format_consignments(output: &mut String, status: &StatusOutput) {
        let _ = writeln!(output, "Pending consignments: {}", status.consignments.len());
        for consignment in &status.consignments {
            let _ = writeln!(
                output,
                "  {} ({}): {}",
                consignment.id,
                consignment.change_type,
                first_line(&consignment.summary)
            );
        }
    }

    fn format_projected_releases(output: &mut String, status: &StatusOutput) {
        if status.bumps.is_empty() {
            return;
        }

        output.push('\n');
        output.push_str("Projected releases:\n");
        for bump in &status.bumps {
            let _ = writeln!(
                output,
                "  {}: {} -> {} ({}, {})",
                bump.package, bump.old_version, bump.new_version, bump.change_type, bump.source
            );
        }
    }

    fn format_unchanged_packages(output: &mut String, status: &StatusOutput) {
        if status.unchanged_packages.is_empty() {
            return;
        }

        output.push('\n');
        output.push_str("Unchanged packages:\n");
        for package in &status.unchanged_packages {
            let _ = writeln!(output, "  {package}");
        }
    }

    fn format_untracked_version_files(output: &mut String, status: &StatusOutput) {
        if status.untracked_version_files.is_empty() {
            return;
        }

        output.push('\n');
        output.push_str("Version files not claimed by any package:\n");
        for path in &status.untracked_version_files {
            let _ = writeln!(output, "  {}", path.display());
        }
    }

    fn format_cycles(output: &mut String, status: &StatusOutput) {
        if status.cycles.is_empty() {
            return;
        }

        output.push('\n');
        output.push_str("Dependency cycles (released together):\n");
        for cycle in &status.cycles {
            let _ = writeln!(output, "  {}", cycle.join(", "));
        }
    }

    fn format_pre_release(output: &mut String, status: &StatusOutput) {
        if status.pre_release.is_empty() {
            return;
        }

        output.push('\n');
        output.push_str("Active pre-releases:\n");
        for (package, entry) in status.pre_release.iter() {
            let _ = writeln!(
                output,
                "  {package}: {}.{} (target {})",
                entry.stage, entry.counter, entry.target_version
            );
        }
    }

    fn format_unknown_packages(output: &mut String, status: &StatusOutput) {
        if status.unknown_packages.is_empty() {
            return;
        }

        output.push('\n');
        output.push_str("Warning: Unknown packages in consignments:\n");
        for package in &status.unknown_packages {
            let _ = writeln!(output, "  {package}");
        }
    }

    fn format_summary(output: &mut String, status: &StatusOutput) {
        output.push('\n');
        let _ = writeln!(
            output,
            "Summary: {} consignment(s), {} package(s) affected",
            status.consignments.len(),
            status.bumps.len()
        );
    }
}

impl StatusFormatter for PlainTextStatusFormatter {
    fn format_status(&self, status: &StatusOutput) -> Result<String> {
        let mut output = String::new();

        if status.consignments.is_empty() {
            output.push_str("No pending consignments.\n");
        } else {
            Self::format_consignments(&mut output, status);
            Self::format_projected_releases(&mut output, status);
            Self::format_unchanged_packages(&mut output, status);
            Self::format_unknown_packages(&mut output, status);
        }
        Self::format_untracked_version_files(&mut output, status);
        Self::format_cycles(&mut output, status);
        Self::format_pre_release(&mut output, status);
        if !status.consignments.is_empty() {
            Self::format_summary(&mut output, status);
        }

        Ok(output)
    }
}

#[derive(Serialize)]
struct StatusReport<'a> {
    consignments: Vec<&'a str>,
    bumps: &'a [VersionBump],
    unchanged_packages: &'a [String],
    unknown_packages: &'a [String],
    untracked_version_files: &'a [PathBuf],
    cycles: &'a [Vec<String>],
    pre_release: &'a PreReleaseState,
}

pub(crate) struct JsonStatusFormatter;

impl StatusFormatter for JsonStatusFormatter {
    fn format_status(&self, status: &StatusOutput) -> Result<String> {
        let report = StatusReport {
            consignments: status.consignments.iter().map(|c| c.id.as_str()).collect(),
            bumps: &status.bumps,
            unchanged_packages: &status.unchanged_packages,
            unknown_packages: &status.unknown_packages,
            untracked_version_files: &status.untracked_version_files,
            cycles: &status.cycles,
            pre_release: &status.pre_release,
        };
        let mut json = serde_json::to_string_pretty(&report)?;
        json.push('\n');
        Ok(json)
    }
}

fn first_line(summary: &str) -> &str {
    summary.lines().next().unwrap_or_default()
}
