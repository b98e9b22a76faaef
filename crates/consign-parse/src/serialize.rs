use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use consign_core::{BumpType, Consignment};

use crate::error::FormatError;
use crate::parse::{FRONT_MATTER_DELIMITER, validate_id, validate_packages};

#[derive(Serialize)]
struct FrontMatterOutput<'a> {
    packages: Vec<&'a str>,
    change_type: BumpType,
    timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<&'a IndexMap<String, String>>,
}

fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Renders a consignment as front matter plus a markdown summary body.
///
/// The id is not written; it is the name the file is stored under.
///
/// # Errors
///
/// Returns a `FormatError` if the consignment is invalid or YAML
/// serialization fails.
#[must_use = "serialization result should be handled"]
pub fn serialize_consignment(consignment: &Consignment) -> Result<String, FormatError> {
    validate_id(&consignment.id)?;
    validate_packages(consignment.packages.iter().map(String::as_str))?;

    let front_matter = FrontMatterOutput {
        packages: consignment.packages.iter().map(String::as_str).collect(),
        change_type: consignment.change_type,
        timestamp: format_timestamp(&consignment.timestamp),
        metadata: Some(&consignment.metadata).filter(|m| !m.is_empty()),
    };

    let yaml = serde_yml::to_string(&front_matter)?;

    let mut output = String::new();
    output.push_str(FRONT_MATTER_DELIMITER);
    output.push('\n');
    output.push_str(&yaml);
    output.push_str(FRONT_MATTER_DELIMITER);
    output.push('\n');

    if !consignment.summary.is_empty() {
        output.push_str(&consignment.summary);
        output.push('\n');
    }

    Ok(output)
}
