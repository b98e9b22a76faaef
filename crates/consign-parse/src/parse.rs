use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_with::{MapPreventDuplicates, serde_as};

use consign_core::{BumpType, Consignment};

use crate::error::{FormatError, FrontMatterError, ValidationError};

pub(crate) const FRONT_MATTER_DELIMITER: &str = "---";

const MAX_INPUT_SIZE: usize = 100 * 1024 * 1024;

#[serde_as]
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct FrontMatter {
    packages: Vec<String>,
    change_type: BumpType,
    timestamp: DateTime<Utc>,
    #[serde_as(as = "MapPreventDuplicates<_, _>")]
    #[serde(default)]
    metadata: IndexMap<String, String>,
}

fn strip_line_ending(s: &str) -> &str {
    s.strip_prefix("\r\n")
        .or_else(|| s.strip_prefix('\n'))
        .unwrap_or(s)
}

fn find_closing_delimiter(content: &str) -> Option<usize> {
    if content.starts_with(FRONT_MATTER_DELIMITER) {
        return Some(0);
    }
    if let Some(pos) = content.find("\r\n---") {
        return Some(pos + 2);
    }
    if let Some(pos) = content.find("\n---") {
        return Some(pos + 1);
    }
    None
}

fn extract_front_matter(content: &str) -> Result<(&str, &str), FormatError> {
    let trimmed = content.trim_start();

    if !trimmed.starts_with(FRONT_MATTER_DELIMITER) {
        return Err(FrontMatterError::MissingOpeningDelimiter.into());
    }

    let after_opening = strip_line_ending(&trimmed[FRONT_MATTER_DELIMITER.len()..]);

    let Some(closing_pos) = find_closing_delimiter(after_opening) else {
        return Err(FrontMatterError::MissingClosingDelimiter.into());
    };

    let yaml_content = after_opening[..closing_pos].trim_end_matches('\r');
    if yaml_content.trim().is_empty() {
        return Err(FrontMatterError::EmptyFrontMatter.into());
    }

    let body = strip_line_ending(&after_opening[closing_pos + FRONT_MATTER_DELIMITER.len()..]);

    Ok((yaml_content, body))
}

pub(crate) fn validate_id(id: &str) -> Result<(), ValidationError> {
    let valid = !id.is_empty()
        && id != "."
        && id != ".."
        && !id.contains(['/', '\\'])
        && !id.chars().any(char::is_control);
    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidId(id.to_string()))
    }
}

pub(crate) fn validate_packages<'a>(
    packages: impl IntoIterator<Item = &'a str>,
) -> Result<(), ValidationError> {
    let mut seen = BTreeSet::new();
    for package in packages {
        if package.trim().is_empty() {
            return Err(ValidationError::EmptyPackageName);
        }
        if !seen.insert(package) {
            return Err(ValidationError::DuplicatePackage(package.to_string()));
        }
    }
    if seen.is_empty() {
        return Err(ValidationError::NoPackages);
    }
    Ok(())
}

/// Parses a consignment file. `id` is the identifier the file is stored
/// under, usually its file stem.
///
/// # Errors
///
/// Returns a `FormatError` if the front matter is missing or malformed, or
/// if the consignment fails validation.
#[must_use = "parsing result should be handled"]
pub fn parse_consignment(id: &str, content: &str) -> Result<Consignment, FormatError> {
    if content.len() > MAX_INPUT_SIZE {
        return Err(ValidationError::InputTooLarge {
            max_bytes: MAX_INPUT_SIZE,
        }
        .into());
    }
    validate_id(id)?;

    let (yaml_content, body) = extract_front_matter(content)?;
    let front_matter: FrontMatter = serde_yml::from_str(yaml_content)?;

    validate_packages(front_matter.packages.iter().map(String::as_str))?;

    Ok(Consignment {
        id: id.to_string(),
        timestamp: front_matter.timestamp,
        packages: front_matter.packages.into_iter().collect(),
        change_type: front_matter.change_type,
        summary: body.trim().to_string(),
        metadata: front_matter.metadata,
    })
}
