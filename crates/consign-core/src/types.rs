use std::fmt;

use clap::ValueEnum;
use semver::Version;
use serde::{Deserialize, Serialize};

/// Severity of a change. Ordered `Patch < Minor < Major`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum BumpType {
    Patch,
    Minor,
    Major,
}

impl fmt::Display for BumpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Patch => "patch",
            Self::Minor => "minor",
            Self::Major => "major",
        };
        write!(f, "{s}")
    }
}

/// Whether a package was bumped by its own consignments or only through a dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeSource {
    Direct,
    Propagated,
}

impl fmt::Display for ChangeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::Propagated => write!(f, "propagated"),
        }
    }
}

/// A computed version change for a single package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionBump {
    pub package: String,
    pub old_version: Version,
    pub new_version: Version,
    pub change_type: BumpType,
    pub source: ChangeSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bump_type_ordering_patch_is_smallest() {
        assert!(BumpType::Patch < BumpType::Minor);
        assert!(BumpType::Patch < BumpType::Major);
    }

    #[test]
    fn bump_type_ordering_major_is_largest() {
        assert!(BumpType::Major > BumpType::Patch);
        assert!(BumpType::Major > BumpType::Minor);
    }

    #[test]
    fn bump_type_max_returns_largest() {
        let bumps = [BumpType::Patch, BumpType::Major, BumpType::Minor];
        assert_eq!(bumps.iter().max(), Some(&BumpType::Major));
    }

    #[test]
    fn bump_type_serializes_lowercase() {
        let json = serde_json::to_string(&BumpType::Minor).expect("serialize");
        assert_eq!(json, "\"minor\"");

        let parsed: BumpType = serde_json::from_str("\"major\"").expect("deserialize");
        assert_eq!(parsed, BumpType::Major);
    }

    #[test]
    fn change_source_display() {
        assert_eq!(ChangeSource::Direct.to_string(), "direct");
        assert_eq!(ChangeSource::Propagated.to_string(), "propagated");
    }
}
