use std::collections::BTreeMap;

use semver::Version;
use serde::{Deserialize, Serialize};

/// Where a package stands in its pre-release progression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageStageState {
    pub stage: String,
    pub counter: u32,
    /// The stable version the pre-releases lead up to.
    pub target_version: Version,
    /// The stable release the target was computed from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stable_version: Option<Version>,
}

impl PackageStageState {
    #[must_use]
    pub fn new(stage: impl Into<String>, counter: u32, target_version: Version) -> Self {
        Self {
            stage: stage.into(),
            counter,
            target_version,
            stable_version: None,
        }
    }

    #[must_use]
    pub fn with_stable_version(mut self, stable_version: Version) -> Self {
        self.stable_version = Some(stable_version);
        self
    }
}

/// Active pre-releases.
/// File: `.consign/pre-release.toml`
/// Format:
/// ```toml
/// [packages.core]
/// stage = "alpha"
/// counter = 2
/// target_version = "1.2.0"
/// stable_version = "1.1.5"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreReleaseState {
    #[serde(default)]
    packages: BTreeMap<String, PackageStageState>,
}

impl PreReleaseState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, package: &str) -> Option<&PackageStageState> {
        self.packages.get(package)
    }

    pub fn insert(&mut self, package: String, state: PackageStageState) {
        self.packages.insert(package, state);
    }

    pub fn remove(&mut self, package: &str) -> Option<PackageStageState> {
        self.packages.remove(package)
    }

    /// Entries sorted by package name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PackageStageState)> {
        self.packages.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    #[must_use]
    pub fn contains(&self, package: &str) -> bool {
        self.packages.contains_key(package)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.len()
    }
}
