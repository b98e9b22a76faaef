use serde::{Deserialize, Serialize};

use crate::types::BumpType;

/// How a dependent reacts to a bump of the package it depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// The dependent receives a bump derived from the dependency's severity.
    #[default]
    Linked,
    /// The dependent is never bumped automatically.
    Fixed,
}

/// Maps a dependency's severity to the severity applied to the dependent.
///
/// Unset entries map a severity to itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BumpMapping {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<BumpType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minor: Option<BumpType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub major: Option<BumpType>,
}

impl BumpMapping {
    #[must_use]
    pub fn identity() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, source: BumpType, applied: BumpType) -> Self {
        match source {
            BumpType::Patch => self.patch = Some(applied),
            BumpType::Minor => self.minor = Some(applied),
            BumpType::Major => self.major = Some(applied),
        }
        self
    }

    #[must_use]
    pub fn apply(&self, source: BumpType) -> BumpType {
        let mapped = match source {
            BumpType::Patch => self.patch,
            BumpType::Minor => self.minor,
            BumpType::Major => self.major,
        };
        mapped.unwrap_or(source)
    }
}

/// An edge from a dependent package to the package it depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependencyEdge {
    pub package: String,
    #[serde(default)]
    pub strategy: Strategy,
    #[serde(default, skip_serializing_if = "is_identity")]
    pub bump_mapping: BumpMapping,
}

fn is_identity(mapping: &BumpMapping) -> bool {
    *mapping == BumpMapping::identity()
}

impl DependencyEdge {
    #[must_use]
    pub fn linked(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            strategy: Strategy::Linked,
            bump_mapping: BumpMapping::identity(),
        }
    }

    #[must_use]
    pub fn fixed(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            strategy: Strategy::Fixed,
            bump_mapping: BumpMapping::identity(),
        }
    }

    #[must_use]
    pub fn with_mapping(mut self, bump_mapping: BumpMapping) -> Self {
        self.bump_mapping = bump_mapping;
        self
    }
}

/// A package and the packages it depends on. Identity is the name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    #[serde(default)]
    pub dependencies: Vec<DependencyEdge>,
}

impl Package {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dependencies: Vec::new(),
        }
    }

    #[must_use]
    pub fn depends_on(mut self, edge: DependencyEdge) -> Self {
        self.dependencies.push(edge);
        self
    }
}
