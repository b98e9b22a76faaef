use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use consign_core::{DependencyEdge, Package};
use serde::Deserialize;
use tracing::debug;

use crate::error::ProjectError;
use crate::{CONFIG_FILENAME, DEFAULT_CONSIGNMENT_DIR, DEFAULT_TAG_TEMPLATE};

/// Ecosystem format of a package's version file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionFileFormat {
    /// A text file containing only the version.
    #[default]
    Plain,
    /// `package.version` in a `Cargo.toml`.
    Cargo,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageConfig {
    pub name: String,
    /// Relative to the project root.
    pub version_file: PathBuf,
    #[serde(default)]
    pub format: VersionFileFormat,
    #[serde(default)]
    pub dependencies: Vec<DependencyEdge>,
}

impl PackageConfig {
    #[must_use]
    pub fn to_package(&self) -> Package {
        Package {
            name: self.name.clone(),
            dependencies: self.dependencies.clone(),
        }
    }
}

/// A pre-release stage. Lower `order` comes first.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StageConfig {
    pub name: String,
    pub order: u32,
    #[serde(default)]
    pub tag_template: Option<String>,
}

impl StageConfig {
    #[must_use]
    pub fn new(name: impl Into<String>, order: u32) -> Self {
        Self {
            name: name.into(),
            order,
            tag_template: None,
        }
    }

    #[must_use]
    pub fn with_tag_template(mut self, template: impl Into<String>) -> Self {
        self.tag_template = Some(template.into());
        self
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    consignment_dir: Option<PathBuf>,
    tag_template: Option<String>,
    #[serde(default)]
    packages: Vec<PackageConfig>,
    #[serde(default)]
    stages: Vec<StageConfig>,
}

/// Loaded `consign.toml` together with the directory it was found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    root: PathBuf,
    consignment_dir: PathBuf,
    tag_template: String,
    packages: Vec<PackageConfig>,
    stages: Vec<StageConfig>,
}

impl ProjectConfig {
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Consignment directory relative to the root.
    #[must_use]
    pub fn consignment_dir(&self) -> &Path {
        &self.consignment_dir
    }

    #[must_use]
    pub fn consignment_path(&self) -> PathBuf {
        self.root.join(&self.consignment_dir)
    }

    #[must_use]
    pub fn tag_template(&self) -> &str {
        &self.tag_template
    }

    #[must_use]
    pub fn packages(&self) -> &[PackageConfig] {
        &self.packages
    }

    #[must_use]
    pub fn package(&self, name: &str) -> Option<&PackageConfig> {
        self.packages.iter().find(|p| p.name == name)
    }

    /// Stages as configured; not sorted.
    #[must_use]
    pub fn stages(&self) -> &[StageConfig] {
        &self.stages
    }

    #[must_use]
    pub fn graph_input(&self) -> Vec<Package> {
        self.packages.iter().map(PackageConfig::to_package).collect()
    }

    #[must_use]
    pub fn version_file_path(&self, package: &PackageConfig) -> PathBuf {
        self.root.join(&package.version_file)
    }
}

fn is_valid_stage_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn validate_stages(stages: &[StageConfig]) -> Result<(), ProjectError> {
    let mut by_order: BTreeMap<u32, &str> = BTreeMap::new();
    let mut names = Vec::with_capacity(stages.len());

    for stage in stages {
        if !is_valid_stage_name(&stage.name) {
            return Err(ProjectError::InvalidStageName {
                name: stage.name.clone(),
            });
        }
        if names.contains(&stage.name.as_str()) {
            return Err(ProjectError::DuplicateStageName {
                name: stage.name.clone(),
            });
        }
        names.push(stage.name.as_str());

        if let Some(first) = by_order.insert(stage.order, &stage.name) {
            return Err(ProjectError::DuplicateStageOrder {
                order: stage.order,
                first: first.to_string(),
                second: stage.name.clone(),
            });
        }
    }
    Ok(())
}

/// Parses configuration text. `root` is the directory relative paths resolve against.
///
/// # Errors
///
/// Returns `ProjectError::ConfigParse` for malformed TOML or unknown keys, and
/// a stage error if stage names or orders are invalid.
pub fn parse_config(root: &Path, content: &str) -> Result<ProjectConfig, ProjectError> {
    let raw: RawConfig = toml::from_str(content).map_err(|source| ProjectError::ConfigParse {
        path: root.join(CONFIG_FILENAME),
        source,
    })?;

    validate_stages(&raw.stages)?;

    Ok(ProjectConfig {
        root: root.to_path_buf(),
        consignment_dir: raw
            .consignment_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONSIGNMENT_DIR)),
        tag_template: raw
            .tag_template
            .unwrap_or_else(|| DEFAULT_TAG_TEMPLATE.to_string()),
        packages: raw.packages,
        stages: raw.stages,
    })
}

/// Loads `consign.toml` from `root`.
///
/// # Errors
///
/// Returns `ProjectError::ConfigRead` if the file cannot be read, or any
/// error from [`parse_config`].
pub fn load_config(root: &Path) -> Result<ProjectConfig, ProjectError> {
    let path = root.join(CONFIG_FILENAME);
    let content = std::fs::read_to_string(&path)
        .map_err(|source| ProjectError::ConfigRead { path, source })?;
    parse_config(root, &content)
}

/// Walks from `start_dir` upward to the first directory holding `consign.toml`.
///
/// # Errors
///
/// Returns `ProjectError::NotFound` if no ancestor has a configuration file,
/// or any error from [`load_config`].
pub fn discover_project(start_dir: &Path) -> Result<ProjectConfig, ProjectError> {
    let start_dir = start_dir
        .canonicalize()
        .map_err(|source| ProjectError::ConfigRead {
            path: start_dir.to_path_buf(),
            source,
        })?;

    let mut current = start_dir.as_path();
    loop {
        if current.join(CONFIG_FILENAME).is_file() {
            debug!(root = %current.display(), "found project configuration");
            return load_config(current);
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return Err(ProjectError::NotFound { start_dir }),
        }
    }
}
