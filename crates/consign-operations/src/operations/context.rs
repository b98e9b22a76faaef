use std::collections::BTreeMap;
use std::path::PathBuf;

use consign_core::Consignment;
use consign_graph::DependencyGraph;
use consign_project::{PackageConfig, PreReleaseState, ProjectConfig};
use consign_version::{SNAPSHOT_IDENTIFIER, base_version, is_prerelease};
use semver::Version;
use tracing::{debug, warn};

use crate::Result;
use crate::error::OperationError;
use crate::propagator::{PropagationPlan, propagate};
use crate::traits::{ConsignmentReader, PackageVersionIO};

/// Everything read from disk for one run, plus the propagation result.
pub(crate) struct ReleaseContext {
    pub config: ProjectConfig,
    pub graph: DependencyGraph,
    /// In file-name order.
    pub consignments: Vec<(PathBuf, Consignment)>,
    pub plan: PropagationPlan,
}

impl ReleaseContext {
    pub(crate) fn load<R, V>(
        config: ProjectConfig,
        consignment_reader: &R,
        version_io: &V,
        state: &PreReleaseState,
    ) -> Result<Self>
    where
        R: ConsignmentReader,
        V: PackageVersionIO,
    {
        if config.packages().is_empty() {
            return Err(OperationError::EmptyProject(config.root().to_path_buf()));
        }

        let graph = DependencyGraph::build(&config.graph_input())?;

        let consignment_dir = config.consignment_path();
        let mut consignments = Vec::new();
        for path in consignment_reader.list_consignments(&consignment_dir)? {
            let consignment = consignment_reader.read_consignment(&path)?;
            consignments.push((path, consignment));
        }

        let mut current = BTreeMap::new();
        for package in config.packages() {
            let version = stable_version(package, version_io.read_version(config.root(), package)?, state);
            current.insert(package.name.clone(), version);
        }

        let pending: Vec<Consignment> = consignments.iter().map(|(_, c)| c.clone()).collect();
        let mut plan = propagate(&current, &pending, &graph)?;
        plan.settle_prerelease_lines()?;

        Ok(Self {
            config,
            graph,
            consignments,
            plan,
        })
    }

    pub(crate) fn ensure_known_packages(&self) -> Result<()> {
        let Some(name) = self.plan.unknown_packages().first() else {
            return Ok(());
        };
        Err(OperationError::UnknownPackage {
            name: name.clone(),
            available: available_packages(&self.config),
        })
    }

    pub(crate) fn ensure_pending(&self) -> Result<()> {
        if self.plan.is_empty() {
            return Err(OperationError::NothingToRelease);
        }
        Ok(())
    }

    pub(crate) fn package(&self, name: &str) -> Result<&PackageConfig> {
        self.config
            .package(name)
            .ok_or_else(|| OperationError::UnknownPackage {
                name: name.to_string(),
                available: available_packages(&self.config),
            })
    }
}

pub(crate) fn available_packages(config: &ProjectConfig) -> String {
    let mut names: Vec<&str> = config.packages().iter().map(|p| p.name.as_str()).collect();
    names.sort_unstable();
    names.join(", ")
}

/// The version file holds a pre-release while one is in progress; bumps are
/// computed from the stable release recorded when it started, as long as the
/// file is still on that pre-release's target. Anything else is returned as
/// is and settled onto its own line after propagation.
fn stable_version(package: &PackageConfig, version: Version, state: &PreReleaseState) -> Version {
    if !is_prerelease(&version) {
        return version;
    }

    let recorded = state
        .get(&package.name)
        .filter(|entry| entry.target_version == base_version(&version))
        .and_then(|entry| entry.stable_version.clone());
    match recorded {
        Some(stable) => {
            debug!(package = %package.name, current = %version, stable = %stable, "using recorded stable version");
            stable
        }
        None if is_snapshot(&version) => {
            debug!(package = %package.name, current = %version, "releasing from snapshot line");
            version
        }
        None => {
            warn!(package = %package.name, current = %version, "no stable version recorded; releasing from the pre-release line");
            version
        }
    }
}

fn is_snapshot(version: &Version) -> bool {
    version
        .pre
        .as_str()
        .split('.')
        .next()
        .is_some_and(|identifier| identifier == SNAPSHOT_IDENTIFIER)
}
