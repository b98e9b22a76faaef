//! Turns pending consignments into concrete version bumps.
//!
//! Components of the dependency graph are visited dependencies-first. A
//! package's severity is the strongest of its own consignments and whatever
//! its `linked` dependencies hand down through their bump mappings; severities
//! only ever rise. Every member of a cycle ends up with the same severity.

use std::collections::BTreeMap;

use consign_core::{BumpType, ChangeSource, Consignment, Strategy, VersionBump, group_by_package};
use consign_graph::{Component, DependencyGraph, Edge, ResolutionOrder};
use consign_version::{bump_version, release_version};
use semver::Version;
use tracing::{debug, info};

use crate::error::PropagationError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropagationPlan {
    bumps: BTreeMap<String, VersionBump>,
    unknown_packages: Vec<String>,
}

impl PropagationPlan {
    /// Affected packages only, keyed in name order.
    #[must_use]
    pub fn bumps(&self) -> &BTreeMap<String, VersionBump> {
        &self.bumps
    }

    #[must_use]
    pub fn get(&self, package: &str) -> Option<&VersionBump> {
        self.bumps.get(package)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bumps.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bumps.len()
    }

    /// Packages named by consignments but absent from the graph, sorted.
    #[must_use]
    pub fn unknown_packages(&self) -> &[String] {
        &self.unknown_packages
    }

    pub fn iter(&self) -> impl Iterator<Item = &VersionBump> {
        self.bumps.values()
    }

    /// Re-targets bumps whose old version is still a pre-release, so the
    /// release lands on that pre-release's own base when it already carries
    /// the bump. Repeated snapshots of `1.2.0` keep releasing `1.2.0`.
    pub(crate) fn settle_prerelease_lines(&mut self) -> Result<(), PropagationError> {
        for bump in self.bumps.values_mut() {
            let settled = release_version(&bump.old_version, bump.change_type)?;
            if settled != bump.new_version {
                debug!(
                    package = %bump.package,
                    current = %bump.old_version,
                    from = %bump.new_version,
                    to = %settled,
                    "settled on pre-release line"
                );
                bump.new_version = settled;
            }
        }
        Ok(())
    }
}

fn incoming(edge: &Edge, dependency: Option<BumpType>) -> Option<BumpType> {
    match edge.strategy {
        Strategy::Fixed => None,
        Strategy::Linked => dependency.map(|severity| edge.bump_mapping.apply(severity)),
    }
}

fn raise(slot: &mut Option<BumpType>, severity: BumpType) -> bool {
    if slot.is_none_or(|current| current < severity) {
        *slot = Some(severity);
        true
    } else {
        false
    }
}

fn resolve_component(
    graph: &DependencyGraph,
    component: &Component,
    severity: &mut [Option<BumpType>],
) {
    for &member in component.members() {
        for edge in graph.edges(member) {
            if component.contains(edge.target) {
                continue;
            }
            if let Some(applied) = incoming(edge, severity[edge.target.index()]) {
                if raise(&mut severity[member.index()], applied) {
                    debug!(
                        package = graph.name(member),
                        from = graph.name(edge.target),
                        severity = %applied,
                        "propagated bump"
                    );
                }
            }
        }
    }

    if !component.is_cycle() {
        return;
    }

    // Mappings may raise severities inside the cycle; settle them first.
    let mut changed = true;
    while changed {
        changed = false;
        for &member in component.members() {
            for edge in graph.edges(member) {
                if edge.target == member || !component.contains(edge.target) {
                    continue;
                }
                if let Some(applied) = incoming(edge, severity[edge.target.index()]) {
                    changed |= raise(&mut severity[member.index()], applied);
                }
            }
        }
    }

    let strongest = component
        .members()
        .iter()
        .filter_map(|m| severity[m.index()])
        .max();
    if let Some(strongest) = strongest {
        for &member in component.members() {
            severity[member.index()] = Some(strongest);
        }
        debug!(
            packages = ?component.names(graph),
            severity = %strongest,
            "unified cycle"
        );
    }
}

/// Computes the bump of every package affected by `consignments`.
///
/// `current` holds the last stable version of each package; pre-release and
/// build metadata are ignored. Only packages that end up with a bump need an
/// entry. The result depends on nothing but the three inputs.
///
/// # Errors
///
/// Returns `PropagationError::MissingVersion` if an affected package has no
/// entry in `current`, or `PropagationError::Graph` if the graph could not be
/// ordered.
pub fn propagate(
    current: &BTreeMap<String, Version>,
    consignments: &[Consignment],
    graph: &DependencyGraph,
) -> Result<PropagationPlan, PropagationError> {
    let order = ResolutionOrder::compute(graph)?;

    let mut direct: Vec<Option<BumpType>> = vec![None; graph.len()];
    let mut unknown_packages = Vec::new();
    for (package, group) in group_by_package(consignments) {
        let strongest = group.iter().map(|c| c.change_type).max();
        match graph.index_of(package) {
            Some(index) => direct[index.index()] = strongest,
            None => unknown_packages.push(package.to_string()),
        }
    }

    let mut severity = direct.clone();
    for component in order.components() {
        resolve_component(graph, component, &mut severity);
    }

    let mut bumps = BTreeMap::new();
    for node in graph.indices() {
        let Some(change_type) = severity[node.index()] else {
            continue;
        };
        let name = graph.name(node);
        let old_version =
            current
                .get(name)
                .cloned()
                .ok_or_else(|| PropagationError::MissingVersion {
                    package: name.to_string(),
                })?;
        let new_version = bump_version(&old_version, change_type)?;
        let source = if direct[node.index()].is_some() {
            ChangeSource::Direct
        } else {
            ChangeSource::Propagated
        };

        bumps.insert(
            name.to_string(),
            VersionBump {
                package: name.to_string(),
                old_version,
                new_version,
                change_type,
                source,
            },
        );
    }

    info!(
        consignments = consignments.len(),
        bumps = bumps.len(),
        unknown = unknown_packages.len(),
        "computed version bumps"
    );

    Ok(PropagationPlan {
        bumps,
        unknown_packages,
    })
}


#[cfg(test)]
mod properties {
    use std::collections::BTreeMap;

    use chrono::{DateTime, Utc};
    use consign_core::{BumpMapping, BumpType, ChangeSource, Consignment, DependencyEdge, Package};
    use consign_graph::{DependencyGraph, strongly_connected_components};
    use indexmap::IndexMap;
    use proptest::prelude::*;
    use semver::Version;

    use super::{incoming, propagate};

    const NAMES: [&str; 6] = ["a", "b", "c", "d", "e", "f"];

    fn bump_type() -> impl Strategy<Value = BumpType> {
        prop_oneof![
            Just(BumpType::Patch),
            Just(BumpType::Minor),
            Just(BumpType::Major)
        ]
    }

    fn edge() -> impl Strategy<Value = (usize, bool, Option<BumpType>)> {
        (0..NAMES.len(), any::<bool>(), proptest::option::of(bump_type()))
    }

    fn package(name: &str, edges: Vec<(usize, bool, Option<BumpType>)>) -> Package {
        edges
            .into_iter()
            .fold(Package::new(name), |package, (target, fixed, minor)| {
                let dependency = if fixed {
                    DependencyEdge::fixed(NAMES[target])
                } else {
                    DependencyEdge::linked(NAMES[target])
                };
                let mapping = minor.map_or_else(BumpMapping::identity, |applied| {
                    BumpMapping::identity().with(BumpType::Minor, applied)
                });
                package.depends_on(dependency.with_mapping(mapping))
            })
    }

    fn consignment(index: usize, target: usize, change_type: BumpType) -> Consignment {
        Consignment {
            id: format!("c{index}"),
            timestamp: DateTime::<Utc>::UNIX_EPOCH,
            packages: std::iter::once(NAMES[target].to_string()).collect(),
            change_type,
            summary: String::new(),
            metadata: IndexMap::new(),
        }
    }

    fn workspace() -> impl Strategy<Value = (Vec<Package>, Vec<Consignment>)> {
        let packages =
            proptest::collection::vec(proptest::collection::vec(edge(), 0..3), NAMES.len())
                .prop_map(|edges| {
                    edges
                        .into_iter()
                        .zip(NAMES)
                        .map(|(edges, name)| package(name, edges))
                        .collect::<Vec<_>>()
                });
        let consignments = proptest::collection::vec((0..NAMES.len(), bump_type()), 0..5)
            .prop_map(|entries| {
                entries
                    .into_iter()
                    .enumerate()
                    .map(|(index, (target, change_type))| consignment(index, target, change_type))
                    .collect::<Vec<_>>()
            });
        (packages, consignments)
    }

    fn current_versions() -> BTreeMap<String, Version> {
        NAMES
            .iter()
            .zip(0u64..)
            .map(|(name, minor)| ((*name).to_string(), Version::new(1, minor, 0)))
            .collect()
    }

    proptest! {
        #[test]
        fn bumps_are_monotonic((packages, consignments) in workspace()) {
            let graph = DependencyGraph::build(&packages).expect("valid graph");
            let plan = propagate(&current_versions(), &consignments, &graph).expect("propagates");

            for bump in plan.iter() {
                prop_assert!(bump.new_version > bump.old_version);
            }
        }

        #[test]
        fn propagation_is_deterministic((packages, consignments) in workspace()) {
            let graph = DependencyGraph::build(&packages).expect("valid graph");
            let current = current_versions();

            let first = propagate(&current, &consignments, &graph).expect("propagates");
            let second = propagate(&current, &consignments, &graph).expect("propagates");

            prop_assert_eq!(first, second);
        }

        #[test]
        fn cycles_share_one_severity((packages, consignments) in workspace()) {
            let graph = DependencyGraph::build(&packages).expect("valid graph");
            let plan = propagate(&current_versions(), &consignments, &graph).expect("propagates");

            for component in strongly_connected_components(&graph).iter().filter(|c| c.is_cycle()) {
                let severities: Vec<Option<BumpType>> = component
                    .names(&graph)
                    .into_iter()
                    .map(|name| plan.get(name).map(|b| b.change_type))
                    .collect();
                prop_assert!(severities.windows(2).all(|w| w[0] == w[1]));
            }
        }

        #[test]
        fn dependents_outside_a_cycle_cover_mapped_severity((packages, consignments) in workspace()) {
            let graph = DependencyGraph::build(&packages).expect("valid graph");
            let plan = propagate(&current_versions(), &consignments, &graph).expect("propagates");
            let components = strongly_connected_components(&graph);

            for node in graph.indices() {
                let own = components.iter().find(|c| c.contains(node)).expect("node has a component");
                for edge in graph.edges(node) {
                    if own.contains(edge.target) {
                        continue;
                    }
                    let dependency = plan.get(graph.name(edge.target)).map(|b| b.change_type);
                    let Some(expected) = incoming(edge, dependency) else {
                        continue;
                    };
                    let actual = plan.get(graph.name(node)).map(|b| b.change_type);
                    prop_assert!(actual.is_some_and(|a| a >= expected));
                }
            }
        }

        #[test]
        fn direct_packages_keep_at_least_their_severity((packages, consignments) in workspace()) {
            let graph = DependencyGraph::build(&packages).expect("valid graph");
            let plan = propagate(&current_versions(), &consignments, &graph).expect("propagates");

            for consignment in &consignments {
                for package in &consignment.packages {
                    let bump = plan.get(package).expect("consigned package is bumped");
                    prop_assert!(bump.change_type >= consignment.change_type);
                    prop_assert_eq!(bump.source, ChangeSource::Direct);
                }
            }
        }
    }
}
