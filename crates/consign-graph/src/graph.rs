use std::collections::BTreeMap;
use std::fmt;

use consign_core::{BumpMapping, Package, Strategy};
use tracing::debug;

use crate::error::GraphError;

/// Position of a package in the graph arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIndex(usize);

impl NodeIndex {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Dependency edge resolved to an arena index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub target: NodeIndex,
    pub strategy: Strategy,
    pub bump_mapping: BumpMapping,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub name: String,
    /// Outgoing edges, in configured order.
    pub edges: Vec<Edge>,
    /// Packages with an edge pointing at this one, in index order.
    pub dependents: Vec<NodeIndex>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyGraph {
    nodes: Vec<Node>,
    lookup: BTreeMap<String, NodeIndex>,
}

impl DependencyGraph {
    /// Builds the graph from package configuration.
    ///
    /// Self-loops are kept as edges; they form trivial cycles.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::DuplicatePackage` if a name is defined twice, or
    /// `GraphError::UndefinedPackage` if an edge names a package that is not
    /// defined.
    pub fn build(packages: &[Package]) -> Result<Self, GraphError> {
        let mut sorted: Vec<&Package> = packages.iter().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));

        let mut lookup = BTreeMap::new();
        for (position, package) in sorted.iter().enumerate() {
            if lookup
                .insert(package.name.clone(), NodeIndex(position))
                .is_some()
            {
                return Err(GraphError::DuplicatePackage {
                    package: package.name.clone(),
                });
            }
        }

        let mut nodes = Vec::with_capacity(sorted.len());
        for package in &sorted {
            let mut edges = Vec::with_capacity(package.dependencies.len());
            for dependency in &package.dependencies {
                let target = lookup.get(&dependency.package).copied().ok_or_else(|| {
                    GraphError::UndefinedPackage {
                        package: package.name.clone(),
                        dependency: dependency.package.clone(),
                    }
                })?;
                edges.push(Edge {
                    target,
                    strategy: dependency.strategy,
                    bump_mapping: dependency.bump_mapping,
                });
            }
            nodes.push(Node {
                name: package.name.clone(),
                edges,
                dependents: Vec::new(),
            });
        }

        for source in 0..nodes.len() {
            let targets: Vec<NodeIndex> = nodes[source].edges.iter().map(|e| e.target).collect();
            for target in targets {
                let dependents = &mut nodes[target.0].dependents;
                if !dependents.contains(&NodeIndex(source)) {
                    dependents.push(NodeIndex(source));
                }
            }
        }

        debug!(
            packages = nodes.len(),
            edges = nodes.iter().map(|n| n.edges.len()).sum::<usize>(),
            "built dependency graph"
        );

        Ok(Self { nodes, lookup })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All node indices in ascending (name) order.
    pub fn indices(&self) -> impl Iterator<Item = NodeIndex> {
        (0..self.nodes.len()).map(NodeIndex)
    }

    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<NodeIndex> {
        self.lookup.get(name).copied()
    }

    /// # Panics
    ///
    /// Panics if `index` did not come from this graph.
    #[must_use]
    pub fn node(&self, index: NodeIndex) -> &Node {
        &self.nodes[index.0]
    }

    #[must_use]
    pub fn name(&self, index: NodeIndex) -> &str {
        &self.node(index).name
    }

    #[must_use]
    pub fn edges(&self, index: NodeIndex) -> &[Edge] {
        &self.node(index).edges
    }

    #[must_use]
    pub fn dependents(&self, index: NodeIndex) -> &[NodeIndex] {
        &self.node(index).dependents
    }

    #[must_use]
    pub fn has_self_loop(&self, index: NodeIndex) -> bool {
        self.edges(index).iter().any(|e| e.target == index)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.name.as_str())
    }
}
