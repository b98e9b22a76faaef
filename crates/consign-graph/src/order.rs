use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap};

use tracing::debug;

use crate::error::GraphError;
use crate::graph::{DependencyGraph, NodeIndex};
use crate::scc::{Component, strongly_connected_components};

/// Orders components so that every component comes after all components it
/// depends on.
///
/// Ties are broken by the smallest member index, so the order is fully
/// determined by the graph. Members of the same component carry no order.
/// Nodes that are not covered by any component are ignored.
///
/// # Errors
///
/// Returns `GraphError::CycleAfterCondensation` if the components are not a
/// valid condensation, i.e. a cycle remains between them.
pub fn topological_order(
    graph: &DependencyGraph,
    components: &[Component],
) -> Result<Vec<usize>, GraphError> {
    let mut component_of = vec![None; graph.len()];
    for (position, component) in components.iter().enumerate() {
        for member in component.members() {
            component_of[member.index()] = Some(position);
        }
    }

    let mut dependencies: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); components.len()];
    let mut dependents: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); components.len()];
    for node in graph.indices() {
        let Some(from) = component_of[node.index()] else {
            continue;
        };
        for edge in graph.edges(node) {
            let Some(to) = component_of[edge.target.index()] else {
                continue;
            };
            if from != to {
                dependencies[from].insert(to);
                dependents[to].insert(from);
            }
        }
    }

    let first_member = |position: usize| {
        components[position]
            .members()
            .first()
            .copied()
            .map_or(usize::MAX, NodeIndex::index)
    };

    let mut remaining: Vec<usize> = dependencies.iter().map(BTreeSet::len).collect();
    let mut ready: BinaryHeap<Reverse<(usize, usize)>> = remaining
        .iter()
        .enumerate()
        .filter(|(_, count)| **count == 0)
        .map(|(position, _)| Reverse((first_member(position), position)))
        .collect();

    let mut order = Vec::with_capacity(components.len());
    while let Some(Reverse((_, position))) = ready.pop() {
        order.push(position);
        for &dependent in &dependents[position] {
            remaining[dependent] -= 1;
            if remaining[dependent] == 0 {
                ready.push(Reverse((first_member(dependent), dependent)));
            }
        }
    }

    if order.len() != components.len() {
        let mut packages: Vec<String> = remaining
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .flat_map(|(position, _)| components[position].names(graph))
            .map(str::to_string)
            .collect();
        packages.sort();
        return Err(GraphError::CycleAfterCondensation { packages });
    }

    Ok(order)
}

/// Components of a graph in dependency order: dependencies first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionOrder {
    components: Vec<Component>,
}

impl ResolutionOrder {
    /// Condenses the graph into its strongly connected components and sorts them.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::CycleAfterCondensation` if condensation left a cycle,
    /// which indicates a bug rather than bad input.
    pub fn compute(graph: &DependencyGraph) -> Result<Self, GraphError> {
        let components = strongly_connected_components(graph);
        let order = topological_order(graph, &components)?;

        let mut slots: Vec<Option<Component>> = components.into_iter().map(Some).collect();
        let components: Vec<Component> = order
            .into_iter()
            .filter_map(|position| slots[position].take())
            .collect();

        debug!(components = components.len(), "computed resolution order");
        Ok(Self { components })
    }

    #[must_use]
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Package names in resolution order; members of one component are adjacent.
    #[must_use]
    pub fn package_names<'g>(&self, graph: &'g DependencyGraph) -> Vec<&'g str> {
        self.components
            .iter()
            .flat_map(|c| c.names(graph))
            .collect()
    }
}
