use tracing::debug;

use crate::graph::{DependencyGraph, NodeIndex};

/// A strongly connected component: packages mutually reachable from one another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    members: Vec<NodeIndex>,
    cyclic: bool,
}

impl Component {
    /// Members are kept sorted by index, which is name order.
    #[must_use]
    pub fn new(graph: &DependencyGraph, mut members: Vec<NodeIndex>) -> Self {
        members.sort_unstable();
        members.dedup();
        let cyclic = members.len() > 1 || members.first().is_some_and(|m| graph.has_self_loop(*m));
        Self { members, cyclic }
    }

    #[must_use]
    pub fn members(&self) -> &[NodeIndex] {
        &self.members
    }

    /// More than one member, or a single member depending on itself.
    #[must_use]
    pub fn is_cycle(&self) -> bool {
        self.cyclic
    }

    #[must_use]
    pub fn contains(&self, index: NodeIndex) -> bool {
        self.members.binary_search(&index).is_ok()
    }

    #[must_use]
    pub fn names<'g>(&self, graph: &'g DependencyGraph) -> Vec<&'g str> {
        self.members.iter().map(|m| graph.name(*m)).collect()
    }
}

struct Tarjan<'g> {
    graph: &'g DependencyGraph,
    next_index: usize,
    discovery: Vec<Option<usize>>,
    low_link: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<NodeIndex>,
    components: Vec<Component>,
}

impl<'g> Tarjan<'g> {
    fn new(graph: &'g DependencyGraph) -> Self {
        let len = graph.len();
        Self {
            graph,
            next_index: 0,
            discovery: vec![None; len],
            low_link: vec![0; len],
            on_stack: vec![false; len],
            stack: Vec::new(),
            components: Vec::new(),
        }
    }

    fn strong_connect(&mut self, node: NodeIndex) {
        let v = node.index();
        self.discovery[v] = Some(self.next_index);
        self.low_link[v] = self.next_index;
        self.next_index += 1;
        self.stack.push(node);
        self.on_stack[v] = true;

        let graph = self.graph;
        for edge in graph.edges(node) {
            let w = edge.target.index();
            match self.discovery[w] {
                None => {
                    self.strong_connect(edge.target);
                    self.low_link[v] = self.low_link[v].min(self.low_link[w]);
                }
                Some(discovered) if self.on_stack[w] => {
                    self.low_link[v] = self.low_link[v].min(discovered);
                }
                Some(_) => {}
            }
        }

        if self.discovery[v] == Some(self.low_link[v]) {
            let mut members = Vec::new();
            while let Some(member) = self.stack.pop() {
                self.on_stack[member.index()] = false;
                members.push(member);
                if member == node {
                    break;
                }
            }
            self.components.push(Component::new(self.graph, members));
        }
    }
}

/// Finds all strongly connected components with Tarjan's algorithm.
///
/// Roots are visited in index order and edges in configured order, so the
/// result is stable for a given graph. Every node belongs to exactly one
/// component.
#[must_use]
pub fn strongly_connected_components(graph: &DependencyGraph) -> Vec<Component> {
    let mut tarjan = Tarjan::new(graph);
    for node in graph.indices() {
        if tarjan.discovery[node.index()].is_none() {
            tarjan.strong_connect(node);
        }
    }

    let components = tarjan.components;
    debug!(
        components = components.len(),
        cycles = components.iter().filter(|c| c.is_cycle()).count(),
        "computed strongly connected components"
    );
    components
}

impl DependencyGraph {
    /// Cycles as sorted package-name lists, ordered by their first member.
    #[must_use]
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let mut cycles: Vec<Vec<String>> = strongly_connected_components(self)
            .into_iter()
            .filter(Component::is_cycle)
            .map(|c| c.names(self).into_iter().map(str::to_string).collect())
            .collect();
        cycles.sort();
        cycles
    }
}
