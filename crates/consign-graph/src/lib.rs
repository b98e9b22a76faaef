//! Dependency graph over configured packages.
//!
//! Packages live in an arena addressed by [`NodeIndex`]; indices are assigned
//! in package-name order so every traversal below is deterministic for a
//! given configuration. Edges point from a dependent to the package it
//! depends on.

mod error;
mod graph;
mod order;
mod scc;

pub use error::GraphError;
pub use graph::{DependencyGraph, Edge, Node, NodeIndex};
pub use order::{ResolutionOrder, topological_order};
pub use scc::{Component, strongly_connected_components};

pub type Result<T> = std::result::Result<T, GraphError>;
