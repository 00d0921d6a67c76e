//! Type Reference Graph
//!
//! Reference resolution over raw documents, and an explicit petgraph
//! dependency graph built once per group from the resolved edges.
//!
//! Nodes are canonical type pointers, so same-named types from different
//! component sections stay apart. Edges point from a dependent type to the
//! type it depends on. References made directly by operations are kept as
//! graph roots rather than edges.

pub mod resolver;

pub use resolver::{resolve_references, DependencyEdge, Resolver};

use std::collections::{HashMap, HashSet};

use petgraph::algo::kosaraju_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;

/// Canonical type pointer used as graph node weight
pub type TypeKey = String;

/// Explicit dependency graph between schema types
#[derive(Debug, Default)]
pub struct ReferenceGraph {
    graph: DiGraph<TypeKey, ()>,
    /// Node index lookup: type pointer -> NodeIndex
    node_indices: HashMap<TypeKey, NodeIndex>,
    /// Types referenced directly by operations, in discovery order
    roots: Vec<TypeKey>,
}

impl ReferenceGraph {
    /// Build the graph from resolver edges
    pub fn from_edges<'e, 'a: 'e, I>(edges: I) -> Self
    where
        I: IntoIterator<Item = &'e DependencyEdge<'a>>,
    {
        let mut graph = Self::default();
        for edge in edges {
            graph.add_reference(&edge.pointer, edge.dependent_pointer.as_deref());
        }
        graph
    }

    /// Record that `dependent` (or an operation when `None`) references `dependency`
    pub fn add_reference(&mut self, dependency: &str, dependent: Option<&str>) {
        let to = self.node(dependency);
        match dependent {
            Some(from_name) => {
                let from = self.node(from_name);
                if !self.graph.contains_edge(from, to) {
                    self.graph.add_edge(from, to, ());
                }
            }
            None => {
                if !self.roots.iter().any(|r| r == dependency) {
                    self.roots.push(dependency.to_string());
                }
            }
        }
    }

    fn node(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.node_indices.insert(name.to_string(), idx);
        idx
    }

    /// Get type count
    pub fn type_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get edge count
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Types referenced directly by operations
    pub fn roots(&self) -> &[TypeKey] {
        &self.roots
    }

    /// All types reachable from `starts` (inclusive) by zero or more hops
    pub fn closure<'s, I>(&self, starts: I) -> HashSet<&TypeKey>
    where
        I: IntoIterator<Item = &'s str>,
    {
        let mut reached = HashSet::new();
        for start in starts {
            let Some(&idx) = self.node_indices.get(start) else {
                continue;
            };
            let mut dfs = Dfs::new(&self.graph, idx);
            while let Some(next) = dfs.next(&self.graph) {
                if let Some(name) = self.graph.node_weight(next) {
                    reached.insert(name);
                }
            }
        }
        reached
    }

    /// All types reachable from the operation roots
    pub fn root_closure(&self) -> HashSet<&TypeKey> {
        self.closure(self.roots.iter().map(String::as_str))
    }

    /// Groups of mutually recursive types (self references included)
    pub fn cycles(&self) -> Vec<Vec<&TypeKey>> {
        kosaraju_scc(&self.graph)
            .into_iter()
            .filter(|scc| {
                scc.len() > 1 || scc.first().is_some_and(|&n| self.graph.contains_edge(n, n))
            })
            .map(|scc| {
                let mut names: Vec<&TypeKey> = scc
                    .into_iter()
                    .filter_map(|idx| self.graph.node_weight(idx))
                    .collect();
                names.sort();
                names
            })
            .collect()
    }
}
