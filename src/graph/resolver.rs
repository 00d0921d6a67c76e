//! Reference Resolution
//!
//! Walks a document subtree and records every schema it depends on, following
//! `$ref` pointers and discriminator `mapping` entries into the referenced
//! definitions.
//!
//! Types are identified by their canonical pointer, not their name: a reusable
//! response `#/components/responses/Error` and the schema
//! `#/components/schemas/Error` are distinct types.

use std::collections::HashSet;

use serde_json::Value;
use tracing::debug;

use crate::document::{canonical_pointer, keys, resolve_pointer};

/// A directed dependency discovered while walking a subtree.
///
/// `dependent` is the type whose body contains the reference, or `None`
/// when the reference sits directly inside an operation.
#[derive(Debug, Clone, PartialEq)]
pub struct DependencyEdge<'a> {
    /// The referenced type
    pub dependency: String,
    /// The type containing the reference
    pub dependent: Option<String>,
    /// Canonical pointer of `dependency`
    pub pointer: String,
    /// Canonical pointer of `dependent`
    pub dependent_pointer: Option<String>,
    /// Definition body of `dependency`, borrowed from the resolution root
    pub node: &'a Value,
}

impl DependencyEdge<'_> {
    /// True when a type references itself
    pub fn is_self_reference(&self) -> bool {
        self.dependent_pointer.as_deref() == Some(self.pointer.as_str())
    }
}

/// Type whose body is being walked
struct Owner {
    name: String,
    pointer: String,
}

/// Depth-first reference walker.
///
/// One resolver accumulates edges across several subtrees (e.g. all operations
/// of a group) so that every type body is expanded at most once. Every owner
/// still records its own edge to an already expanded type.
pub struct Resolver<'a> {
    root: &'a Value,
    edges: Vec<DependencyEdge<'a>>,
    /// (dependency pointer, dependent pointer)
    recorded: HashSet<(String, Option<String>)>,
    /// Pointers whose bodies have been walked
    expanded: HashSet<String>,
}

impl<'a> Resolver<'a> {
    /// Create a resolver for pointers relative to `root`
    pub fn new(root: &'a Value) -> Self {
        Self {
            root,
            edges: Vec::new(),
            recorded: HashSet::new(),
            expanded: HashSet::new(),
        }
    }

    /// Walk a subtree, accumulating edges. References found outside any named
    /// type body are recorded with no dependent.
    pub fn walk(&mut self, subtree: &'a Value) {
        self.visit(subtree, None);
    }

    /// Edges discovered so far, in depth-first discovery order
    pub fn edges(&self) -> &[DependencyEdge<'a>] {
        &self.edges
    }

    /// Consume the resolver and return its edges
    pub fn into_edges(self) -> Vec<DependencyEdge<'a>> {
        self.edges
    }

    fn visit(&mut self, node: &'a Value, owner: Option<&Owner>) {
        match node {
            Value::Object(map) => {
                for (key, value) in map {
                    match (key.as_str(), value) {
                        (keys::REF, Value::String(pointer)) => self.follow(pointer, owner),
                        (keys::MAPPING, Value::Object(mapping)) => {
                            for target in mapping.values() {
                                match target {
                                    Value::String(pointer) => self.follow(pointer, owner),
                                    other => self.visit(other, owner),
                                }
                            }
                        }
                        _ => self.visit(value, owner),
                    }
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.visit(item, owner);
                }
            }
            _ => {}
        }
    }

    fn follow(&mut self, pointer: &str, owner: Option<&Owner>) {
        let root = self.root;
        let (Some((name, node)), Some(canonical)) =
            (resolve_pointer(root, pointer), canonical_pointer(pointer))
        else {
            debug!(pointer, "unresolvable reference skipped");
            return;
        };

        let dependent_pointer = owner.map(|o| o.pointer.clone());
        if self.recorded.insert((canonical.clone(), dependent_pointer.clone())) {
            self.edges.push(DependencyEdge {
                dependency: name.clone(),
                dependent: owner.map(|o| o.name.clone()),
                pointer: canonical.clone(),
                dependent_pointer,
                node,
            });
        }

        if self.expanded.insert(canonical.clone()) {
            let owner = Owner {
                name,
                pointer: canonical,
            };
            self.visit(node, Some(&owner));
        }
    }
}

/// Resolve every reference reachable from `subtree`, with pointers relative to `root`
pub fn resolve_references<'a>(subtree: &'a Value, root: &'a Value) -> Vec<DependencyEdge<'a>> {
    let mut resolver = Resolver::new(root);
    resolver.walk(subtree);
    resolver.into_edges()
}
