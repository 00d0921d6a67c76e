//! Type Reference Registry
//!
//! Persisted list of `(dependency, dependent)` pairs for one group. The split
//! step writes it next to the group's document; code generation reads it back
//! to decide which imports each per-type file needs.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::document::write_json_atomic;
use crate::error::{Result, SplitError};
use crate::graph::DependencyEdge;

/// One cross-type reference: `to_type_name` depends on `from_type_name`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeReference {
    /// The referenced type (the import source)
    pub from_type_name: String,
    /// The type whose generated file needs the import
    pub to_type_name: String,
}

impl TypeReference {
    pub fn new(from_type_name: impl Into<String>, to_type_name: impl Into<String>) -> Self {
        Self {
            from_type_name: from_type_name.into(),
            to_type_name: to_type_name.into(),
        }
    }
}

/// Ordered, duplicate-free collection of type references
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceRegistry {
    #[serde(default)]
    pub references: Vec<TypeReference>,
}

impl ReferenceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from resolver edges.
    ///
    /// Operation-level edges (no dependent) and self references never produce
    /// an import, so they are left out.
    pub fn from_edges<'e, 'a: 'e, I>(edges: I) -> Self
    where
        I: IntoIterator<Item = &'e DependencyEdge<'a>>,
    {
        let mut registry = Self::new();
        for edge in edges {
            if edge.is_self_reference() {
                continue;
            }
            if let Some(dependent) = &edge.dependent {
                registry.push(TypeReference::new(edge.dependency.clone(), dependent.clone()));
            }
        }
        registry
    }

    /// Append a reference unless the exact pair is already present.
    ///
    /// Returns `true` if the reference was added.
    pub fn push(&mut self, reference: TypeReference) -> bool {
        if self.references.contains(&reference) {
            return false;
        }
        self.references.push(reference);
        true
    }

    /// Number of references
    pub fn len(&self) -> usize {
        self.references.len()
    }

    /// True when the registry holds no references
    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    /// Types that `type_name` must import, each once, in registry order
    pub fn imports_for(&self, type_name: &str) -> Vec<&str> {
        let mut imports: Vec<&str> = Vec::new();
        for reference in &self.references {
            if reference.to_type_name == type_name
                && reference.from_type_name != type_name
                && !imports.contains(&reference.from_type_name.as_str())
            {
                imports.push(&reference.from_type_name);
            }
        }
        imports
    }

    /// Write the registry as pretty JSON, atomically
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        write_json_atomic(path.as_ref(), self)
    }

    /// Load a registry written by [`ReferenceRegistry::save`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(SplitError::RegistryNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|source| SplitError::InvalidRegistry {
            path: path.to_path_buf(),
            source,
        })
    }
}
