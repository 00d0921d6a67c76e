//! Code Generation
//!
//! Turns a (reduced) API document into generated source artifacts and writes
//! them either as one bundle or as one file per type.
//!
//! Architecture:
//! - ArtifactGenerator: renders a document into a client body plus type artifacts
//! - CodeArtifact: rendered body of one type, with the shared helpers it calls
//! - TypeFileAssembler: prefixes each artifact with imports computed from the
//!   reference registry and writes it under a WritePolicy
//!
//! The assembler never inspects rendered text; helper usage is a structured
//! fact recorded by the generator.

pub mod assembler;
pub mod manifest;
pub mod typescript;

pub use assembler::{AssembleReport, TypeFileAssembler, WriteOutcome};
pub use manifest::GenerationManifest;
pub use typescript::TypeScriptGenerator;

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

// =============================================================================
// Artifacts
// =============================================================================

/// Shared runtime routines exported by the helpers module
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HelperRoutine {
    /// Parses JSON text, reviving ISO dates
    JsonParse,
    /// Builds a class instance from plain data
    CreateInstance,
}

impl HelperRoutine {
    pub const ALL: [HelperRoutine; 2] = [HelperRoutine::JsonParse, HelperRoutine::CreateInstance];

    /// Exported routine name
    pub fn name(&self) -> &'static str {
        match self {
            HelperRoutine::JsonParse => "jsonParse",
            HelperRoutine::CreateInstance => "createInstance",
        }
    }
}

impl fmt::Display for HelperRoutine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What an artifact declares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// A class with runtime construction code
    Class,
    /// A type alias (enum, union, primitive wrapper)
    Alias,
    /// The shared helpers module
    Helpers,
}

/// Rendered source for one type
#[derive(Debug, Clone, PartialEq)]
pub struct CodeArtifact {
    /// Type name; also the per-type file stem
    pub type_name: String,
    pub kind: ArtifactKind,
    /// Rendered body, without imports
    pub code: String,
    /// Helper routines the body calls
    pub helpers: BTreeSet<HelperRoutine>,
}

impl CodeArtifact {
    pub fn new(type_name: impl Into<String>, kind: ArtifactKind, code: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            kind,
            code: code.into(),
            helpers: BTreeSet::new(),
        }
    }

    /// Record helper routines used by the body
    pub fn with_helpers(mut self, helpers: impl IntoIterator<Item = HelperRoutine>) -> Self {
        self.helpers.extend(helpers);
        self
    }
}

/// Output of a generator run
#[derive(Debug, Clone, Default)]
pub struct GeneratedCode {
    /// Client body (operations), without type declarations
    pub client: String,
    /// Helpers the client body calls
    pub client_helpers: BTreeSet<HelperRoutine>,
    /// Types referenced by the client body
    pub client_types: Vec<String>,
    /// One artifact per schema type, plus the helpers module when needed
    pub types: Vec<CodeArtifact>,
}

impl GeneratedCode {
    /// The shared helpers artifact, if any
    pub fn helpers_artifact(&self) -> Option<&CodeArtifact> {
        self.types.iter().find(|a| a.kind == ArtifactKind::Helpers)
    }

    /// Everything in one file: types first, then the client
    pub fn bundle(&self) -> String {
        let mut output = String::new();
        for artifact in &self.types {
            output.push_str(&artifact.code);
            output.push('\n');
        }
        output.push_str(&self.client);
        output
    }
}

/// Renders a document into source artifacts.
///
/// Implementations decide type names and code layout; the assembler only
/// needs type names, bodies and helper usage.
pub trait ArtifactGenerator {
    /// Render all types and the client for `document`
    fn generate(&self, document: &Value) -> Result<GeneratedCode>;
}

// =============================================================================
// Write Policy
// =============================================================================

/// What to do when a per-type file already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WritePolicy {
    /// Keep existing files (first generation wins)
    #[default]
    Never,
    /// Always overwrite
    Always,
    /// Overwrite only files unchanged since they were last generated
    Unmodified,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helper_names() {
        let names: Vec<_> = HelperRoutine::ALL.iter().map(|h| h.to_string()).collect();
        assert_eq!(names, vec!["jsonParse", "createInstance"]);
    }

    #[test]
    fn test_bundle_order() {
        let generated = GeneratedCode {
            client: "export class Client {}\n".to_string(),
            types: vec![
                CodeArtifact::new("Pet", ArtifactKind::Class, "export class Pet {}"),
                CodeArtifact::new("jsonParse", ArtifactKind::Helpers, "export function jsonParse() {}"),
            ],
            ..Default::default()
        };
        let bundle = generated.bundle();
        assert!(bundle.find("class Pet").unwrap() < bundle.find("class Client").unwrap());
        assert_eq!(generated.helpers_artifact().unwrap().type_name, "jsonParse");
    }

    #[test]
    fn test_write_policy_serde() {
        let policy: WritePolicy = serde_json::from_str("\"unmodified\"").unwrap();
        assert_eq!(policy, WritePolicy::Unmodified);
        assert_eq!(serde_json::to_string(&WritePolicy::Never).unwrap(), "\"never\"");
    }
}
