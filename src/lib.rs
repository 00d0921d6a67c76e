//! apisplit
//!
//! Splits one combined OpenAPI / Swagger document into per-resource documents
//! and generates one TypeScript file per schema type with a minimal set of
//! imports.
//!
//! ## Features
//!
//! - **Reference Resolution**: follows `$ref` pointers and discriminator
//!   mappings, terminating on recursive types
//! - **Partitioning**: one reduced document per group, carrying only the schema
//!   definitions its operations reach
//! - **Type Reference Registry**: persisted `(dependency, dependent)` pairs that
//!   drive per-file imports
//! - **Per-Type Generation**: one file per type, with a configurable policy for
//!   files that already exist
//!
//! ## Output Layout
//!
//! ```text
//! out/
//! ├── pets.json          # reduced document
//! ├── pets.nswag         # generator configuration for the group
//! ├── pets.refs.json     # type reference registry
//! ├── pets.ts            # client (after `run`)
//! ├── Pet.ts             # one file per type (after `run`)
//! ├── Owner.ts
//! ├── jsonParse.ts       # shared helpers
//! └── checksums.sha256
//! ```

pub mod batch;
pub mod checksum;
pub mod codegen;
pub mod config;
pub mod document;
pub mod error;
pub mod generator;
pub mod graph;
pub mod registry;
pub mod split;

pub use batch::{run_configuration, run_directory, RunReport};
pub use checksum::Checksum;
pub use codegen::{ArtifactGenerator, CodeArtifact, GeneratedCode, TypeFileAssembler, TypeScriptGenerator, WritePolicy};
pub use config::ToolConfig;
pub use error::{Result, SplitError};
pub use generator::GeneratorConfig;
pub use graph::{DependencyEdge, ReferenceGraph, Resolver};
pub use registry::{ReferenceRegistry, TypeReference};
pub use split::{partition, split_files, GroupOutput, SplitOptions, SplitReport};
