//! API Document Access
//!
//! Reading and writing JSON documents, well-known keys, and the location of
//! the schema definition collection (OpenAPI 3 `components/schemas` or
//! Swagger 2 `definitions`).

pub mod pointer;

pub use pointer::{canonical_pointer, resolve_pointer};

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Result, SplitError};

/// Well-known keys in API documents and generator configurations
pub mod keys {
    pub const PATHS: &str = "paths";
    pub const REF: &str = "$ref";
    pub const MAPPING: &str = "mapping";
    pub const COMPONENTS: &str = "components";
    pub const SCHEMAS: &str = "schemas";
    pub const DEFINITIONS: &str = "definitions";

    pub const CODE_GENERATORS: &str = "codeGenerators";
    pub const TYPESCRIPT_CLIENT: &str = "openApiToTypeScriptClient";
    pub const OUTPUT: &str = "output";
    pub const CLASS_NAME: &str = "className";
    pub const EXTRACT_TYPES: &str = "extractEverySchemaTypeToFile";
    pub const TYPE_REFERENCE_MAP_PATH: &str = "typeReferenceMapPath";
    pub const DOCUMENT_GENERATOR: &str = "documentGenerator";
    pub const FROM_DOCUMENT: &str = "fromDocument";
    pub const URL: &str = "url";
    pub const JSON: &str = "json";
}

// =============================================================================
// Schema Collection
// =============================================================================

/// Where a document keeps its named schema definitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaCollection {
    /// OpenAPI 3: `#/components/schemas`
    Components,
    /// Swagger 2: `#/definitions`
    Definitions,
}

impl SchemaCollection {
    /// Detect the collection used by a document.
    ///
    /// `components/schemas` wins when present; otherwise a `definitions` object
    /// or a `swagger` version key selects Swagger 2.
    pub fn detect(document: &Value) -> Self {
        if document
            .get(keys::COMPONENTS)
            .and_then(|c| c.get(keys::SCHEMAS))
            .is_some_and(Value::is_object)
        {
            return SchemaCollection::Components;
        }
        if document.get(keys::DEFINITIONS).is_some_and(Value::is_object)
            || document.get("swagger").is_some()
        {
            return SchemaCollection::Definitions;
        }
        SchemaCollection::Components
    }

    /// Pointer prefix (including the trailing slash) of members of this collection
    pub fn pointer_prefix(&self) -> &'static str {
        match self {
            SchemaCollection::Components => "#/components/schemas/",
            SchemaCollection::Definitions => "#/definitions/",
        }
    }

    /// Name of the schema addressed by `pointer`, if it is a direct member of
    /// this collection.
    pub fn member_name<'p>(&self, pointer: &'p str) -> Option<&'p str> {
        let rest = pointer.strip_prefix(self.pointer_prefix())?;
        (!rest.is_empty() && !rest.contains('/')).then_some(rest)
    }

    /// The schema definitions of a document, if any
    pub fn get<'a>(&self, document: &'a Value) -> Option<&'a Map<String, Value>> {
        match self {
            SchemaCollection::Components => document
                .get(keys::COMPONENTS)?
                .get(keys::SCHEMAS)?
                .as_object(),
            SchemaCollection::Definitions => document.get(keys::DEFINITIONS)?.as_object(),
        }
    }

    /// Replace the schema definitions of a document, creating containers as needed
    pub fn replace(&self, document: &mut Value, schemas: Map<String, Value>) {
        match self {
            SchemaCollection::Components => {
                let components = ensure_object(document, keys::COMPONENTS);
                components.insert(keys::SCHEMAS.to_string(), Value::Object(schemas));
            }
            SchemaCollection::Definitions => {
                if let Some(root) = document.as_object_mut() {
                    root.insert(keys::DEFINITIONS.to_string(), Value::Object(schemas));
                }
            }
        }
    }
}

/// Get (or create) the object stored under `key` in `parent`.
///
/// A non-object `parent` is replaced by an empty object first.
pub fn ensure_object<'a>(parent: &'a mut Value, key: &str) -> &'a mut Map<String, Value> {
    if !parent.is_object() {
        *parent = Value::Object(Map::new());
    }
    let child = &mut parent[key];
    if !child.is_object() {
        *child = Value::Object(Map::new());
    }
    match child {
        Value::Object(inner) => inner,
        _ => unreachable!("child was just made an object"),
    }
}

// =============================================================================
// Reading / Writing
// =============================================================================

/// Read and parse a JSON document, reporting missing files as input errors
pub fn read_document(path: &Path) -> Result<Value> {
    if !path.is_file() {
        return Err(SplitError::InputNotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| SplitError::InvalidDocument {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize `value` as pretty JSON and write it atomically to `path`.
///
/// The content goes to a temporary file in the target directory first and is
/// renamed into place, so readers never observe a half-written file.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    write_atomic(path, content.as_bytes())
}

/// Write raw bytes atomically to `path`
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;
    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(content)?;
    file.flush()?;
    file.persist(path)?;
    Ok(())
}
