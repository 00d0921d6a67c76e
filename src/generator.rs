//! Generator Configuration Documents
//!
//! A generator configuration is a JSON document (`*.nswag`) naming the input
//! API document (`documentGenerator.fromDocument`) and the TypeScript client
//! settings (`codeGenerators.openApiToTypeScriptClient`). The splitter
//! rewrites one copy per group; `run` reads it back.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::document::{ensure_object, keys, read_document};
use crate::error::{Result, SplitError};

/// Pointer to the TypeScript client section
const CLIENT_POINTER: &str = "/codeGenerators/openApiToTypeScriptClient";

/// Where a configuration takes its API document from
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentSource {
    /// A local path, resolved against the configuration's directory
    File(PathBuf),
    /// A document embedded in the configuration
    Inline(Value),
}

/// A validated generator configuration
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    path: PathBuf,
    value: Value,
}

impl GeneratorConfig {
    /// Read and validate a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let value = read_document(path)?;
        Self::from_value(path, value)
    }

    /// Validate an already parsed configuration.
    ///
    /// The TypeScript client section must be present as an object.
    pub fn from_value(path: impl Into<PathBuf>, value: Value) -> Result<Self> {
        let path = path.into();
        if !value.pointer(CLIENT_POINTER).is_some_and(Value::is_object) {
            return Err(SplitError::missing_section(
                path,
                format!("{}.{}", keys::CODE_GENERATORS, keys::TYPESCRIPT_CLIENT),
            ));
        }
        Ok(Self { path, value })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Directory relative paths in the configuration are resolved against
    pub fn base_dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    fn client(&self) -> Option<&Map<String, Value>> {
        self.value.pointer(CLIENT_POINTER).and_then(Value::as_object)
    }

    fn client_str(&self, key: &str) -> Option<&str> {
        self.client()?.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
    }

    /// Client output file
    pub fn output(&self) -> Result<PathBuf> {
        self.client_str(keys::OUTPUT)
            .map(|output| self.base_dir().join(output))
            .ok_or_else(|| {
                SplitError::missing_section(
                    &self.path,
                    format!("{}.{}.{}", keys::CODE_GENERATORS, keys::TYPESCRIPT_CLIENT, keys::OUTPUT),
                )
            })
    }

    /// Client class name; a `{controller}` placeholder is dropped
    pub fn class_name(&self) -> String {
        self.client_str(keys::CLASS_NAME)
            .map(|name| name.replace("{controller}", ""))
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "Client".to_string())
    }

    /// Whether every schema type goes to its own file
    pub fn extract_types(&self) -> bool {
        self.client()
            .and_then(|client| client.get(keys::EXTRACT_TYPES))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Type reference registry location, when configured
    pub fn type_reference_map_path(&self) -> Option<PathBuf> {
        self.client_str(keys::TYPE_REFERENCE_MAP_PATH)
            .map(|path| self.base_dir().join(path))
    }

    /// The API document this configuration generates from.
    ///
    /// An inline `json` document wins over `url`. Remote URLs are rejected.
    pub fn document_source(&self) -> Result<DocumentSource> {
        let from_document = self
            .value
            .get(keys::DOCUMENT_GENERATOR)
            .and_then(|g| g.get(keys::FROM_DOCUMENT));

        match from_document.and_then(|f| f.get(keys::JSON)) {
            Some(Value::String(text)) if !text.trim().is_empty() => {
                let value = serde_json::from_str(text).map_err(|source| {
                    SplitError::InvalidDocument {
                        path: self.path.clone(),
                        source,
                    }
                })?;
                return Ok(DocumentSource::Inline(value));
            }
            Some(value @ Value::Object(_)) => return Ok(DocumentSource::Inline(value.clone())),
            _ => {}
        }

        let url = from_document
            .and_then(|f| f.get(keys::URL))
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                SplitError::missing_section(
                    &self.path,
                    format!("{}.{}", keys::DOCUMENT_GENERATOR, keys::FROM_DOCUMENT),
                )
            })?;

        if url.starts_with("http://") || url.starts_with("https://") {
            return Err(SplitError::UnsupportedSource(url.to_string()));
        }
        Ok(DocumentSource::File(self.base_dir().join(url)))
    }

    /// Load the API document this configuration points at
    pub fn load_document(&self) -> Result<Value> {
        match self.document_source()? {
            DocumentSource::File(path) => read_document(&path),
            DocumentSource::Inline(value) => Ok(value),
        }
    }

    /// Copy of the configuration pointed at one group's artifacts
    pub fn for_group(&self, outputs: &GroupFiles) -> Value {
        let mut config = self.value.clone();

        if let Some(client) = config.pointer_mut(CLIENT_POINTER).and_then(Value::as_object_mut) {
            client.insert(keys::OUTPUT.to_string(), Value::String(outputs.code.clone()));
            client.insert(keys::EXTRACT_TYPES.to_string(), Value::Bool(true));
            client.insert(
                keys::TYPE_REFERENCE_MAP_PATH.to_string(),
                Value::String(outputs.registry.clone()),
            );
        }

        let generator = &mut config[keys::DOCUMENT_GENERATOR];
        let from_document = ensure_object(generator, keys::FROM_DOCUMENT);
        from_document.remove(keys::JSON);
        from_document.insert(keys::URL.to_string(), Value::String(outputs.document.clone()));

        config
    }
}

/// File names written for one group, relative to the output directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupFiles {
    pub document: String,
    pub config: String,
    pub registry: String,
    pub code: String,
}
