//! Document Partitioning
//!
//! Splits one combined API document into per-group documents. Operations are
//! grouped by a key taken from their path; each group gets its own reduced
//! document (only the schemas its operations reach), a rewritten generator
//! configuration, and a type reference registry.
//!
//! Pipeline per group:
//! 1. Resolver walks every path item of the group
//! 2. ReferenceGraph gives the closure from operation roots
//! 3. Edges addressing the schema collection become the reduced schema set
//! 4. Edges between named types become the registry

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::config::ToolConfig;
use crate::document::{keys, read_document, write_json_atomic, SchemaCollection};
use crate::error::Result;
use crate::generator::{GeneratorConfig, GroupFiles};
use crate::graph::{ReferenceGraph, Resolver};
use crate::registry::ReferenceRegistry;

// =============================================================================
// Options
// =============================================================================

/// Settings controlling grouping and output file names
#[derive(Debug, Clone)]
pub struct SplitOptions {
    /// Leading path segments shared by all operations
    pub prefix_segments: usize,
    pub document_extension: String,
    pub generator_extension: String,
    pub registry_extension: String,
    /// Extension of the generated client file named in each group's configuration
    pub code_extension: String,
    /// Empty the output directory before writing
    pub clean_output: bool,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self::from(&ToolConfig::default())
    }
}

impl From<&ToolConfig> for SplitOptions {
    fn from(config: &ToolConfig) -> Self {
        Self {
            prefix_segments: config.split.prefix_segments,
            document_extension: config.split.document_extension.clone(),
            generator_extension: config.split.generator_extension.clone(),
            registry_extension: config.split.registry_extension.clone(),
            code_extension: config.codegen.type_extension.clone(),
            clean_output: config.split.clean_output,
        }
    }
}

impl SplitOptions {
    /// Output file names for a group
    pub fn files_for(&self, key: &str) -> GroupFiles {
        GroupFiles {
            document: format!("{}.{}", key, self.document_extension),
            config: format!("{}.{}", key, self.generator_extension),
            registry: format!("{}.{}", key, self.registry_extension),
            code: format!("{}.{}", key, self.code_extension),
        }
    }
}

/// Group key of an operation path: the segment right after `prefix_segments`
/// leading segments. Leading slashes are ignored.
///
/// ```
/// use apisplit::split::group_key;
///
/// assert_eq!(group_key("/api/pets/{id}", 1), Some("pets"));
/// assert_eq!(group_key("/pets", 1), None);
/// ```
pub fn group_key(path: &str, prefix_segments: usize) -> Option<&str> {
    path.trim_start_matches('/')
        .split('/')
        .nth(prefix_segments)
        .filter(|segment| !segment.is_empty())
}

// =============================================================================
// Partitioning
// =============================================================================

/// One group's reduced document, configuration and registry
#[derive(Debug, Clone)]
pub struct GroupOutput {
    pub key: String,
    pub document: Value,
    pub generator_config: Value,
    pub registry: ReferenceRegistry,
}

impl GroupOutput {
    /// Names of the schemas kept in the reduced document
    pub fn schema_names(&self) -> Vec<&str> {
        SchemaCollection::detect(&self.document)
            .get(&self.document)
            .map(|schemas| schemas.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Persist the document, configuration and registry into `output_dir`
    pub fn write(&self, output_dir: &Path, options: &SplitOptions) -> Result<Vec<PathBuf>> {
        let files = options.files_for(&self.key);

        let document = output_dir.join(&files.document);
        write_json_atomic(&document, &self.document)?;

        let config = output_dir.join(&files.config);
        write_json_atomic(&config, &self.generator_config)?;

        let registry = output_dir.join(&files.registry);
        self.registry.save(&registry)?;

        Ok(vec![document, config, registry])
    }
}

/// Partition `document` into groups, in order of first appearance.
///
/// Operations without a group key are left out of every group.
pub fn partition(
    document: &Value,
    generator_config: &GeneratorConfig,
    options: &SplitOptions,
) -> Vec<GroupOutput> {
    let Some(paths) = document.get(keys::PATHS).and_then(Value::as_object) else {
        debug!("document has no paths");
        return Vec::new();
    };

    let mut groups: IndexMap<&str, Map<String, Value>> = IndexMap::new();
    for (path, item) in paths {
        match group_key(path, options.prefix_segments) {
            Some(key) => {
                groups
                    .entry(key)
                    .or_default()
                    .insert(path.clone(), item.clone());
            }
            None => debug!(path = path.as_str(), "no group key, operation excluded"),
        }
    }

    let collection = SchemaCollection::detect(document);
    groups
        .into_iter()
        .map(|(key, entries)| build_group(document, collection, key, entries, generator_config, options))
        .collect()
}

fn build_group(
    document: &Value,
    collection: SchemaCollection,
    key: &str,
    entries: Map<String, Value>,
    generator_config: &GeneratorConfig,
    options: &SplitOptions,
) -> GroupOutput {
    let mut resolver = Resolver::new(document);
    for path in entries.keys() {
        if let Some(item) = document.get(keys::PATHS).and_then(|p| p.get(path)) {
            resolver.walk(item);
        }
    }
    let edges = resolver.into_edges();

    let graph = ReferenceGraph::from_edges(&edges);
    for cycle in graph.cycles() {
        debug!(group = key, types = ?cycle, "cyclic type references");
    }
    let reachable = graph.root_closure();

    let mut schemas = Map::new();
    for edge in &edges {
        if edge.is_self_reference()
            || collection.member_name(&edge.pointer).is_none()
            || !reachable.contains(&edge.pointer)
        {
            continue;
        }
        if !schemas.contains_key(&edge.dependency) {
            schemas.insert(edge.dependency.clone(), edge.node.clone());
        }
    }

    // Only references between kept schema types become imports
    let registry = ReferenceRegistry::from_edges(edges.iter().filter(|edge| {
        collection.member_name(&edge.pointer).is_some()
            && edge
                .dependent_pointer
                .as_deref()
                .and_then(|pointer| collection.member_name(pointer))
                .is_some()
            && edge
                .dependent
                .as_deref()
                .is_some_and(|dependent| schemas.contains_key(dependent))
    }));

    let mut reduced = document.clone();
    reduced[keys::PATHS] = Value::Object(entries);
    if collection.get(document).is_some() || !schemas.is_empty() {
        collection.replace(&mut reduced, schemas);
    }

    info!(
        group = key,
        types = graph.type_count(),
        references = registry.len(),
        "group partitioned"
    );

    GroupOutput {
        key: key.to_string(),
        document: reduced,
        generator_config: generator_config.for_group(&options.files_for(key)),
        registry,
    }
}

// =============================================================================
// File Driver
// =============================================================================

/// Summary of a split run
#[derive(Debug, Default)]
pub struct SplitReport {
    pub groups: Vec<String>,
    pub files: Vec<PathBuf>,
}

/// Split `input` using the generator configuration `generator_config`, writing
/// every group's artifacts into `output_dir`.
///
/// Both inputs are read and validated before the output directory is touched.
pub fn split_files(
    input: &Path,
    generator_config: &Path,
    output_dir: &Path,
    config: &ToolConfig,
) -> Result<SplitReport> {
    let document = read_document(input)?;
    let generator_config = GeneratorConfig::load(generator_config)?;
    let options = SplitOptions::from(config);

    let groups = partition(&document, &generator_config, &options);

    if options.clean_output && output_dir.exists() {
        fs::remove_dir_all(output_dir)?;
    }
    fs::create_dir_all(output_dir)?;

    let mut report = SplitReport::default();
    for group in &groups {
        report.files.extend(group.write(output_dir, &options)?);
        report.groups.push(group.key.clone());
    }

    info!(
        input = %input.display(),
        output = %output_dir.display(),
        groups = report.groups.len(),
        "split complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TypeReference;
    use serde_json::json;

    fn generator_config() -> GeneratorConfig {
        GeneratorConfig::from_value(
            "api.nswag",
            json!({
                "documentGenerator": { "fromDocument": { "url": "api.json" } },
                "codeGenerators": { "openApiToTypeScriptClient": { "output": "api.ts" } }
            }),
        )
        .unwrap()
    }

    fn options() -> SplitOptions {
        SplitOptions::default()
    }

    fn response(pointer: &str) -> Value {
        json!({
            "responses": {
                "200": { "content": { "application/json": { "schema": { "$ref": pointer } } } }
            }
        })
    }

    fn find<'a>(groups: &'a [GroupOutput], key: &str) -> &'a GroupOutput {
        groups.iter().find(|g| g.key == key).unwrap()
    }

    #[test]
    fn test_group_key() {
        assert_eq!(group_key("/api/pets/{id}", 1), Some("pets"));
        assert_eq!(group_key("api/pets", 1), Some("pets"));
        assert_eq!(group_key("/pets/{id}", 0), Some("pets"));
        assert_eq!(group_key("/api", 1), None);
        assert_eq!(group_key("/api//x", 1), None);
        assert_eq!(group_key("/", 0), None);
    }

    #[test]
    fn test_pets_group_with_owner() {
        let document = json!({
            "openapi": "3.0.0",
            "paths": {
                "/api/pets/{id}": { "get": response("#/components/schemas/Pet") },
                "/api/pets/{id}/owner": { "get": response("#/components/schemas/Owner") },
                "/api/stores": { "get": response("#/components/schemas/Store") }
            },
            "components": { "schemas": {
                "Pet": { "type": "object", "properties": { "owner": { "$ref": "#/components/schemas/Owner" } } },
                "Owner": { "type": "object", "properties": { "name": { "type": "string" } } },
                "Store": { "type": "object" },
                "Unused": { "type": "object" }
            } }
        });

        let groups = partition(&document, &generator_config(), &options());
        assert_eq!(groups.iter().map(|g| g.key.as_str()).collect::<Vec<_>>(), vec!["pets", "stores"]);

        let pets = find(&groups, "pets");
        assert_eq!(pets.schema_names(), vec!["Pet", "Owner"]);
        assert_eq!(pets.registry.references, vec![TypeReference::new("Owner", "Pet")]);
        let paths = pets.document["paths"].as_object().unwrap();
        assert_eq!(paths.len(), 2);

        let stores = find(&groups, "stores");
        assert_eq!(stores.schema_names(), vec!["Store"]);
        assert!(stores.registry.is_empty());
        assert_eq!(
            stores.generator_config["documentGenerator"]["fromDocument"]["url"],
            "stores.json"
        );
    }

    #[test]
    fn test_discriminator_mapping() {
        let document = json!({
            "openapi": "3.0.0",
            "paths": { "/api/shapes": { "get": response("#/components/schemas/Shape") } },
            "components": { "schemas": {
                "Shape": {
                    "type": "object",
                    "discriminator": {
                        "propertyName": "kind",
                        "mapping": {
                            "circle": "#/components/schemas/Circle",
                            "square": "#/components/schemas/Square"
                        }
                    }
                },
                "Circle": { "type": "object" },
                "Square": { "type": "object" }
            } }
        });

        let groups = partition(&document, &generator_config(), &options());
        let shapes = find(&groups, "shapes");
        assert_eq!(shapes.schema_names(), vec!["Shape", "Circle", "Square"]);
        assert_eq!(
            shapes.registry.references,
            vec![
                TypeReference::new("Circle", "Shape"),
                TypeReference::new("Square", "Shape"),
            ]
        );
    }

    #[test]
    fn test_self_reference_terminates() {
        let document = json!({
            "swagger": "2.0",
            "paths": {
                "/api/nodes": {
                    "get": { "responses": { "200": { "schema": { "$ref": "#/definitions/Node" } } } }
                }
            },
            "definitions": {
                "Node": {
                    "type": "object",
                    "properties": {
                        "children": { "type": "array", "items": { "$ref": "#/definitions/Node" } }
                    }
                }
            }
        });

        let groups = partition(&document, &generator_config(), &options());
        let nodes = find(&groups, "nodes");
        assert_eq!(nodes.schema_names(), vec!["Node"]);
        assert!(nodes.registry.is_empty());
        assert!(nodes.document.get("components").is_none());
    }

    #[test]
    fn test_non_schema_components_not_copied() {
        let document = json!({
            "openapi": "3.0.0",
            "paths": {
                "/api/pets": {
                    "get": {
                        "parameters": [ { "$ref": "#/components/parameters/Limit" } ],
                        "responses": { "200": { "$ref": "#/components/responses/PetList" } }
                    }
                }
            },
            "components": {
                "parameters": { "Limit": { "name": "limit", "in": "query", "schema": { "$ref": "#/components/schemas/Count" } } },
                "responses": { "PetList": { "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Pet" } } } } },
                "schemas": {
                    "Count": { "type": "integer" },
                    "Pet": { "type": "object" }
                }
            }
        });

        let groups = partition(&document, &generator_config(), &options());
        let pets = find(&groups, "pets");
        assert_eq!(pets.schema_names(), vec!["Count", "Pet"]);
        // Reusable components stay in place for the generator
        assert!(pets.document["components"]["parameters"]["Limit"].is_object());
        assert!(pets.registry.is_empty());
    }

    #[test]
    fn test_response_sharing_schema_name() {
        let document = json!({
            "openapi": "3.0.0",
            "paths": {
                "/api/pets": {
                    "get": {
                        "responses": {
                            "200": { "content": { "application/json": {
                                "schema": { "$ref": "#/components/schemas/Pet" }
                            } } },
                            "400": { "$ref": "#/components/responses/Error" }
                        }
                    }
                }
            },
            "components": {
                "responses": {
                    "Error": { "content": { "application/json": {
                        "schema": { "$ref": "#/components/schemas/Error" }
                    } } }
                },
                "schemas": {
                    "Pet": { "type": "object" },
                    "Error": {
                        "type": "object",
                        "properties": { "detail": { "$ref": "#/components/schemas/ErrorDetail" } }
                    },
                    "ErrorDetail": { "type": "object" }
                }
            }
        });

        let groups = partition(&document, &generator_config(), &options());
        let pets = find(&groups, "pets");
        assert_eq!(pets.schema_names(), vec!["Pet", "Error", "ErrorDetail"]);
        assert_eq!(
            pets.registry.references,
            vec![TypeReference::new("ErrorDetail", "Error")]
        );
        assert!(pets.document["components"]["responses"]["Error"].is_object());
    }

    #[test]
    fn test_operations_without_key_excluded() {
        let document = json!({
            "openapi": "3.0.0",
            "paths": {
                "/health": { "get": response("#/components/schemas/Status") },
                "/api/pets": { "get": response("#/components/schemas/Pet") }
            },
            "components": { "schemas": { "Status": { "type": "object" }, "Pet": { "type": "object" } } }
        });

        let groups = partition(&document, &generator_config(), &options());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].schema_names(), vec!["Pet"]);
    }

    #[test]
    fn test_unresolvable_reference_ignored() {
        let document = json!({
            "openapi": "3.0.0",
            "paths": { "/api/pets": { "get": response("#/components/schemas/Missing") } },
            "components": { "schemas": { "Pet": { "type": "object" } } }
        });

        let groups = partition(&document, &generator_config(), &options());
        assert!(groups[0].schema_names().is_empty());
    }

    #[test]
    fn test_no_paths() {
        let document = json!({ "openapi": "3.0.0" });
        assert!(partition(&document, &generator_config(), &options()).is_empty());
    }
}
