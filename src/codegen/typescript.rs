//! TypeScript Emitter
//!
//! Renders an API document as TypeScript:
//! - object schemas become classes with `fromJS` (and `fromJSON` when the class
//!   is returned directly by an operation)
//! - enums, compositions and everything else become type aliases
//! - a shared helpers module holds `jsonParse` and `createInstance`
//! - one fetch-based client class carries an async method per operation
//!
//! Type names are the schema member names, so they line up with the names in
//! the type reference registry.

use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use super::{ArtifactGenerator, ArtifactKind, CodeArtifact, GeneratedCode, HelperRoutine};
use crate::document::{keys, resolve_pointer, SchemaCollection};
use crate::error::Result;

const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("a valid identifier regex")
});

const FETCH_TYPE: &str = "{ fetch(url: RequestInfo, init?: RequestInit): Promise<Response> }";

const HELPERS_CODE: &str = r#"const isoDate = /^\d{4}-\d{2}-\d{2}(T\d{2}:\d{2}:\d{2}(\.\d+)?(Z|[+-]\d{2}:\d{2})?)?$/;

export function jsonParse(text: string): any {
    return JSON.parse(text, (_key, value) =>
        typeof value === "string" && isoDate.test(value) ? new Date(value) : value);
}

export function createInstance<T>(type: new () => T, data: any): T {
    const instance = new type();
    if (data && typeof data === "object") {
        Object.assign(instance as any, data);
    }
    return instance;
}
"#;

/// Compact TypeScript client and model generator
pub struct TypeScriptGenerator {
    class_name: String,
    helpers_module: String,
}

impl TypeScriptGenerator {
    /// Create a generator emitting a client class named `class_name`
    pub fn new(class_name: impl Into<String>, helpers_module: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            helpers_module: helpers_module.into(),
        }
    }
}

impl ArtifactGenerator for TypeScriptGenerator {
    fn generate(&self, document: &Value) -> Result<GeneratedCode> {
        let collection = SchemaCollection::detect(document);
        let ctx = RenderContext {
            document,
            collection,
            schemas: collection.get(document),
        };

        let operations = ctx.operations();
        let response_roots: HashSet<String> = operations
            .iter()
            .filter_map(|op| op.response)
            .filter_map(|schema| schema.get(keys::REF).and_then(Value::as_str))
            .map(|pointer| ctx.type_name(pointer))
            .collect();

        let mut generated = GeneratedCode::default();
        if let Some(schemas) = ctx.schemas {
            for (name, schema) in schemas {
                let artifact = if is_class_schema(schema) {
                    ctx.render_class(name, schema, response_roots.contains(name))
                } else {
                    ctx.render_alias(name, schema)
                };
                generated.types.push(artifact);
            }
        }

        self.render_client(&ctx, &operations, &mut generated);

        let uses_helpers = !generated.client_helpers.is_empty()
            || generated.types.iter().any(|a| !a.helpers.is_empty());
        if uses_helpers {
            generated.types.push(CodeArtifact::new(
                self.helpers_module.clone(),
                ArtifactKind::Helpers,
                HELPERS_CODE,
            ));
        }

        Ok(generated)
    }
}

// =============================================================================
// Client Emission
// =============================================================================

impl TypeScriptGenerator {
    fn render_client(
        &self,
        ctx: &RenderContext<'_>,
        operations: &[Operation<'_>],
        generated: &mut GeneratedCode,
    ) {
        let mut code = String::new();
        code.push_str(&format!("export class {} {{\n", self.class_name));
        code.push_str("    private baseUrl: string;\n");
        code.push_str(&format!("    private http: {};\n\n", FETCH_TYPE));
        code.push_str(&format!(
            "    constructor(baseUrl?: string, http?: {}) {{\n",
            FETCH_TYPE
        ));
        code.push_str("        this.http = http ? http : <any>globalThis;\n");
        code.push_str("        this.baseUrl = baseUrl ?? \"\";\n");
        code.push_str("    }\n");

        let mut referenced = Vec::new();
        for operation in operations {
            code.push('\n');
            ctx.render_operation(&mut code, operation, &mut generated.client_helpers);

            for param in operation.params.iter().chain(operation.body.iter()) {
                ctx.collect_types(param.schema, &mut referenced);
            }
            if let Some(response) = operation.response {
                ctx.collect_types(response, &mut referenced);
            }
        }
        code.push_str("}\n");

        generated.client = code;
        generated.client_types = referenced;
    }
}

// =============================================================================
// Render Context
// =============================================================================

struct Parameter<'a> {
    name: String,
    ident: String,
    location: String,
    required: bool,
    schema: &'a Value,
}

struct Operation<'a> {
    method_name: String,
    http_method: String,
    path: String,
    params: Vec<Parameter<'a>>,
    body: Option<Parameter<'a>>,
    response: Option<&'a Value>,
}

struct RenderContext<'a> {
    document: &'a Value,
    collection: SchemaCollection,
    schemas: Option<&'a Map<String, Value>>,
}

impl<'a> RenderContext<'a> {
    /// Type name addressed by a `$ref` pointer
    fn type_name(&self, pointer: &str) -> String {
        if let Some((name, _)) = resolve_pointer(self.document, pointer) {
            return name;
        }
        pointer.rsplit('/').next().unwrap_or(pointer).to_string()
    }

    fn is_class(&self, name: &str) -> bool {
        self.schemas
            .and_then(|schemas| schemas.get(name))
            .is_some_and(is_class_schema)
    }

    /// Follow `$ref` chains of reusable parameters, bodies and responses
    fn deref(&self, mut value: &'a Value) -> &'a Value {
        for _ in 0..16 {
            let Some(pointer) = value.get(keys::REF).and_then(Value::as_str) else {
                break;
            };
            match resolve_pointer(self.document, pointer) {
                Some((_, target)) => value = target,
                None => break,
            }
        }
        value
    }

    fn property_key(&self, name: &str) -> String {
        if IDENTIFIER.is_match(name) {
            name.to_string()
        } else {
            quote(name)
        }
    }

    fn member(&self, name: &str) -> String {
        if IDENTIFIER.is_match(name) {
            format!(".{}", name)
        } else {
            format!("[{}]", quote(name))
        }
    }

    // -------------------------------------------------------------------------
    // Types
    // -------------------------------------------------------------------------

    fn ts_type(&self, schema: &Value) -> String {
        let base = self.base_type(schema);
        if is_nullable(schema) && base != "any" {
            format!("{} | null", base)
        } else {
            base
        }
    }

    /// Type usable as an array element or union member
    fn wrapped_type(&self, schema: &Value) -> String {
        let ty = self.ts_type(schema);
        if ty.contains(" | ") || ty.contains(" & ") {
            format!("({})", ty)
        } else {
            ty
        }
    }

    fn base_type(&self, schema: &Value) -> String {
        let Some(obj) = schema.as_object() else {
            return "any".to_string();
        };

        if let Some(pointer) = obj.get(keys::REF).and_then(Value::as_str) {
            return self.type_name(pointer);
        }
        if let Some(values) = obj.get("enum").and_then(Value::as_array) {
            return literal_union(values);
        }
        for (key, separator) in [("oneOf", " | "), ("anyOf", " | "), ("allOf", " & ")] {
            if let Some(members) = obj.get(key).and_then(Value::as_array) {
                let parts: Vec<String> = members.iter().map(|m| self.wrapped_type(m)).collect();
                if !parts.is_empty() {
                    return parts.join(separator);
                }
            }
        }

        match schema_type(schema) {
            Some("string") => match obj.get("format").and_then(Value::as_str) {
                Some("date") | Some("date-time") => "Date".to_string(),
                Some("binary") => "Blob".to_string(),
                _ => "string".to_string(),
            },
            Some("integer") | Some("number") => "number".to_string(),
            Some("boolean") => "boolean".to_string(),
            Some("array") => {
                let item = obj
                    .get("items")
                    .map(|items| self.wrapped_type(items))
                    .unwrap_or_else(|| "any".to_string());
                format!("{}[]", item)
            }
            Some("object") | None if obj.contains_key("properties") => self.inline_object(obj),
            Some("object") => match obj.get("additionalProperties") {
                Some(value @ Value::Object(_)) => {
                    format!("{{ [key: string]: {} }}", self.ts_type(value))
                }
                _ => "{ [key: string]: any }".to_string(),
            },
            _ => "any".to_string(),
        }
    }

    fn inline_object(&self, obj: &Map<String, Value>) -> String {
        let required = required_set(obj);
        let fields: Vec<String> = properties(obj)
            .map(|(name, schema)| {
                let marker = if required.contains(name.as_str()) { "" } else { "?" };
                format!("{}{}: {}", self.property_key(name), marker, self.ts_type(schema))
            })
            .collect();
        if fields.is_empty() {
            "{}".to_string()
        } else {
            format!("{{ {} }}", fields.join("; "))
        }
    }

    /// Schema type names referenced anywhere below `schema`, in first-seen order
    fn collect_types(&self, schema: &Value, found: &mut Vec<String>) {
        match schema {
            Value::Object(map) => {
                for (key, value) in map {
                    match (key.as_str(), value) {
                        (keys::REF, Value::String(pointer)) => {
                            let name = self.type_name(pointer);
                            let known = self
                                .schemas
                                .is_some_and(|schemas| schemas.contains_key(&name));
                            if known && !found.contains(&name) {
                                found.push(name);
                            }
                        }
                        _ => self.collect_types(value, found),
                    }
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.collect_types(item, found);
                }
            }
            _ => {}
        }
    }

    // -------------------------------------------------------------------------
    // Schema Artifacts
    // -------------------------------------------------------------------------

    fn render_class(&self, name: &str, schema: &Value, response_root: bool) -> CodeArtifact {
        let empty = Map::new();
        let obj = schema.as_object().unwrap_or(&empty);
        let required = required_set(obj);

        let mut code = String::new();
        push_description(&mut code, schema, "");
        code.push_str(&format!("export class {} {{\n", name));

        let mut conversions = Vec::new();
        for (property, property_schema) in properties(obj) {
            push_description(&mut code, property_schema, "    ");
            let marker = if required.contains(property.as_str()) { "!" } else { "?" };
            code.push_str(&format!(
                "    {}{}: {};\n",
                self.property_key(property),
                marker,
                self.ts_type(property_schema)
            ));
            if let Some(line) = self.conversion(property, property_schema) {
                conversions.push(line);
            }
        }
        if obj.contains_key("properties") {
            code.push('\n');
        }

        code.push_str(&format!("    static fromJS(data: any): {} {{\n", name));
        if conversions.is_empty() {
            code.push_str(&format!("        return createInstance({}, data);\n", name));
        } else {
            code.push_str(&format!("        const result = createInstance({}, data);\n", name));
            for line in &conversions {
                code.push_str(&format!("        {}\n", line));
            }
            code.push_str("        return result;\n");
        }
        code.push_str("    }\n");

        let mut helpers = vec![HelperRoutine::CreateInstance];
        if response_root {
            code.push_str(&format!("\n    static fromJSON(json: string): {} {{\n", name));
            code.push_str(&format!("        return {}.fromJS(jsonParse(json));\n", name));
            code.push_str("    }\n");
            helpers.push(HelperRoutine::JsonParse);
        }
        code.push_str("}\n");

        CodeArtifact::new(name, ArtifactKind::Class, code).with_helpers(helpers)
    }

    /// Statement converting a nested class-typed property inside `fromJS`
    fn conversion(&self, property: &str, schema: &Value) -> Option<String> {
        let member = self.member(property);
        if let Some(pointer) = schema.get(keys::REF).and_then(Value::as_str) {
            let target = self.type_name(pointer);
            return self.is_class(&target).then(|| {
                format!(
                    "if (data?{m}) result{m} = {t}.fromJS(data{m});",
                    m = member,
                    t = target
                )
            });
        }
        if schema_type(schema) == Some("array") {
            let pointer = schema.get("items")?.get(keys::REF)?.as_str()?;
            let target = self.type_name(pointer);
            return self.is_class(&target).then(|| {
                format!(
                    "if (Array.isArray(data?{m})) result{m} = data{m}.map((item: any) => {t}.fromJS(item));",
                    m = member,
                    t = target
                )
            });
        }
        None
    }

    fn render_alias(&self, name: &str, schema: &Value) -> CodeArtifact {
        let mut code = String::new();
        push_description(&mut code, schema, "");
        code.push_str(&format!("export type {} = {};\n", name, self.ts_type(schema)));
        CodeArtifact::new(name, ArtifactKind::Alias, code)
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    fn operations(&self) -> Vec<Operation<'a>> {
        let mut operations = Vec::new();
        let Some(paths) = self.document.get(keys::PATHS).and_then(Value::as_object) else {
            return operations;
        };

        let mut used_names = HashSet::new();
        for (path, path_item) in paths {
            let Some(item) = path_item.as_object() else {
                continue;
            };
            for (method, operation) in item {
                if !HTTP_METHODS.contains(&method.as_str()) {
                    continue;
                }

                let base_name = operation
                    .get("operationId")
                    .and_then(Value::as_str)
                    .map(to_camel_case)
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| format!("{}{}", method, to_pascal_case(path)));
                let mut method_name = base_name.clone();
                let mut counter = 2;
                while !used_names.insert(method_name.clone()) {
                    method_name = format!("{}{}", base_name, counter);
                    counter += 1;
                }

                let (params, body) = self.parameters(path_item, operation);
                operations.push(Operation {
                    method_name,
                    http_method: method.to_uppercase(),
                    path: path.clone(),
                    params,
                    body,
                    response: self.response_schema(operation),
                });
            }
        }
        operations
    }

    fn parameters(
        &self,
        path_item: &'a Value,
        operation: &'a Value,
    ) -> (Vec<Parameter<'a>>, Option<Parameter<'a>>) {
        let mut params: Vec<Parameter<'a>> = Vec::new();
        let mut body = None;

        let declared = [operation, path_item]
            .into_iter()
            .filter_map(|owner| owner.get("parameters").and_then(Value::as_array))
            .flatten();
        for raw in declared {
            let param = self.deref(raw);
            let (Some(name), Some(location)) = (
                param.get("name").and_then(Value::as_str),
                param.get("in").and_then(Value::as_str),
            ) else {
                continue;
            };
            if params.iter().any(|p| p.name == name && p.location == location) {
                continue;
            }

            let parameter = Parameter {
                name: name.to_string(),
                ident: to_camel_case(name),
                location: location.to_string(),
                required: location == "path"
                    || param.get("required").and_then(Value::as_bool).unwrap_or(false),
                schema: param.get("schema").unwrap_or(param),
            };
            if location == "body" {
                body.get_or_insert(parameter);
            } else {
                params.push(parameter);
            }
        }

        if body.is_none() {
            if let Some(request) = operation.get("requestBody").map(|b| self.deref(b)) {
                if let Some(schema) = request.get("content").and_then(media_schema) {
                    body = Some(Parameter {
                        name: "body".to_string(),
                        ident: "body".to_string(),
                        location: "body".to_string(),
                        required: request.get("required").and_then(Value::as_bool).unwrap_or(false),
                        schema,
                    });
                }
            }
        }

        (params, body)
    }

    fn response_schema(&self, operation: &'a Value) -> Option<&'a Value> {
        let responses = operation.get("responses")?.as_object()?;
        let response = responses
            .iter()
            .find(|(status, _)| status.starts_with('2'))
            .or_else(|| responses.iter().find(|(status, _)| status.as_str() == "default"))
            .map(|(_, response)| self.deref(response))?;

        response
            .get("content")
            .and_then(media_schema)
            .or_else(|| response.get("schema"))
    }

    fn render_operation(
        &self,
        code: &mut String,
        operation: &Operation<'_>,
        helpers: &mut BTreeSet<HelperRoutine>,
    ) {
        let mut arguments: Vec<&Parameter<'_>> = operation
            .params
            .iter()
            .filter(|p| p.location == "path")
            .chain(operation.body.iter())
            .chain(operation.params.iter().filter(|p| p.location != "path"))
            .collect();
        arguments.sort_by_key(|p| !p.required);

        let signature: Vec<String> = arguments
            .iter()
            .map(|p| {
                let marker = if p.required { "" } else { "?" };
                format!("{}{}: {}", p.ident, marker, self.ts_type(p.schema))
            })
            .collect();
        let return_type = operation
            .response
            .map(|schema| self.ts_type(schema))
            .unwrap_or_else(|| "void".to_string());

        code.push_str(&format!(
            "    async {}({}): Promise<{}> {{\n",
            operation.method_name,
            signature.join(", "),
            return_type
        ));
        code.push_str(&format!(
            "        let url_ = this.baseUrl + {};\n",
            quote(&operation.path)
        ));
        for param in operation.params.iter().filter(|p| p.location == "path") {
            code.push_str(&format!(
                "        url_ = url_.replace({}, encodeURIComponent(\"\" + {}));\n",
                quote(&format!("{{{}}}", param.name)),
                param.ident
            ));
        }

        let query: Vec<&Parameter<'_>> = operation
            .params
            .iter()
            .filter(|p| p.location == "query")
            .collect();
        if !query.is_empty() {
            code.push_str("        const query_ = new URLSearchParams();\n");
            for param in query {
                code.push_str(&format!(
                    "        if ({i} !== undefined && {i} !== null) query_.append({n}, \"\" + {i});\n",
                    i = param.ident,
                    n = quote(&param.name)
                ));
            }
            code.push_str("        if (query_.toString()) url_ += \"?\" + query_.toString();\n");
        }

        code.push_str("        const headers_: Record<string, string> = { \"Accept\": \"application/json\" };\n");
        if operation.body.is_some() {
            code.push_str("        headers_[\"Content-Type\"] = \"application/json\";\n");
        }
        for param in operation.params.iter().filter(|p| p.location == "header") {
            code.push_str(&format!(
                "        if ({i} !== undefined && {i} !== null) headers_[{n}] = \"\" + {i};\n",
                i = param.ident,
                n = quote(&param.name)
            ));
        }

        code.push_str("        const response_ = await this.http.fetch(url_, {\n");
        code.push_str(&format!("            method: {},\n", quote(&operation.http_method)));
        code.push_str("            headers: headers_,\n");
        if let Some(body) = &operation.body {
            code.push_str(&format!("            body: JSON.stringify({}),\n", body.ident));
        }
        code.push_str("        });\n");
        code.push_str("        if (!response_.ok) {\n");
        code.push_str("            throw new Error(\"HTTP \" + response_.status + \" from \" + url_);\n");
        code.push_str("        }\n");

        if let Some(schema) = operation.response {
            code.push_str("        const text_ = await response_.text();\n");
            code.push_str(&format!("        {}\n", self.response_statement(schema, helpers)));
        }
        code.push_str("    }\n");
    }

    fn response_statement(&self, schema: &Value, helpers: &mut BTreeSet<HelperRoutine>) -> String {
        if let Some(pointer) = schema.get(keys::REF).and_then(Value::as_str) {
            let target = self.type_name(pointer);
            if self.is_class(&target) {
                return format!("return {}.fromJSON(text_);", target);
            }
        }

        helpers.insert(HelperRoutine::JsonParse);
        let item_class = (schema_type(schema) == Some("array"))
            .then(|| schema.get("items")?.get(keys::REF)?.as_str())
            .flatten()
            .map(|pointer| self.type_name(pointer))
            .filter(|target| self.is_class(target));
        match item_class {
            Some(target) => format!(
                "return (jsonParse(text_) as any[]).map((item: any) => {}.fromJS(item));",
                target
            ),
            None => "return jsonParse(text_);".to_string(),
        }
    }
}

// =============================================================================
// Schema Inspection
// =============================================================================

fn schema_type(schema: &Value) -> Option<&str> {
    match schema.get("type")? {
        Value::String(ty) => Some(ty.as_str()),
        Value::Array(types) => types
            .iter()
            .filter_map(Value::as_str)
            .find(|ty| *ty != "null"),
        _ => None,
    }
}

fn is_nullable(schema: &Value) -> bool {
    schema.get("nullable").and_then(Value::as_bool).unwrap_or(false)
        || schema
            .get("type")
            .and_then(Value::as_array)
            .is_some_and(|types| types.iter().any(|t| t == "null"))
}

/// Object schemas with their own properties become classes
fn is_class_schema(schema: &Value) -> bool {
    let Some(obj) = schema.as_object() else {
        return false;
    };
    let composed = ["$ref", "enum", "oneOf", "anyOf", "allOf"]
        .iter()
        .any(|key| obj.contains_key(*key));
    if composed {
        return false;
    }
    obj.contains_key("properties")
        || (schema_type(schema) == Some("object") && !obj.contains_key("additionalProperties"))
}

fn properties(obj: &Map<String, Value>) -> impl Iterator<Item = (&String, &Value)> {
    obj.get("properties")
        .and_then(Value::as_object)
        .into_iter()
        .flatten()
}

fn required_set(obj: &Map<String, Value>) -> HashSet<&str> {
    obj.get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

/// Schema of the preferred media type of a `content` map
fn media_schema(content: &Value) -> Option<&Value> {
    let content = content.as_object()?;
    content
        .get("application/json")
        .or_else(|| content.values().next())?
        .get("schema")
}

fn literal_union(values: &[Value]) -> String {
    let literals: Vec<String> = values
        .iter()
        .map(|value| match value {
            Value::Null => "null".to_string(),
            other => other.to_string(),
        })
        .collect();
    if literals.is_empty() {
        "never".to_string()
    } else {
        literals.join(" | ")
    }
}

fn push_description(code: &mut String, schema: &Value, indent: &str) {
    if let Some(description) = schema.get("description").and_then(Value::as_str) {
        let text = description.trim().replace("*/", "*\\/");
        if !text.is_empty() {
            code.push_str(&format!("{}/** {} */\n", indent, text.replace('\n', " ")));
        }
    }
}

fn quote(text: &str) -> String {
    Value::String(text.to_string()).to_string()
}

// =============================================================================
// Naming
// =============================================================================

/// Convert to PascalCase, treating every non-alphanumeric character as a word break
fn to_pascal_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = true;

    for c in s.chars() {
        if !c.is_ascii_alphanumeric() {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}

/// Convert to a camelCase identifier
fn to_camel_case(s: &str) -> String {
    let pascal = to_pascal_case(s);
    let mut chars = pascal.chars();
    let mut result: String = match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => String::new(),
    };
    if result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, '_');
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn petstore() -> Value {
        json!({
            "openapi": "3.0.0",
            "paths": {
                "/pets/{id}": {
                    "parameters": [
                        { "name": "id", "in": "path", "required": true, "schema": { "type": "integer" } }
                    ],
                    "get": {
                        "operationId": "getPet",
                        "parameters": [
                            { "$ref": "#/components/parameters/Trace" },
                            { "name": "fields", "in": "query", "schema": { "type": "string" } }
                        ],
                        "responses": {
                            "200": {
                                "description": "ok",
                                "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Pet" } } }
                            }
                        }
                    },
                    "delete": {
                        "responses": { "204": { "description": "gone" } }
                    }
                },
                "/pets": {
                    "get": {
                        "operationId": "list_pets",
                        "responses": {
                            "200": {
                                "description": "ok",
                                "content": { "application/json": { "schema": {
                                    "type": "array", "items": { "$ref": "#/components/schemas/Pet" }
                                } } }
                            }
                        }
                    },
                    "post": {
                        "operationId": "createPet",
                        "requestBody": {
                            "required": true,
                            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Pet" } } }
                        },
                        "responses": {
                            "201": {
                                "description": "created",
                                "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Kind" } } }
                            }
                        }
                    }
                }
            },
            "components": {
                "parameters": {
                    "Trace": { "name": "X-Trace-Id", "in": "header", "schema": { "type": "string" } }
                },
                "schemas": {
                    "Pet": {
                        "type": "object",
                        "description": "A pet",
                        "required": ["name"],
                        "properties": {
                            "name": { "type": "string" },
                            "born": { "type": "string", "format": "date-time" },
                            "owner": { "$ref": "#/components/schemas/Owner" },
                            "kind": { "$ref": "#/components/schemas/Kind" },
                            "tags": { "type": "array", "items": { "type": "string" }, "nullable": true },
                            "x-rating": { "type": "number" }
                        }
                    },
                    "Owner": {
                        "type": "object",
                        "properties": {
                            "pets": { "type": "array", "items": { "$ref": "#/components/schemas/Pet" } }
                        }
                    },
                    "Kind": { "type": "string", "enum": ["cat", "dog"] }
                }
            }
        })
    }

    fn artifact<'a>(generated: &'a GeneratedCode, name: &str) -> &'a CodeArtifact {
        generated
            .types
            .iter()
            .find(|a| a.type_name == name)
            .unwrap()
    }

    #[test]
    fn test_to_pascal_case() {
        assert_eq!(to_pascal_case("tenant_id"), "TenantId");
        assert_eq!(to_pascal_case("/pets/{id}"), "PetsId");
    }

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("list_pets"), "listPets");
        assert_eq!(to_camel_case("getPetById"), "getPetById");
        assert_eq!(to_camel_case("X-Trace-Id"), "xTraceId");
        assert_eq!(to_camel_case("2fa"), "_2fa");
    }

    #[test]
    fn test_classes_and_aliases() {
        let generator = TypeScriptGenerator::new("PetsClient", "jsonParse");
        let generated = generator.generate(&petstore()).unwrap();

        let pet = artifact(&generated, "Pet");
        assert_eq!(pet.kind, ArtifactKind::Class);
        assert!(pet.code.starts_with("/** A pet */\nexport class Pet {"));
        assert!(pet.code.contains("    name!: string;"));
        assert!(pet.code.contains("    born?: Date;"));
        assert!(pet.code.contains("    owner?: Owner;"));
        assert!(pet.code.contains("    tags?: string[] | null;"));
        assert!(pet.code.contains("    \"x-rating\"?: number;"));
        assert!(pet.code.contains("if (data?.owner) result.owner = Owner.fromJS(data.owner);"));
        assert!(pet.code.contains("static fromJSON(json: string): Pet"));
        assert_eq!(
            pet.helpers,
            BTreeSet::from([HelperRoutine::JsonParse, HelperRoutine::CreateInstance])
        );

        let owner = artifact(&generated, "Owner");
        assert!(owner.code.contains("data.pets.map((item: any) => Pet.fromJS(item))"));
        assert!(!owner.code.contains("fromJSON"));
        assert_eq!(owner.helpers, BTreeSet::from([HelperRoutine::CreateInstance]));

        let kind = artifact(&generated, "Kind");
        assert_eq!(kind.kind, ArtifactKind::Alias);
        assert_eq!(kind.code, "export type Kind = \"cat\" | \"dog\";\n");
        assert!(kind.helpers.is_empty());

        let helpers = generated.helpers_artifact().unwrap();
        assert_eq!(helpers.type_name, "jsonParse");
        assert!(helpers.code.contains("export function createInstance"));
    }

    #[test]
    fn test_client_methods() {
        let generator = TypeScriptGenerator::new("PetsClient", "jsonParse");
        let generated = generator.generate(&petstore()).unwrap();
        let client = &generated.client;

        assert!(client.starts_with("export class PetsClient {"));
        assert!(client.contains("async getPet(id: number, xTraceId?: string, fields?: string): Promise<Pet>"));
        assert!(client.contains("url_ = url_.replace(\"{id}\", encodeURIComponent(\"\" + id));"));
        assert!(client.contains("query_.append(\"fields\", \"\" + fields)"));
        assert!(client.contains("headers_[\"X-Trace-Id\"] = \"\" + xTraceId;"));
        assert!(client.contains("return Pet.fromJSON(text_);"));
        assert!(client.contains("async deletePetsId(id: number): Promise<void>"));
        assert!(client.contains("async listPets(): Promise<Pet[]>"));
        assert!(client.contains("async createPet(body: Pet): Promise<Kind>"));
        assert!(client.contains("body: JSON.stringify(body),"));

        assert_eq!(generated.client_types, vec!["Pet", "Kind"]);
        assert_eq!(generated.client_helpers, BTreeSet::from([HelperRoutine::JsonParse]));
    }

    #[test]
    fn test_swagger_body_and_definitions() {
        let document = json!({
            "swagger": "2.0",
            "paths": {
                "/api/nodes": {
                    "post": {
                        "operationId": "addNode",
                        "parameters": [
                            { "name": "node", "in": "body", "required": true, "schema": { "$ref": "#/definitions/Node" } }
                        ],
                        "responses": { "200": { "description": "ok", "schema": { "$ref": "#/definitions/Node" } } }
                    }
                }
            },
            "definitions": {
                "Node": {
                    "type": "object",
                    "properties": { "next": { "$ref": "#/definitions/Node" } }
                }
            }
        });
        let generated = TypeScriptGenerator::new("NodesClient", "jsonParse")
            .generate(&document)
            .unwrap();

        assert!(generated.client.contains("async addNode(node: Node): Promise<Node>"));
        assert!(generated.client.contains("body: JSON.stringify(node),"));
        let node = artifact(&generated, "Node");
        assert!(node.code.contains("if (data?.next) result.next = Node.fromJS(data.next);"));
    }

    #[test]
    fn test_composition_types() {
        let document = json!({
            "openapi": "3.0.0",
            "components": { "schemas": {
                "Shape": {
                    "oneOf": [
                        { "$ref": "#/components/schemas/Circle" },
                        { "$ref": "#/components/schemas/Square" }
                    ],
                    "discriminator": { "propertyName": "kind" }
                },
                "Circle": { "type": "object", "properties": { "r": { "type": "number" } } },
                "Square": { "type": "object", "properties": { "side": { "type": "integer" } } },
                "Labels": { "type": "object", "additionalProperties": { "type": "string" } }
            } }
        });
        let generated = TypeScriptGenerator::new("Client", "jsonParse")
            .generate(&document)
            .unwrap();

        assert_eq!(
            artifact(&generated, "Shape").code,
            "export type Shape = Circle | Square;\n"
        );
        assert_eq!(
            artifact(&generated, "Labels").code,
            "export type Labels = { [key: string]: string };\n"
        );
        assert_eq!(artifact(&generated, "Circle").kind, ArtifactKind::Class);
    }

    #[test]
    fn test_no_helpers_without_classes() {
        let document = json!({
            "openapi": "3.0.0",
            "components": { "schemas": { "Kind": { "type": "string", "enum": ["a"] } } }
        });
        let generated = TypeScriptGenerator::new("Client", "jsonParse")
            .generate(&document)
            .unwrap();
        assert!(generated.helpers_artifact().is_none());
        assert_eq!(generated.types.len(), 1);
        assert!(generated.client_types.is_empty());
    }

    #[test]
    fn test_duplicate_method_names() {
        let document = json!({
            "openapi": "3.0.0",
            "paths": {
                "/a": { "get": { "operationId": "fetch", "responses": {} } },
                "/b": { "get": { "operationId": "fetch", "responses": {} } }
            }
        });
        let generated = TypeScriptGenerator::new("Client", "jsonParse")
            .generate(&document)
            .unwrap();
        assert!(generated.client.contains("async fetch(): Promise<void>"));
        assert!(generated.client.contains("async fetch2(): Promise<void>"));
    }
}
