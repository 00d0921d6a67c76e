//! Reference Pointer Resolution
//!
//! Resolves local `#/a/b/c` pointers against a parsed document tree.

use serde_json::Value;

/// Resolve a local reference pointer against the document root.
///
/// Returns the last path segment (the candidate type name) together with the
/// node it points at. External references, empty pointers and lookup misses
/// all yield `None`; callers treat that as "no dependency".
pub fn resolve_pointer<'a>(root: &'a Value, pointer: &str) -> Option<(String, &'a Value)> {
    let segments = pointer_segments(pointer)?;

    let mut node = root;
    for segment in &segments {
        node = match node {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    segments.last().map(|k| (k.clone(), node))
}

/// Normalized spelling of a local pointer, so that `#components/schemas/A`
/// and `#/components/schemas/A` address the same node under one key.
pub fn canonical_pointer(pointer: &str) -> Option<String> {
    pointer_segments(pointer).map(build_pointer)
}

/// Build a local pointer from path segments (the inverse of [`resolve_pointer`]).
pub fn build_pointer<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut pointer = String::from("#");
    for segment in segments {
        pointer.push('/');
        pointer.push_str(&segment.as_ref().replace('~', "~0").replace('/', "~1"));
    }
    pointer
}

fn pointer_segments(pointer: &str) -> Option<Vec<String>> {
    let path = pointer.strip_prefix('#')?;
    let path = path.strip_prefix('/').unwrap_or(path);
    if path.is_empty() {
        return None;
    }
    Some(path.split('/').map(unescape_segment).collect())
}

fn unescape_segment(raw: &str) -> String {
    if raw.contains('~') {
        raw.replace("~1", "/").replace("~0", "~")
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Value {
        json!({
            "components": {
                "schemas": {
                    "Pet": { "type": "object" },
                    "a/b": { "type": "string" }
                }
            },
            "tags": [ { "name": "pets" } ]
        })
    }

    #[test]
    fn test_resolve_schema_pointer() {
        let doc = doc();
        let (name, node) = resolve_pointer(&doc, "#/components/schemas/Pet").unwrap();
        assert_eq!(name, "Pet");
        assert_eq!(node, &json!({ "type": "object" }));
    }

    #[test]
    fn test_resolve_missing_segment() {
        let doc = doc();
        assert!(resolve_pointer(&doc, "#/components/schemas/Owner").is_none());
        assert!(resolve_pointer(&doc, "#/definitions/Pet").is_none());
    }

    #[test]
    fn test_resolve_array_index() {
        let doc = doc();
        let (name, node) = resolve_pointer(&doc, "#/tags/0").unwrap();
        assert_eq!(name, "0");
        assert_eq!(node["name"], "pets");
        assert!(resolve_pointer(&doc, "#/tags/7").is_none());
    }

    #[test]
    fn test_external_and_empty_pointers() {
        let doc = doc();
        assert!(resolve_pointer(&doc, "other.json#/components/schemas/Pet").is_none());
        assert!(resolve_pointer(&doc, "#").is_none());
        assert!(resolve_pointer(&doc, "#/").is_none());
    }

    #[test]
    fn test_escaped_segments() {
        let doc = doc();
        let pointer = build_pointer(["components", "schemas", "a/b"]);
        assert_eq!(pointer, "#/components/schemas/a~1b");
        let (name, _) = resolve_pointer(&doc, &pointer).unwrap();
        assert_eq!(name, "a/b");
    }

    #[test]
    fn test_canonical_pointer() {
        assert_eq!(
            canonical_pointer("#components/schemas/Pet").as_deref(),
            Some("#/components/schemas/Pet")
        );
        assert_eq!(
            canonical_pointer("#/components/schemas/a~1b").as_deref(),
            Some("#/components/schemas/a~1b")
        );
        assert!(canonical_pointer("other.json#/Pet").is_none());
        assert!(canonical_pointer("#/").is_none());
    }
}
