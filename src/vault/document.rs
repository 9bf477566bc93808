//! The in-memory secrets document and dotted-path addressing.
//!
//! A document is an ordered mapping of string keys to JSON-like values.
//! Paths such as `app.secret-key` walk into nested mappings; a numeric
//! segment indexes into a sequence (`servers.0.host`), and `\.` keeps a
//! literal dot inside a segment (`hosts.example\.com`).
//!
//! Documents parsed from TOML also carry the parsed layout so that
//! comments and formatting survive a save (see `toml_layout`).

use serde_json::{Map, Value};
use toml_edit::DocumentMut;

use crate::errors::{Result, VaultError};

/// An ordered mapping of secrets.
#[derive(Debug, Clone, Default)]
pub struct SecretsDocument {
    values: Map<String, Value>,
    layout: Option<DocumentMut>,
}

/// Equality looks at values only: comments, formatting and key order
/// are presentation.
impl PartialEq for SecretsDocument {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl SecretsDocument {
    /// An empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing mapping.
    pub fn from_map(values: Map<String, Value>) -> Self {
        Self {
            values,
            layout: None,
        }
    }

    pub(crate) fn with_layout(values: Map<String, Value>, layout: DocumentMut) -> Self {
        Self {
            values,
            layout: Some(layout),
        }
    }

    pub(crate) fn layout(&self) -> Option<&DocumentMut> {
        self.layout.as_ref()
    }

    /// The top-level mapping.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Consume the document, returning the top-level mapping.
    pub fn into_map(self) -> Map<String, Value> {
        self.values
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the document has no entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Look up a dotted path.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let segments = split_path(path);
        let (first, rest) = segments.split_first()?;
        let mut node = self.values.get(first.as_str())?;
        for segment in rest {
            node = child(node, segment)?;
        }
        Some(node)
    }

    /// Set the value at a dotted path, creating mappings along the way.
    ///
    /// A scalar sitting where a mapping is needed is replaced.  Sequences
    /// are indexed by numeric segments; an index equal to the length
    /// appends.
    pub fn set(&mut self, path: &str, value: Value) -> Result<()> {
        let segments = split_path(path);
        let Some((first, rest)) = segments.split_first() else {
            return Err(VaultError::InvalidKeyPath(path.to_string()));
        };
        let Some((last, middle)) = rest.split_last() else {
            self.values.insert(first.clone(), value);
            return Ok(());
        };

        let mut node = self
            .values
            .entry(first.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        ensure_container(node);

        for segment in middle {
            node = child_or_create(node, segment, path)?;
            ensure_container(node);
        }

        match node {
            Value::Object(map) => {
                map.insert(last.clone(), value);
            }
            Value::Array(items) => {
                let index = parse_index(last, items.len() + 1)
                    .ok_or_else(|| VaultError::InvalidKeyPath(path.to_string()))?;
                if index == items.len() {
                    items.push(value);
                } else {
                    items[index] = value;
                }
            }
            _ => return Err(VaultError::InvalidKeyPath(path.to_string())),
        }
        Ok(())
    }

    /// Remove the value at a dotted path, returning it if it existed.
    pub fn remove(&mut self, path: &str) -> Option<Value> {
        let segments = split_path(path);
        let (last, parents) = segments.split_last()?;

        let Some((first, rest)) = parents.split_first() else {
            return self.values.shift_remove(last.as_str());
        };

        let mut node = self.values.get_mut(first.as_str())?;
        for segment in rest {
            node = child_mut(node, segment)?;
        }

        match node {
            Value::Object(map) => map.shift_remove(last.as_str()),
            Value::Array(items) => {
                let index = parse_index(last, items.len())?;
                Some(items.remove(index))
            }
            _ => None,
        }
    }
}

/// Split a dotted path into segments, honouring `\.` escapes.
fn split_path(path: &str) -> Vec<String> {
    if path.is_empty() {
        return Vec::new();
    }

    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'.') => {
                current.push('.');
                chars.next();
            }
            '.' => segments.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    segments.push(current);
    segments
}

/// Parse `segment` as a sequence index below `bound`.
fn parse_index(segment: &str, bound: usize) -> Option<usize> {
    segment.parse::<usize>().ok().filter(|i| *i < bound)
}

fn child<'a>(node: &'a Value, segment: &str) -> Option<&'a Value> {
    match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => items.get(parse_index(segment, items.len())?),
        _ => None,
    }
}

fn child_mut<'a>(node: &'a mut Value, segment: &str) -> Option<&'a mut Value> {
    match node {
        Value::Object(map) => map.get_mut(segment),
        Value::Array(items) => {
            let index = parse_index(segment, items.len())?;
            items.get_mut(index)
        }
        _ => None,
    }
}

/// Replace a scalar with an empty mapping so `set` can descend into it.
fn ensure_container(node: &mut Value) {
    if !node.is_object() && !node.is_array() {
        *node = Value::Object(Map::new());
    }
}

/// Descend one level for `set`, creating a mapping entry if needed.
fn child_or_create<'a>(node: &'a mut Value, segment: &str, path: &str) -> Result<&'a mut Value> {
    match node {
        Value::Object(map) => Ok(map
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()))),
        Value::Array(items) => {
            let index = parse_index(segment, items.len() + 1)
                .ok_or_else(|| VaultError::InvalidKeyPath(path.to_string()))?;
            if index == items.len() {
                items.push(Value::Object(Map::new()));
            }
            Ok(&mut items[index])
        }
        _ => Err(VaultError::InvalidKeyPath(path.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> SecretsDocument {
        match value {
            Value::Object(map) => SecretsDocument::from_map(map),
            _ => panic!("test documents must be objects"),
        }
    }

    #[test]
    fn split_path_handles_escapes() {
        assert_eq!(split_path("a.b.c"), vec!["a", "b", "c"]);
        assert_eq!(split_path("hosts.example\\.com"), vec!["hosts", "example.com"]);
        assert_eq!(split_path("plain"), vec!["plain"]);
        assert!(split_path("").is_empty());
    }

    #[test]
    fn get_nested_path() {
        let d = doc(json!({"app": {"secret-key": "abc123"}}));
        assert_eq!(d.get("app.secret-key"), Some(&json!("abc123")));
        assert_eq!(d.get("app"), Some(&json!({"secret-key": "abc123"})));
        assert_eq!(d.get("app.missing"), None);
        assert_eq!(d.get("missing.deeper"), None);
        assert_eq!(d.get(""), None);
    }

    #[test]
    fn get_indexes_into_sequences() {
        let d = doc(json!({"servers": [{"host": "a"}, {"host": "b"}]}));
        assert_eq!(d.get("servers.1.host"), Some(&json!("b")));
        assert_eq!(d.get("servers.2.host"), None);
        assert_eq!(d.get("servers.x"), None);
    }

    #[test]
    fn set_creates_intermediate_mappings() {
        let mut d = SecretsDocument::new();
        d.set("app.db.password", json!("hunter2")).unwrap();
        assert_eq!(d.get("app.db.password"), Some(&json!("hunter2")));
        assert_eq!(d.as_map()["app"], json!({"db": {"password": "hunter2"}}));
    }

    #[test]
    fn set_overwrites_existing_value() {
        let mut d = doc(json!({"a": {"b": 1}}));
        d.set("a.b", json!(2)).unwrap();
        assert_eq!(d.get("a.b"), Some(&json!(2)));
    }

    #[test]
    fn set_replaces_scalar_in_the_way() {
        let mut d = doc(json!({"a": "scalar"}));
        d.set("a.b", json!(true)).unwrap();
        assert_eq!(d.get("a"), Some(&json!({"b": true})));
    }

    #[test]
    fn set_into_sequence() {
        let mut d = doc(json!({"list": [1, 2]}));
        d.set("list.0", json!(10)).unwrap();
        d.set("list.2", json!(30)).unwrap();
        assert_eq!(d.get("list"), Some(&json!([10, 2, 30])));

        let err = d.set("list.9", json!(0)).unwrap_err();
        assert!(matches!(err, VaultError::InvalidKeyPath(_)));
    }

    #[test]
    fn set_rejects_empty_path() {
        let mut d = SecretsDocument::new();
        assert!(matches!(
            d.set("", json!(1)),
            Err(VaultError::InvalidKeyPath(_))
        ));
    }

    #[test]
    fn set_keeps_key_order() {
        let mut d = SecretsDocument::new();
        d.set("zeta", json!(1)).unwrap();
        d.set("alpha", json!(2)).unwrap();
        d.set("zeta", json!(3)).unwrap();
        let keys: Vec<&String> = d.as_map().keys().collect();
        assert_eq!(keys, ["zeta", "alpha"]);
    }

    #[test]
    fn remove_nested_and_missing() {
        let mut d = doc(json!({"a": {"b": 1, "c": 2}, "d": [1, 2, 3]}));
        assert_eq!(d.remove("a.b"), Some(json!(1)));
        assert_eq!(d.get("a"), Some(&json!({"c": 2})));
        assert_eq!(d.remove("a.b"), None);
        assert_eq!(d.remove("nope.nothing"), None);
        assert_eq!(d.remove("d.1"), Some(json!(2)));
        assert_eq!(d.get("d"), Some(&json!([1, 3])));
    }

    #[test]
    fn remove_top_level_preserves_order_of_rest() {
        let mut d = doc(json!({"a": 1, "b": 2, "c": 3}));
        d.remove("a");
        let keys: Vec<&String> = d.as_map().keys().collect();
        assert_eq!(keys, ["b", "c"]);
    }

    #[test]
    fn equality_ignores_key_order() {
        let a = doc(json!({"x": 1, "y": 2}));
        let b = doc(json!({"y": 2, "x": 1}));
        assert_eq!(a, b);
    }
}
