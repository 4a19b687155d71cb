//! Flat (`{"a.b": "v"}`) and nested (`{"a": {"b": "v"}}`) JSON documents.

use serde_json::{
    Map,
    Value,
};

use super::ConvertError;

/// Separator joining nested key segments into a flat key.
pub const KEY_SEPARATOR: &str = ".";

/// A single-level document whose keys are dotted paths.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FlatDocument(Map<String, Value>);

/// A hierarchical document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NestedDocument(Map<String, Value>);

/// A JSON object root tagged with its detected shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonDocument {
    Flat(FlatDocument),
    Nested(NestedDocument),
}

/// A document is flat when any top-level key contains the separator.
#[must_use]
pub fn is_flat_object(map: &Map<String, Value>) -> bool {
    map.keys().any(|key| key.contains(KEY_SEPARATOR))
}

/// JSON type name used in error messages.
const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl JsonDocument {
    #[must_use]
    pub fn detect(map: Map<String, Value>) -> Self {
        if is_flat_object(&map) {
            Self::Flat(FlatDocument(map))
        } else {
            Self::Nested(NestedDocument(map))
        }
    }

    /// # Errors
    /// Returns `NotAnObject` unless the root is a JSON object.
    pub fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::Object(map) => Ok(Self::detect(map)),
            other => Err(ConvertError::NotAnObject(kind_of(&other))),
        }
    }

    /// Returns the flat form, flattening nested documents.
    #[must_use]
    pub fn into_flat(self) -> FlatDocument {
        match self {
            Self::Flat(flat) => flat,
            Self::Nested(nested) => nested.flatten(),
        }
    }
}

impl FlatDocument {
    #[must_use]
    pub const fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Splits every key on `.` and rebuilds the object tree.
    ///
    /// A scalar sitting where a later key needs an intermediate object is
    /// replaced by that object.
    #[must_use]
    pub fn unflatten(&self) -> NestedDocument {
        let mut root = Map::new();
        for (key, value) in &self.0 {
            let path: Vec<&str> = key.split(KEY_SEPARATOR).collect();
            insert_path(&mut root, &path, value.clone());
        }
        NestedDocument(root)
    }
}

/// Inserts `value` at the dotted `path`, creating intermediate objects.
fn insert_path(root: &mut Map<String, Value>, path: &[&str], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };

    let mut current = root;
    for part in parents {
        let slot = current.entry((*part).to_string()).or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            tracing::debug!(key = %part, "Replacing scalar with object while unflattening");
            *slot = Value::Object(Map::new());
        }
        let Value::Object(child) = slot else {
            return;
        };
        current = child;
    }
    current.insert((*last).to_string(), value);
}

impl NestedDocument {
    #[must_use]
    pub const fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Collapses the tree into dotted keys. Arrays and `null` are kept as leaves.
    #[must_use]
    pub fn flatten(&self) -> FlatDocument {
        let mut result = Map::new();
        flatten_object(&self.0, None, &mut result);
        FlatDocument(result)
    }
}

/// Recursively collects leaves of `map` under dotted keys.
fn flatten_object(map: &Map<String, Value>, prefix: Option<&str>, result: &mut Map<String, Value>) {
    for (key, value) in map {
        let full_key = prefix.map_or_else(|| key.clone(), |p| format!("{p}{KEY_SEPARATOR}{key}"));
        match value {
            Value::Object(child) => flatten_object(child, Some(&full_key), result),
            leaf => {
                result.insert(full_key, leaf.clone());
            }
        }
    }
}
