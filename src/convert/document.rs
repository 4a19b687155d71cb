//! Conversion of plain key/value JSON into translation entries and back.

use serde_json::{
    Map,
    Value,
};

use super::ConvertError;
use super::shape::{
    FlatDocument,
    JsonDocument,
    KEY_SEPARATOR,
};
use crate::types::TranslationEntry;

/// Translation entries extracted from a JSON document.
///
/// Every string leaf becomes one [`TranslationEntry`]; other leaves (numbers,
/// booleans, arrays, `null`) are kept aside untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TranslationDocument {
    entries: Vec<TranslationEntry>,
    passthrough: Map<String, Value>,
}

impl TranslationDocument {
    /// # Errors
    /// Returns `NotAnObject` unless the root is a JSON object.
    pub fn from_value(value: Value) -> Result<Self, ConvertError> {
        Ok(Self::from_document(JsonDocument::from_value(value)?))
    }

    #[must_use]
    pub fn from_document(document: JsonDocument) -> Self {
        let flat = document.into_flat();
        let mut result = Self::default();
        for (key, value) in flat.as_map() {
            result.collect(key, value);
        }
        result
    }

    /// Depth-first walk; objects left inside an already-flat document are
    /// expanded under their dotted prefix.
    fn collect(&mut self, key: &str, value: &Value) {
        match value {
            Value::String(text) => {
                self.entries.push(TranslationEntry::new(key, text.as_str(), text.as_str(), Vec::new()));
            }
            Value::Object(children) => {
                for (child_key, child) in children {
                    self.collect(&format!("{key}{KEY_SEPARATOR}{child_key}"), child);
                }
            }
            other => {
                self.passthrough.insert(key.to_string(), other.clone());
            }
        }
    }

    /// All entries, in document order.
    #[must_use]
    pub fn entries(&self) -> &[TranslationEntry] {
        &self.entries
    }

    #[must_use]
    pub fn into_entries(self) -> Vec<TranslationEntry> {
        self.entries
    }

    /// Non-string leaves, keyed by their dotted path.
    #[must_use]
    pub const fn passthrough(&self) -> &Map<String, Value> {
        &self.passthrough
    }
}

impl FlatDocument {
    /// Builds `{"key": "value"}` from entries, keeping entry order.
    #[must_use]
    pub fn from_entries(entries: &[TranslationEntry]) -> Self {
        let map = entries
            .iter()
            .map(|entry| (entry.key.clone(), Value::String(entry.value.clone())))
            .collect();
        Self::new(map)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn keys(document: &TranslationDocument) -> Vec<String> {
        document.entries().iter().map(|entry| entry.key.clone()).collect()
    }

    #[rstest]
    fn nested_document_becomes_dotted_entries() {
        let document = TranslationDocument::from_value(json!({
            "common": { "hello": "Hello", "bye": "Bye" },
            "title": "Title"
        }))
        .unwrap();

        assert_that!(keys(&document), elements_are![eq("common.hello"), eq("common.bye"), eq("title")]);
        let hello = &document.entries()[0];
        assert_that!(hello.value, eq("Hello"));
        assert_that!(hello.description, eq("Hello"));
        assert_that!(hello.tags, is_empty());
        assert_that!(hello.id, not(eq("")));
    }

    #[rstest]
    fn flat_document_keeps_keys() {
        let document =
            TranslationDocument::from_value(json!({ "a.b": "one", "c": "two" })).unwrap();

        assert_that!(keys(&document), elements_are![eq("a.b"), eq("c")]);
    }

    #[rstest]
    fn non_string_leaves_pass_through() {
        let document = TranslationDocument::from_value(json!({
            "count": 3,
            "enabled": true,
            "list": ["x"],
            "nested": { "label": "Label", "max": 10 }
        }))
        .unwrap();

        assert_that!(keys(&document), elements_are![eq("nested.label")]);
        assert_that!(document.passthrough().len(), eq(4));
        assert_that!(document.passthrough().get("nested.max"), some(eq(&json!(10))));
    }

    #[rstest]
    fn order_is_stable_across_runs() {
        let input = json!({ "z": "1", "a": { "m": "2", "b": "3" } });

        let first = TranslationDocument::from_value(input.clone()).unwrap();
        let second = TranslationDocument::from_value(input).unwrap();

        assert_that!(keys(&first), eq(&keys(&second)));
        assert_that!(keys(&first), elements_are![eq("z"), eq("a.m"), eq("a.b")]);
    }

    #[rstest]
    fn entry_ids_are_unique() {
        let document = TranslationDocument::from_value(json!({ "a": "1", "b": "2" })).unwrap();

        assert_that!(document.entries()[0].id, not(eq(&document.entries()[1].id)));
    }

    #[rstest]
    fn flat_document_from_entries_keeps_order() {
        let entries = vec![
            TranslationEntry::new("b.x", "1", "", Vec::new()),
            TranslationEntry::new("a", "", "", Vec::new()),
        ];

        let flat = FlatDocument::from_entries(&entries);

        let keys: Vec<String> = flat.as_map().keys().cloned().collect();
        assert_that!(keys, elements_are![eq("b.x"), eq("a")]);
        assert_that!(flat.as_map().get("a"), some(eq(&json!(""))));
    }
}
