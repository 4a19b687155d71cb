//! Core data model shared by the project aggregate, the converters and storage.

use chrono::{
    DateTime,
    Utc,
};
use rand::seq::SliceRandom;
use serde::{
    Deserialize,
    Deserializer,
    Serialize,
};

/// Alphabet of generated tokens (entry ids, slug prefixes).
const TOKEN_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of generated tokens.
const TOKEN_LENGTH: usize = 9;

/// Generates a short random base-36 token.
#[must_use]
pub fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    (0..TOKEN_LENGTH)
        .filter_map(|_| TOKEN_ALPHABET.choose(&mut rng).copied().map(char::from))
        .collect()
}

/// Treats a JSON `null` like a missing string.
fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A language configured on a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    pub code: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<String>,
    /// Culture identifier used by `{culture}` path placeholders (e.g. `en-US`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub culture: Option<String>,
    #[serde(default)]
    pub is_custom: bool,
    #[serde(default)]
    pub base: bool,
}

impl Language {
    #[must_use]
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            flag: None,
            culture: None,
            is_custom: false,
            base: false,
        }
    }

    #[must_use]
    pub fn base(mut self) -> Self {
        self.base = true;
        self
    }

    #[must_use]
    pub fn with_culture(mut self, culture: impl Into<String>) -> Self {
        self.culture = Some(culture.into());
        self
    }

    /// Culture identifier, falling back to the language code.
    #[must_use]
    pub fn culture_or_code(&self) -> &str {
        self.culture.as_deref().unwrap_or(&self.code)
    }

    /// Human readable name, falling back to the language code.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() { &self.code } else { &self.name }
    }
}

/// Makes exactly one language the base language.
///
/// The first language flagged `base` keeps the flag; when none is flagged the
/// first language is promoted.
pub fn ensure_single_base(languages: &mut [Language]) {
    let base_index = languages.iter().position(|language| language.base).unwrap_or(0);
    for (index, language) in languages.iter_mut().enumerate() {
        language.base = index == base_index;
    }
}

/// A single translated key in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationEntry {
    pub id: String,
    pub key: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub value: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl TranslationEntry {
    /// Creates an entry with a freshly generated id.
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        value: impl Into<String>,
        description: impl Into<String>,
        tags: Vec<String>,
    ) -> Self {
        Self {
            id: generate_token(),
            key: key.into(),
            value: value.into(),
            description: description.into(),
            tags,
        }
    }

    /// An empty value counts as untranslated.
    #[must_use]
    pub const fn is_untranslated(&self) -> bool {
        self.value.is_empty()
    }

    /// Copy of this entry with its value cleared.
    #[must_use]
    pub fn blank(&self) -> Self {
        Self { value: String::new(), ..self.clone() }
    }
}

/// All entries of one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageTranslation {
    pub language: Language,
    #[serde(default)]
    pub data: Vec<TranslationEntry>,
}

impl LanguageTranslation {
    #[must_use]
    pub const fn new(language: Language, data: Vec<TranslationEntry>) -> Self {
        Self { language, data }
    }

    #[must_use]
    pub fn find(&self, key: &str) -> Option<&TranslationEntry> {
        self.data.iter().find(|entry| entry.key == key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.iter().any(|entry| entry.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.iter().map(|entry| entry.key.as_str())
    }
}

/// Project archetype, which determines the default export path template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    React,
    Vuejs,
    Angular,
    Nextjs,
    #[default]
    Custom,
}

impl ProjectType {
    /// Export path template used by this archetype. Custom projects supply their own.
    #[must_use]
    pub const fn structure_template(self) -> &'static str {
        match self {
            Self::Angular => "/i18n/{lang}.json",
            Self::Vuejs => "/locales/{lang}.json",
            Self::React | Self::Nextjs => "/locales/{lang}/common.json",
            Self::Custom => "",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::React => "React",
            Self::Vuejs => "Vue.js",
            Self::Angular => "Angular",
            Self::Nextjs => "Next.js",
            Self::Custom => "Custom",
        }
    }
}

/// Shape of the exported per-language JSON files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectStructureType {
    /// `{"a.b": "v"}`
    #[default]
    Flated,
    /// `{"a": {"b": "v"}}`
    Nested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Completed,
    Missing,
}

/// Last key edit bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStats {
    #[serde(default, deserialize_with = "nullable_string")]
    pub last_edited_key: String,
    #[serde(default = "Utc::now")]
    pub last_edited_key_at: DateTime<Utc>,
}

impl Default for ProjectStats {
    fn default() -> Self {
        Self { last_edited_key: String::new(), last_edited_key_at: Utc::now() }
    }
}

impl ProjectStats {
    pub fn touch(&mut self, key: &str) {
        key.clone_into(&mut self.last_edited_key);
        self.last_edited_key_at = Utc::now();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    fn languages(flags: &[bool]) -> Vec<Language> {
        flags
            .iter()
            .enumerate()
            .map(|(index, flag)| Language { base: *flag, ..Language::new(format!("l{index}"), "") })
            .collect()
    }

    #[rstest]
    #[case::none_flagged(&[false, false, false], 0)]
    #[case::single_flag(&[false, true, false], 1)]
    #[case::many_flags(&[false, true, true], 1)]
    #[case::all_flagged(&[true, true, true], 0)]
    #[case::single_language(&[false], 0)]
    fn ensure_single_base_leaves_exactly_one(#[case] flags: &[bool], #[case] expected: usize) {
        let mut langs = languages(flags);

        ensure_single_base(&mut langs);

        assert_that!(langs.iter().filter(|l| l.base).count(), eq(1));
        assert_that!(langs[expected].base, eq(true));
    }

    #[rstest]
    fn ensure_single_base_accepts_empty_slice() {
        let mut langs: Vec<Language> = Vec::new();
        ensure_single_base(&mut langs);
        assert_that!(langs, is_empty());
    }

    #[rstest]
    fn generate_token_is_base36() {
        let token = generate_token();

        assert_that!(token.len(), eq(TOKEN_LENGTH));
        assert!(token.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[rstest]
    fn culture_falls_back_to_code() {
        let plain = Language::new("fr", "French");
        let cultured = Language::new("fr", "French").with_culture("fr-CA");

        assert_that!(plain.culture_or_code(), eq("fr"));
        assert_that!(cultured.culture_or_code(), eq("fr-CA"));
    }

    #[rstest]
    #[case::react(ProjectType::React, "/locales/{lang}/common.json")]
    #[case::nextjs(ProjectType::Nextjs, "/locales/{lang}/common.json")]
    #[case::vuejs(ProjectType::Vuejs, "/locales/{lang}.json")]
    #[case::angular(ProjectType::Angular, "/i18n/{lang}.json")]
    #[case::custom(ProjectType::Custom, "")]
    fn structure_template_per_type(#[case] project_type: ProjectType, #[case] expected: &str) {
        assert_that!(project_type.structure_template(), eq(expected));
    }

    #[rstest]
    fn entry_deserializes_null_value_as_empty() {
        let json = r#"{"id": "1", "key": "hello", "value": null, "description": null}"#;

        let entry: TranslationEntry = serde_json::from_str(json).unwrap();

        assert_that!(entry.is_untranslated(), eq(true));
        assert_that!(entry.tags, is_empty());
    }

    #[rstest]
    fn enums_use_lowercase_names() {
        assert_that!(serde_json::to_string(&ProjectType::Vuejs).unwrap(), eq("\"vuejs\""));
        assert_that!(
            serde_json::to_string(&ObjectStructureType::Flated).unwrap(),
            eq("\"flated\"")
        );
        assert_that!(serde_json::to_string(&ProjectStatus::Missing).unwrap(), eq("\"missing\""));
    }
}
