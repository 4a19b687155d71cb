//! Keeps every configured language keyed identically to the base language.

use std::collections::HashSet;

use serde_json::json;

use super::Project;
use crate::convert::TranslationDocument;
use crate::types::{
    LanguageTranslation,
    TranslationEntry,
};

/// Seed of a base language that has no data at all.
fn placeholder_entries() -> Vec<TranslationEntry> {
    TranslationDocument::from_value(json!({ "hello": "Hello World, it's Local Localizator!" }))
        .map(TranslationDocument::into_entries)
        .unwrap_or_default()
}

impl Project {
    /// Full reconciliation pass, run after construction and before every save.
    pub fn reconcile(&mut self) {
        self.create_translation_object();
        self.check_all_languages_exist();
        self.sync_keys_with_base();
        self.refresh_language_records();
    }

    /// Seeds missing entry lists.
    ///
    /// A base language without entries takes a blank copy of the first
    /// configured language that has some, and the placeholder key only when
    /// no language has data. Every other missing language gets a blank copy
    /// of the base list. Existing non-empty lists are not touched.
    pub fn create_translation_object(&mut self) {
        let Some(base) = self.base_language().cloned() else {
            return;
        };
        let base_has_entries =
            self.translation.get(&base.code).is_some_and(|translation| !translation.data.is_empty());
        if !base_has_entries {
            let seed = self.donor_entries(&base.code);
            match seed {
                Some((donor, entries)) => {
                    tracing::debug!(language = %base.code, from = %donor, "Seeding base language from existing keys");
                    self.translation
                        .insert(base.code.clone(), LanguageTranslation::new(base.clone(), entries));
                }
                None => {
                    self.translation.entry(base.code.clone()).or_insert_with(|| {
                        tracing::debug!(language = %base.code, "Seeding base language with placeholder");
                        LanguageTranslation::new(base.clone(), placeholder_entries())
                    });
                }
            }
        }
        let base_entries =
            self.translation.get(&base.code).map(|translation| translation.data.clone()).unwrap_or_default();

        for language in &self.languages {
            if language.base || self.translation.contains_key(&language.code) {
                continue;
            }
            let blank = base_entries.iter().map(TranslationEntry::blank).collect();
            self.translation
                .insert(language.code.clone(), LanguageTranslation::new(language.clone(), blank));
        }
    }

    /// Blank copy of the entries of the first configured language, other than `base_code`, that has any.
    fn donor_entries(&self, base_code: &str) -> Option<(String, Vec<TranslationEntry>)> {
        self.languages
            .iter()
            .filter(|language| language.code != base_code)
            .find_map(|language| {
                self.translation
                    .get(&language.code)
                    .filter(|translation| !translation.data.is_empty())
                    .map(|translation| {
                        (language.code.clone(), translation.data.iter().map(TranslationEntry::blank).collect())
                    })
            })
    }

    /// Drops entry lists of languages that are no longer configured.
    pub fn check_all_languages_exist(&mut self) {
        let configured: HashSet<&str> =
            self.languages.iter().map(|language| language.code.as_str()).collect();
        self.translation.retain(|code, _| {
            let keep = configured.contains(code.as_str());
            if !keep {
                tracing::debug!(language = %code, "Dropping data of removed language");
            }
            keep
        });
    }

    /// Appends base keys missing from a language and drops keys the base does not have.
    pub fn sync_keys_with_base(&mut self) {
        let Ok(base) = self.default_translation().cloned() else {
            return;
        };
        let base_keys: HashSet<&str> = base.keys().collect();

        for (code, translation) in &mut self.translation {
            if *code == base.language.code {
                continue;
            }
            translation.data.retain(|entry| {
                let keep = base_keys.contains(entry.key.as_str());
                if !keep {
                    tracing::warn!(language = %code, key = %entry.key, "Dropping key missing from base language");
                }
                keep
            });
            let present: HashSet<String> = translation.keys().map(str::to_string).collect();
            for entry in &base.data {
                if !present.contains(&entry.key) {
                    translation.data.push(entry.blank());
                }
            }
        }
    }

    /// Copies the current language settings into the entry lists.
    fn refresh_language_records(&mut self) {
        for language in &self.languages {
            if let Some(translation) = self.translation.get_mut(&language.code) {
                translation.language = language.clone();
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::collections::{
        BTreeMap,
        HashMap,
    };

    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;
    use crate::project::NewProject;
    use crate::types::Language;

    fn keys(project: &Project, code: &str) -> Vec<String> {
        project.translation()[code].keys().map(str::to_string).collect()
    }

    fn english() -> Language {
        Language::new("en", "English").base()
    }

    fn translation_of(language: &Language, pairs: &[(&str, &str)]) -> LanguageTranslation {
        LanguageTranslation::new(
            language.clone(),
            pairs.iter().map(|(key, value)| TranslationEntry::new(*key, *value, "", Vec::new())).collect(),
        )
    }

    #[googletest::test]
    fn new_project_gets_placeholder_in_every_language() {
        let project =
            NewProject::new("New", "/new", vec![english(), Language::new("fr", "French")]).build().unwrap();

        assert_that!(keys(&project, "en"), elements_are![eq("hello")]);
        assert_that!(keys(&project, "fr"), elements_are![eq("hello")]);
        assert_that!(
            project.translation()["en"].find("hello").unwrap().value,
            eq("Hello World, it's Local Localizator!")
        );
        assert_that!(project.translation()["fr"].find("hello").unwrap().value, eq(""));
        assert_that!(project.progress(), eq(50));
        assert_that!(project.empty_slots_as_string(), eq("French"));
    }

    #[googletest::test]
    fn cloned_entries_keep_ids_and_metadata() {
        let en = english();
        let mut base = translation_of(&en, &[("a", "A")]);
        base.data[0].description = "desc".to_string();
        base.data[0].tags = vec!["t".to_string()];
        let id = base.data[0].id.clone();

        let project = NewProject::new("P", "/p", vec![en, Language::new("de", "German")])
            .translation(BTreeMap::from([("en".to_string(), base)]))
            .build()
            .unwrap();

        let de = project.translation()["de"].find("a").unwrap();
        assert_that!(de.id, eq(&id));
        assert_that!(de.description, eq("desc"));
        assert_that!(de.tags, elements_are![eq("t")]);
        assert_that!(de.value, eq(""));
    }

    #[googletest::test]
    fn removed_languages_lose_their_data() {
        let mut project =
            NewProject::new("P", "/p", vec![english(), Language::new("fr", "French")]).build().unwrap();

        project.remove_language("fr").unwrap();
        project.reconcile();

        assert_eq!(project.translation().keys().cloned().collect::<Vec<_>>(), vec!["en".to_string()]);
    }

    #[googletest::test]
    fn drifted_languages_are_synced_to_base() {
        let en = english();
        let fr = Language::new("fr", "French");
        let translation = BTreeMap::from([
            ("en".to_string(), translation_of(&en, &[("a", "A"), ("b", "B"), ("c", "C")])),
            ("fr".to_string(), translation_of(&fr, &[("b", "Bé"), ("stale", "x")])),
        ]);

        let project = NewProject::new("P", "/p", vec![en, fr]).translation(translation).build().unwrap();

        assert_that!(keys(&project, "fr"), elements_are![eq("b"), eq("a"), eq("c")]);
        assert_that!(project.translation()["fr"].find("b").unwrap().value, eq("Bé"));
        assert_that!(project.empty_slots(), eq(2));
    }

    #[googletest::test]
    fn reconciled_languages_share_the_base_key_set() {
        let mut project = NewProject::new(
            "P",
            "/p",
            vec![english(), Language::new("fr", "French"), Language::new("de", "German")],
        )
        .empty()
        .build()
        .unwrap();
        project.create_key("a", "", &HashMap::new(), Vec::new());
        project.add_language(Language::new("it", "Italian")).unwrap();
        project.translation.get_mut("de").unwrap().data.clear();

        project.reconcile();

        let mut base_keys = keys(&project, "en");
        base_keys.sort();
        for language in project.languages() {
            let mut language_keys = keys(&project, &language.code);
            language_keys.sort();
            assert_that!(language_keys, eq(&base_keys));
        }
        assert_that!(project.translation().len(), eq(4));
    }

    #[googletest::test]
    fn base_change_is_reflected_in_language_records() {
        let mut project =
            NewProject::new("P", "/p", vec![english(), Language::new("fr", "French")]).build().unwrap();

        project.set_base_language("fr").unwrap();
        project.reconcile();

        assert_that!(project.translation()["fr"].language.base, eq(true));
        assert_that!(project.translation()["en"].language.base, eq(false));
    }

    #[rstest]
    #[case::added_as_base(false)]
    #[case::switched_after_add(true)]
    fn new_base_language_keeps_existing_keys(#[case] switch_later: bool) {
        let en = english();
        let translation = BTreeMap::from([(
            "en".to_string(),
            translation_of(&en, &[("title", "Title"), ("subtitle", "Subtitle"), ("footer", "Footer")]),
        )]);
        let mut project = NewProject::new("P", "/p", vec![en]).translation(translation).build().unwrap();

        if switch_later {
            project.add_language(Language::new("de", "German")).unwrap();
            project.translation.remove("de");
            project.set_base_language("de").unwrap();
        } else {
            project.add_language(Language::new("de", "German").base()).unwrap();
        }
        project.reconcile();

        assert_that!(keys(&project, "en"), elements_are![eq("title"), eq("subtitle"), eq("footer")]);
        assert_that!(project.translation()["en"].find("title").unwrap().value, eq("Title"));
        assert_that!(keys(&project, "de"), elements_are![eq("title"), eq("subtitle"), eq("footer")]);
        assert_that!(project.translation()["de"].find("title").unwrap().value, eq(""));
        assert!(project.translation()["de"].find("hello").is_none());
    }

    #[googletest::test]
    fn replaced_language_set_keeps_existing_keys() {
        let en = english();
        let fr = Language::new("fr", "French");
        let translation = BTreeMap::from([
            ("en".to_string(), translation_of(&en, &[("a", "A"), ("b", "B")])),
            ("fr".to_string(), translation_of(&fr, &[("a", "Á"), ("b", "Bé")])),
        ]);
        let mut project = NewProject::new("P", "/p", vec![en, fr]).translation(translation).build().unwrap();

        project
            .set_languages(vec![
                Language::new("en", "English"),
                Language::new("fr", "French"),
                Language::new("it", "Italian").base(),
            ])
            .unwrap();
        project.reconcile();

        assert_that!(keys(&project, "it"), elements_are![eq("a"), eq("b")]);
        assert_that!(project.translation()["fr"].find("b").unwrap().value, eq("Bé"));
        assert_that!(project.translation()["en"].find("a").unwrap().value, eq("A"));
    }
}
