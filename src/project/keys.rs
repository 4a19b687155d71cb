//! Translation key lifecycle: create, update and delete across all languages.

use std::collections::{
    HashMap,
    HashSet,
};

use super::{
    Project,
    ProjectError,
};
use crate::types::{
    LanguageTranslation,
    TranslationEntry,
};

/// Value supplied for `code`, or an empty string.
fn value_for(values: &HashMap<String, String>, code: &str) -> String {
    values.get(code).cloned().unwrap_or_default()
}

impl Project {
    /// Entry list of the base language.
    ///
    /// # Errors
    /// - `NoBaseLanguage` when no language carries the base flag
    /// - `UndefinedLanguage` when the base language has no entry list yet
    pub fn default_translation(&self) -> Result<&LanguageTranslation, ProjectError> {
        let base = self.base_language().ok_or(ProjectError::NoBaseLanguage)?;
        self.translation
            .get(&base.code)
            .ok_or_else(|| ProjectError::UndefinedLanguage(base.code.clone()))
    }

    /// Adds `key` to every language that does not have it yet.
    ///
    /// Languages that already contain the key are left untouched, so retrying
    /// after a partial failure never duplicates entries.
    #[allow(clippy::implicit_hasher)]
    pub fn create_key(
        &mut self,
        key: &str,
        description: &str,
        values: &HashMap<String, String>,
        tags: Vec<String>,
    ) {
        for (code, translation) in &mut self.translation {
            if translation.contains_key(key) {
                tracing::debug!(key, language = %code, "Key already present, skipping");
                continue;
            }
            translation
                .data
                .push(TranslationEntry::new(key, value_for(values, code), description, tags.clone()));
        }
        self.stats.touch(key);
    }

    /// Overwrites value, description and tags of `old_key` and renames it to `new_key`.
    ///
    /// Languages lacking `old_key` receive a fresh `new_key` entry so all
    /// languages keep the same key set.
    ///
    /// # Errors
    /// - `UnknownKey` when no language contains `old_key`
    /// - `DuplicateKey` when `new_key` already exists under another entry
    #[allow(clippy::implicit_hasher)]
    pub fn update_key(
        &mut self,
        old_key: &str,
        description: &str,
        new_key: &str,
        values: &HashMap<String, String>,
        tags: &[String],
    ) -> Result<(), ProjectError> {
        if !self.translation.values().any(|translation| translation.contains_key(old_key)) {
            return Err(ProjectError::UnknownKey(old_key.to_string()));
        }
        if old_key != new_key
            && self.translation.values().any(|translation| translation.contains_key(new_key))
        {
            return Err(ProjectError::DuplicateKey(new_key.to_string()));
        }

        for (code, translation) in &mut self.translation {
            let value = value_for(values, code);
            if let Some(entry) = translation.data.iter_mut().find(|entry| entry.key == old_key) {
                entry.value = value;
                description.clone_into(&mut entry.description);
                tags.clone_into(&mut entry.tags);
                new_key.clone_into(&mut entry.key);
            } else {
                tracing::debug!(key = old_key, language = %code, "Key missing, appending renamed entry");
                translation
                    .data
                    .push(TranslationEntry::new(new_key, value, description, tags.to_vec()));
            }
        }
        self.stats.touch(new_key);
        Ok(())
    }

    /// Removes `key` from every language.
    pub fn delete_key(&mut self, key: &str) {
        self.retain_entries(|entry| entry.key != key);
    }

    /// Removes the entry with `id` from every language.
    pub fn delete_key_by_id(&mut self, id: &str) {
        self.retain_entries(|entry| entry.id != id);
    }

    #[allow(clippy::implicit_hasher)]
    pub fn delete_keys_by_ids(&mut self, ids: &HashSet<String>) {
        self.retain_entries(|entry| !ids.contains(&entry.id));
    }

    /// Removes every key in `keys` from every language, keeping the order of
    /// the remaining entries.
    #[allow(clippy::implicit_hasher)]
    pub fn delete_key_by_set_of_keys(&mut self, keys: &HashSet<String>) {
        self.retain_entries(|entry| !keys.contains(&entry.key));
    }

    /// Keeps the entries matching `keep` in every language.
    fn retain_entries(&mut self, mut keep: impl FnMut(&TranslationEntry) -> bool) {
        for translation in self.translation.values_mut() {
            translation.data.retain(&mut keep);
        }
    }
}
