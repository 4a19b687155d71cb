//! Translation statistics.
//!
//! Pure functions over a reconciled [`Project`]; the project writes the
//! results back onto itself in [`Project::calculate`].

use std::collections::BTreeMap;

use crate::project::Project;
use crate::types::ProjectStatus;

/// Number of keys, taken from the base language.
#[must_use]
pub fn key_count(project: &Project) -> usize {
    project.default_translation().map_or(0, |translation| translation.data.len())
}

/// Number of (key, language) slots.
#[must_use]
pub fn slots_count(project: &Project) -> usize {
    key_count(project) * project.languages().len()
}

/// Untranslated entries per language code.
#[must_use]
pub fn empty_slots(project: &Project) -> BTreeMap<String, usize> {
    project
        .translation()
        .iter()
        .map(|(code, translation)| {
            let empty = translation.data.iter().filter(|entry| entry.is_untranslated()).count();
            (code.clone(), empty)
        })
        .collect()
}

#[must_use]
pub fn empty_slots_count(project: &Project) -> usize {
    empty_slots(project).values().sum()
}

/// Percentage of filled slots, rounded down. A project without slots is complete.
#[must_use]
pub fn translated_progress(project: &Project) -> u8 {
    progress_of(slots_count(project), empty_slots_count(project))
}

/// Translated share of all slots, rounded down; 100 when there are no slots.
fn progress_of(total_slots: usize, empty_slots: usize) -> u8 {
    if total_slots == 0 {
        return 100;
    }
    let filled = total_slots.saturating_sub(empty_slots);
    u8::try_from(filled * 100 / total_slots).unwrap_or(100)
}

/// Full statistics snapshot of a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectStatistics {
    pub key_count: usize,
    pub slots_count: usize,
    pub empty_slots: BTreeMap<String, usize>,
    pub empty_slots_count: usize,
    pub progress: u8,
}

impl ProjectStatistics {
    #[must_use]
    pub fn compute(project: &Project) -> Self {
        let key_count = key_count(project);
        let slots_count = key_count * project.languages().len();
        let empty_slots = empty_slots(project);
        let empty_slots_count = empty_slots.values().sum();
        Self {
            key_count,
            slots_count,
            empty_slots,
            empty_slots_count,
            progress: progress_of(slots_count, empty_slots_count),
        }
    }

    #[must_use]
    pub const fn status(&self) -> ProjectStatus {
        if self.progress == 100 { ProjectStatus::Completed } else { ProjectStatus::Missing }
    }
}
