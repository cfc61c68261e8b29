//! Flattened word -> meaning view across all weeks

use std::collections::BTreeMap;

use crate::dictionary::{Dictionary, WeekId};
use crate::error::{Result, TutorError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub meaning: String,
    pub week: WeekId,
}

/// Merged index of every word in the dictionary.
///
/// Weeks are merged in ascending order, so when a word appears in several
/// weeks the meaning comes from the highest-numbered one. `week_of` reports
/// the lowest-numbered week containing the word (the first one met while
/// iterating the weeks).
#[derive(Debug, Clone, Default)]
pub struct WordIndex {
    entries: BTreeMap<String, IndexEntry>,
}

impl WordIndex {
    pub fn build(dictionary: &Dictionary) -> Self {
        let mut entries: BTreeMap<String, IndexEntry> = BTreeMap::new();

        for (week, words) in dictionary.weeks() {
            for (word, meaning) in words {
                entries
                    .entry(word.clone())
                    .and_modify(|entry| entry.meaning = meaning.clone())
                    .or_insert_with(|| IndexEntry {
                        meaning: meaning.clone(),
                        week,
                    });
            }
        }

        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }

    pub fn meaning(&self, word: &str) -> Option<&str> {
        self.entries.get(word).map(|e| e.meaning.as_str())
    }

    pub fn week_of(&self, word: &str) -> Result<WeekId> {
        self.entries
            .get(word)
            .map(|e| e.week)
            .ok_or_else(|| TutorError::NotFound(format!("'{}' is not in any week", word)))
    }

    pub fn get(&self, word: &str) -> Option<&IndexEntry> {
        self.entries.get(word)
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
