//! Progress tracking - per-session coverage of the words up to the preparation week

use std::collections::BTreeMap;
use std::fmt;

use crate::dictionary::{Dictionary, WeekId};
use crate::error::{Result, TutorError};

/// Snapshot of how far a session has come
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverageStats {
    pub known: usize,
    pub total: usize,
    pub percent: f64,
}

impl fmt::Display for CoverageStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} words known ({:.0}%)", self.known, self.total, self.percent)
    }
}

/// Known/unknown flag for every word in weeks up to the preparation week.
/// Never persisted; rebuilt for each run.
#[derive(Debug, Clone)]
pub struct CoverageSet {
    prep_week: WeekId,
    flags: BTreeMap<String, bool>,
}

impl CoverageSet {
    pub fn build(dictionary: &Dictionary, prep_week: WeekId) -> Self {
        let flags = dictionary
            .weeks()
            .filter(|(id, _)| *id <= prep_week)
            .flat_map(|(_, words)| words.keys())
            .map(|word| (word.clone(), false))
            .collect();

        Self { prep_week, flags }
    }

    pub fn prep_week(&self) -> WeekId {
        self.prep_week
    }

    pub fn is_tracked(&self, word: &str) -> bool {
        self.flags.contains_key(word)
    }

    pub fn is_known(&self, word: &str) -> bool {
        self.flags.get(word).copied().unwrap_or(false)
    }

    /// Mark a tracked word as known. Words from later weeks are not tracked
    /// and asking for them is a caller error.
    pub fn mark_known(&mut self, word: &str) -> Result<()> {
        match self.flags.get_mut(word) {
            Some(flag) => {
                *flag = true;
                Ok(())
            }
            None => Err(TutorError::NotFound(format!(
                "'{}' is not tracked up to {}",
                word, self.prep_week
            ))),
        }
    }

    /// Start tracking a word added during the run; existing flags are kept
    pub fn track(&mut self, word: &str, week: WeekId) {
        if week <= self.prep_week {
            self.flags.entry(word.to_string()).or_insert(false);
        }
    }

    /// Words still waiting to be known
    pub fn pending(&self) -> impl Iterator<Item = &str> {
        self.flags
            .iter()
            .filter(|(_, known)| !**known)
            .map(|(word, _)| word.as_str())
    }

    pub fn known_count(&self) -> usize {
        self.flags.values().filter(|known| **known).count()
    }

    pub fn total(&self) -> usize {
        self.flags.len()
    }

    /// Percentage of known words, counting `inclusive_delta` extra words as known
    pub fn coverage(&self, inclusive_delta: usize) -> Result<f64> {
        if self.flags.is_empty() {
            return Err(TutorError::Validation(format!(
                "There are no words to cover up to {}",
                self.prep_week
            )));
        }
        Ok(100.0 * (self.known_count() + inclusive_delta) as f64 / self.total() as f64)
    }

    pub fn stats(&self) -> Result<CoverageStats> {
        Ok(CoverageStats {
            known: self.known_count(),
            total: self.total(),
            percent: self.coverage(0)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn week(n: u32) -> WeekId {
        WeekId::new(n).unwrap()
    }

    fn dictionary() -> Dictionary {
        let mut d = Dictionary::new();
        d.insert(week(1), "apple", "a fruit").unwrap();
        d.insert(week(2), "run", "to move fast").unwrap();
        d.insert(week(2), "zeal", "great energy").unwrap();
        d.insert(week(3), "abate", "to lessen").unwrap();
        d
    }

    #[test]
    fn test_tracks_weeks_up_to_prep_week() {
        let coverage = CoverageSet::build(&dictionary(), week(2));
        assert_eq!(coverage.total(), 3);
        assert!(coverage.is_tracked("zeal"));
        assert!(!coverage.is_tracked("abate"));
        assert_eq!(coverage.pending().count(), 3);
    }

    #[test]
    fn test_coverage_grows_to_exactly_100() {
        let mut coverage = CoverageSet::build(&dictionary(), week(2));
        let mut last = coverage.coverage(0).unwrap();
        assert_eq!(last, 0.0);

        for word in ["apple", "run", "zeal"] {
            coverage.mark_known(word).unwrap();
            let now = coverage.coverage(0).unwrap();
            assert!(now >= last);
            last = now;
        }
        assert_eq!(last, 100.0);
        assert_eq!(coverage.pending().count(), 0);
    }

    #[test]
    fn test_inclusive_delta() {
        let mut coverage = CoverageSet::build(&dictionary(), week(1));
        assert_eq!(coverage.coverage(1).unwrap(), 100.0);
        coverage.mark_known("apple").unwrap();
        assert_eq!(coverage.coverage(0).unwrap(), 100.0);
    }

    #[test]
    fn test_mark_untracked_word_is_an_error() {
        let mut coverage = CoverageSet::build(&dictionary(), week(2));
        assert!(matches!(coverage.mark_known("abate"), Err(TutorError::NotFound(_))));
        assert_eq!(coverage.known_count(), 0);
    }

    #[test]
    fn test_track_new_words() {
        let mut coverage = CoverageSet::build(&dictionary(), week(2));
        coverage.mark_known("run").unwrap();
        coverage.track("run", week(2));
        coverage.track("ardent", week(1));
        coverage.track("zenith", week(3));

        assert!(coverage.is_known("run"));
        assert!(coverage.is_tracked("ardent"));
        assert!(!coverage.is_tracked("zenith"));
        assert_eq!(coverage.total(), 4);
    }

    #[test]
    fn test_empty_set_fails_fast() {
        let coverage = CoverageSet::build(&Dictionary::new(), week(1));
        assert!(matches!(coverage.coverage(0), Err(TutorError::Validation(_))));
        assert!(coverage.stats().is_err());
    }

    #[test]
    fn test_stats_display() {
        let mut coverage = CoverageSet::build(&dictionary(), week(2));
        coverage.mark_known("run").unwrap();
        let stats = coverage.stats().unwrap();
        assert_eq!(stats.known, 1);
        assert_eq!(stats.to_string(), "1/3 words known (33%)");
    }
}
