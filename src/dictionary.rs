//! Dictionary storage - weekly word/meaning pairs persisted as a single JSON document

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info};
use parking_lot::Mutex;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tempfile::NamedTempFile;

use crate::error::{Result, TutorError};

const WEEK_PREFIX: &str = "week";

/// Week identifier, persisted as `week<N>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekId(u32);

impl WeekId {
    pub fn new(number: u32) -> Result<Self> {
        if number == 0 {
            return Err(TutorError::Validation("Week numbers start at 1".to_string()));
        }
        Ok(WeekId(number))
    }

    pub fn number(self) -> u32 {
        self.0
    }

    /// Key used for this week in the persisted document
    pub fn key(self) -> String {
        format!("{}{}", WEEK_PREFIX, self.0)
    }

    pub fn parse_key(key: &str) -> Result<Self> {
        let digits = key.strip_prefix(WEEK_PREFIX).ok_or_else(|| {
            TutorError::Validation(format!("Week key '{}' must start with '{}'", key, WEEK_PREFIX))
        })?;
        let invalid = || {
            TutorError::Validation(format!("Week key '{}' has no valid week number", key))
        };
        // Only the form `key()` writes back is accepted, so no two keys share a week
        let canonical = !digits.starts_with('0') && digits.bytes().all(|b| b.is_ascii_digit());
        if !canonical {
            return Err(invalid());
        }
        let number = digits.parse::<u32>().map_err(|_| invalid())?;
        WeekId::new(number)
    }
}

impl fmt::Display for WeekId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", WEEK_PREFIX, self.0)
    }
}

impl Serialize for WeekId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.key())
    }
}

impl<'de> Deserialize<'de> for WeekId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        WeekId::parse_key(&key).map_err(de::Error::custom)
    }
}

/// Words of one week, word -> meaning
pub type Week = BTreeMap<String, String>;

/// All weeks of vocabulary, ordered by week number
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Dictionary {
    weeks: BTreeMap<WeekId, Week>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn weeks(&self) -> impl Iterator<Item = (WeekId, &Week)> {
        self.weeks.iter().map(|(id, week)| (*id, week))
    }

    pub fn week(&self, id: WeekId) -> Option<&Week> {
        self.weeks.get(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    /// Number of entries across all weeks (a word listed in two weeks counts twice)
    pub fn entry_count(&self) -> usize {
        self.weeks.values().map(|week| week.len()).sum()
    }

    pub fn latest_week(&self) -> Option<WeekId> {
        self.weeks.keys().next_back().copied()
    }

    /// Week to prepare for when none is given: the latest one, or week 1
    pub fn default_prep_week(&self) -> WeekId {
        self.latest_week().unwrap_or(WeekId(1))
    }

    /// Insert or overwrite `word` in `week`, creating the week if needed.
    /// Returns the meaning that was replaced, if any.
    pub fn insert(&mut self, week: WeekId, word: &str, meaning: &str) -> Result<Option<String>> {
        let word = word.trim();
        let meaning = meaning.trim();
        if word.is_empty() {
            return Err(TutorError::Validation("Word cannot be empty".to_string()));
        }
        if meaning.is_empty() {
            return Err(TutorError::Validation(format!("Meaning of '{}' cannot be empty", word)));
        }

        Ok(self
            .weeks
            .entry(week)
            .or_default()
            .insert(word.to_string(), meaning.to_string()))
    }

    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// Human-readable JSON with four-space indentation
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)?;
        // serde_json only ever emits valid UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl<'de> Deserialize<'de> for Dictionary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(DictionaryVisitor)
    }
}

/// Rejects repeated weeks and blank entries instead of letting them overwrite or slip in
struct DictionaryVisitor;

impl<'de> Visitor<'de> for DictionaryVisitor {
    type Value = Dictionary;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object of week<N> keys holding word/meaning objects")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Dictionary, A::Error> {
        let mut weeks = BTreeMap::new();
        while let Some((id, week)) = map.next_entry::<WeekId, Week>()? {
            if let Some((word, _)) = week
                .iter()
                .find(|(word, meaning)| word.trim().is_empty() || meaning.trim().is_empty())
            {
                return Err(de::Error::custom(format!("{} has a blank entry '{}'", id, word)));
            }
            if weeks.insert(id, week).is_some() {
                return Err(de::Error::custom(format!("{} appears more than once", id)));
            }
        }
        Ok(Dictionary { weeks })
    }
}

/// Read a dictionary document from disk
pub fn read_dictionary(path: &Path) -> Result<Dictionary> {
    let content = fs::read_to_string(path).map_err(|e| TutorError::storage(path, e))?;
    Dictionary::from_json(&content).map_err(|e| TutorError::json(path, e))
}

/// Replace the document at `path` with `dictionary`.
/// Writes to a sibling temp file first, then renames it over the target.
pub fn write_dictionary(path: &Path, dictionary: &Dictionary) -> Result<()> {
    let parent_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent_dir).map_err(|e| TutorError::storage(parent_dir, e))?;

    let json = dictionary
        .to_pretty_json()
        .map_err(|e| TutorError::json(path, e))?;

    let mut temp_file =
        NamedTempFile::new_in(parent_dir).map_err(|e| TutorError::storage(parent_dir, e))?;
    temp_file
        .write_all(json.as_bytes())
        .map_err(|e| TutorError::storage(temp_file.path().to_path_buf(), e))?;
    temp_file
        .persist(path)
        .map_err(|e| TutorError::storage(path, e.error))?;

    debug!("Wrote {} entries to {}", dictionary.entry_count(), path.display());
    Ok(())
}

/// Shared handle to the in-memory dictionary and the file it is saved to.
///
/// Clones share the same dictionary, so the shutdown handler can persist
/// whatever the session loops have recorded so far.
#[derive(Debug, Clone)]
pub struct DictionaryStore {
    path: PathBuf,
    dictionary: Arc<Mutex<Dictionary>>,
}

impl DictionaryStore {
    /// Load the dictionary at `path`, creating an empty document there if it does not exist
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let dictionary = match read_dictionary(&path) {
            Ok(dictionary) => dictionary,
            Err(TutorError::Storage { source, .. }) if source.kind() == ErrorKind::NotFound => {
                info!("No dictionary at {}, starting an empty one", path.display());
                let empty = Dictionary::new();
                write_dictionary(&path, &empty)?;
                empty
            }
            Err(e) => return Err(e),
        };

        info!(
            "Loaded {} entries in {} weeks from {}",
            dictionary.entry_count(),
            dictionary.weeks.len(),
            path.display()
        );

        Ok(Self::from_dictionary(path, dictionary))
    }

    /// Wrap an in-memory dictionary without touching the disk
    pub fn from_dictionary(path: impl Into<PathBuf>, dictionary: Dictionary) -> Self {
        Self {
            path: path.into(),
            dictionary: Arc::new(Mutex::new(dictionary)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn snapshot(&self) -> Dictionary {
        self.dictionary.lock().clone()
    }

    /// Run `f` against the current dictionary. Do not prompt from inside `f`.
    pub fn with<R>(&self, f: impl FnOnce(&Dictionary) -> R) -> R {
        f(&self.dictionary.lock())
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&self.path)
    }

    /// Write the full dictionary to `path` (used for backups as well)
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let dictionary = self.snapshot();
        write_dictionary(path, &dictionary)?;
        info!("All changes are saved to {}", path.display());
        Ok(())
    }

    /// Replace the dictionary with the document at `source` and persist it to this store's path.
    ///
    /// Nothing changes, in memory or on disk, unless `source` reads and parses cleanly.
    pub fn restore(&self, source: Option<&Path>) -> Result<()> {
        let source = source.filter(|p| !p.as_os_str().is_empty()).ok_or_else(|| {
            TutorError::Validation("You must type a valid backup file path".to_string())
        })?;

        let restored = read_dictionary(source).map_err(|e| {
            TutorError::Validation(format!("Cannot restore from {}: {}", source.display(), e))
        })?;

        write_dictionary(&self.path, &restored)?;
        *self.dictionary.lock() = restored;

        info!("Dictionary at {} replaced with {}", self.path.display(), source.display());
        Ok(())
    }

    pub fn add_word(&self, week: WeekId, word: &str, meaning: &str) -> Result<()> {
        let replaced = self.dictionary.lock().insert(week, word, meaning)?;
        if let Some(previous) = replaced {
            debug!("Overwrote '{}' in {} (was '{}')", word.trim(), week, previous);
        }
        Ok(())
    }

    pub fn week_len(&self, week: WeekId) -> usize {
        self.with(|d| d.week(week).map_or(0, |w| w.len()))
    }
}
