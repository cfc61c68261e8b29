//! Run parameters resolved from the command line

use std::path::{Path, PathBuf};

use crate::dictionary::{Dictionary, WeekId};
use crate::error::{Result, TutorError};
use crate::speech::DEFAULT_VOICE;

pub const DEFAULT_COVERAGE: f64 = 90.0;
pub const DICTIONARY_FILE_NAME: &str = ".words.json";

/// What the run does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    List,
    Add,
    Train,
    Search,
    Backup(PathBuf),
    Restore(Option<PathBuf>),
    Help,
}

#[derive(Debug, Clone)]
pub struct TutorConfig {
    pub dictionary_path: PathBuf,
    /// `None` means the latest week in the dictionary
    pub prep_week: Option<WeekId>,
    pub desired_coverage: f64,
    pub mute: bool,
    pub voice: String,
    pub mode: Mode,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            dictionary_path: default_dictionary_path(),
            prep_week: None,
            desired_coverage: DEFAULT_COVERAGE,
            mute: false,
            voice: DEFAULT_VOICE.to_string(),
            mode: Mode::List,
        }
    }
}

impl TutorConfig {
    /// Preparation week for this run
    pub fn resolve_prep_week(&self, dictionary: &Dictionary) -> WeekId {
        self.prep_week
            .unwrap_or_else(|| dictionary.default_prep_week())
    }

    pub fn validate(&self) -> Result<()> {
        validate_coverage(self.desired_coverage)?;
        if self.voice.trim().is_empty() {
            return Err(TutorError::Validation("Voice name cannot be empty".to_string()));
        }
        Ok(())
    }
}

/// `~/.words.json`, or the current directory when there is no home
pub fn default_dictionary_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DICTIONARY_FILE_NAME)
}

/// Anchor a relative path at `cwd`
pub fn resolve_path(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

pub fn validate_coverage(coverage: f64) -> Result<f64> {
    if coverage.is_finite() && coverage > 0.0 && coverage <= 100.0 {
        Ok(coverage)
    } else {
        Err(TutorError::Validation(format!(
            "Coverage must be a percentage above 0 and at most 100, got {}",
            coverage
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TutorConfig::default();
        assert_eq!(config.desired_coverage, 90.0);
        assert_eq!(config.voice, "Samantha");
        assert_eq!(config.mode, Mode::List);
        assert!(config.dictionary_path.ends_with(".words.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_prep_week_defaults_to_latest() {
        let mut d = Dictionary::new();
        d.insert(WeekId::new(4).unwrap(), "zeal", "great energy").unwrap();

        let config = TutorConfig::default();
        assert_eq!(config.resolve_prep_week(&d).number(), 4);
        assert_eq!(config.resolve_prep_week(&Dictionary::new()).number(), 1);

        let pinned = TutorConfig {
            prep_week: Some(WeekId::new(2).unwrap()),
            ..TutorConfig::default()
        };
        assert_eq!(pinned.resolve_prep_week(&d).number(), 2);
    }

    #[test]
    fn test_coverage_bounds() {
        assert!(validate_coverage(100.0).is_ok());
        assert!(validate_coverage(0.5).is_ok());
        assert!(validate_coverage(0.0).is_err());
        assert!(validate_coverage(120.0).is_err());
        assert!(validate_coverage(f64::NAN).is_err());
    }

    #[test]
    fn test_resolve_relative_path() {
        let cwd = Path::new("/home/student");
        assert_eq!(resolve_path(Path::new("my.json"), cwd), cwd.join("my.json"));
        assert_eq!(resolve_path(Path::new("/tmp/a.json"), cwd), PathBuf::from("/tmp/a.json"));
    }
}
