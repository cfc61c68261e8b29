//! GRE Tutor - weekly vocabulary trainer
//!
//! Stores word/meaning pairs grouped by week in a JSON file, quizzes on them with
//! a weighted random pick biased toward early weeks, and tracks per-session coverage.

pub mod config;
pub mod dictionary;
pub mod error;
pub mod fuzzy;
pub mod index;
pub mod progress;
pub mod questions;
pub mod session;
pub mod shutdown;
pub mod speech;
pub mod terminal;

pub use config::{Mode, TutorConfig};
pub use dictionary::{Dictionary, DictionaryStore, WeekId};
pub use error::{Result, TutorError};
pub use fuzzy::{suggest, Suggestion};
pub use index::WordIndex;
pub use progress::{CoverageSet, CoverageStats};
pub use questions::{Question, WeightedSampler};
pub use session::{grade, Feedback, Grade, Prompt, Session, TrainingSummary};
pub use shutdown::{Finished, RunFailure, Shutdown};
pub use speech::{SaySpeaker, Silent, Speaker};
pub use terminal::TerminalPrompt;
