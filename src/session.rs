//! Session controller - the training, insertion and search loops
//!
//! A [`Session`] owns everything derived for one run (the word index, the
//! coverage set and the sampler) next to a handle on the dictionary store.
//! Interaction goes through the [`Prompt`] and [`Speaker`] collaborators so
//! the loops never touch the terminal directly.

use log::{debug, info};
use rand::Rng;

use crate::config::validate_coverage;
use crate::dictionary::{DictionaryStore, WeekId};
use crate::error::{Result, TutorError};
use crate::fuzzy;
use crate::index::WordIndex;
use crate::progress::CoverageSet;
use crate::questions::{Question, WeightedSampler};
use crate::speech::Speaker;

/// How many close words the search prompt lists
const MAX_SUGGESTIONS: usize = 5;

/// What the loops report back to the operator
#[derive(Debug, Clone, PartialEq)]
pub enum Feedback {
    /// Answer accepted
    Correct { meaning: String },
    /// Meaning shown after a `?`
    Peek { meaning: String },
    /// Operator confirmed knowing a peeked word
    KnewIt,
    /// Peeked word left for later
    Later,
    Wrong { meaning: String },
    Added { word: String, week: WeekId },
    Rejected(String),
    Found { word: String, meaning: String },
    Suggestions(Vec<String>),
    NoMatch(String),
    Finished { words_trained: usize },
}

/// Interactive input/output used by the session loops
pub trait Prompt {
    /// Ask for one line of input. `Ok(None)` means the input is closed.
    fn ask(&mut self, label: &str) -> std::io::Result<Option<String>>;

    fn show(&mut self, feedback: &Feedback);
}

/// Result of grading one answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    Known,
    Peek,
    Unknown,
}

/// Blank, `y` or `yes` (any case)
pub fn is_affirmative(answer: &str) -> bool {
    answer.is_empty() || answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

/// Grade a raw answer. Matching the meaning is case-sensitive; `y`/`yes` are not.
pub fn grade(answer: &str, meaning: &str) -> Grade {
    if answer == meaning || is_affirmative(answer) {
        Grade::Known
    } else if answer == "?" {
        Grade::Peek
    } else {
        Grade::Unknown
    }
}

/// Outcome of a finished training loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingSummary {
    pub asked: usize,
    pub known: usize,
    pub total: usize,
    pub coverage: f64,
}

enum TrainingState {
    Asking,
    Grading { question: Question, answer: String },
    Done,
}

/// Context for one run, threaded through every loop
pub struct Session {
    store: DictionaryStore,
    prep_week: WeekId,
    index: WordIndex,
    coverage: CoverageSet,
    sampler: WeightedSampler,
}

impl Session {
    pub fn new(store: DictionaryStore, prep_week: WeekId) -> Self {
        let (index, coverage) = store.with(|dictionary| {
            (
                WordIndex::build(dictionary),
                CoverageSet::build(dictionary, prep_week),
            )
        });

        debug!(
            "Session for {}: {} words indexed, {} tracked",
            prep_week,
            index.len(),
            coverage.total()
        );

        Self {
            store,
            prep_week,
            index,
            coverage,
            sampler: WeightedSampler::new(prep_week),
        }
    }

    pub fn store(&self) -> &DictionaryStore {
        &self.store
    }

    pub fn index(&self) -> &WordIndex {
        &self.index
    }

    pub fn coverage(&self) -> &CoverageSet {
        &self.coverage
    }

    /// Quiz until `desired_coverage` percent of the tracked words are known.
    ///
    /// At least one word is always asked; the threshold is checked after each
    /// graded answer. Closed input ends the loop with `TutorError::Interrupted`.
    pub fn train<P, S, R>(
        &mut self,
        desired_coverage: f64,
        prompt: &mut P,
        speaker: &S,
        rng: &mut R,
    ) -> Result<TrainingSummary>
    where
        P: Prompt + ?Sized,
        S: Speaker + ?Sized,
        R: Rng,
    {
        let desired_coverage = validate_coverage(desired_coverage)?;
        // Fails fast when nothing is tracked up to the preparation week
        self.coverage.coverage(0)?;

        let mut asked = 0;
        let mut state = TrainingState::Asking;

        while !matches!(state, TrainingState::Done) {
            state = match state {
                TrainingState::Asking => match self.sampler.pick(&self.index, &self.coverage, rng) {
                    Some(question) => {
                        let answer = self.present(&question, prompt, speaker)?;
                        TrainingState::Grading { question, answer }
                    }
                    None => TrainingState::Done,
                },
                TrainingState::Grading { question, answer } => {
                    self.grade_answer(&question, &answer, prompt)?;
                    asked += 1;
                    if self.coverage.coverage(0)? >= desired_coverage {
                        TrainingState::Done
                    } else {
                        TrainingState::Asking
                    }
                }
                TrainingState::Done => TrainingState::Done,
            };
        }

        let words_trained = self.coverage.known_count();
        prompt.show(&Feedback::Finished { words_trained });
        speaker.speak(&format!(
            "Congratulations, you have trained on {} different words",
            words_trained
        ));

        let summary = TrainingSummary {
            asked,
            known: words_trained,
            total: self.coverage.total(),
            coverage: self.coverage.coverage(0)?,
        };
        info!(
            "Training finished after {} questions at {:.0}% coverage",
            summary.asked, summary.coverage
        );
        Ok(summary)
    }

    /// Show the question and read the raw answer
    fn present<P, S>(&self, question: &Question, prompt: &mut P, speaker: &S) -> Result<String>
    where
        P: Prompt + ?Sized,
        S: Speaker + ?Sized,
    {
        speaker.speak(&question.word);
        let covered = self.coverage.coverage(1)?;
        let label = format!("{} %{:.0}", question.word, covered);
        read_line(prompt, &label)
    }

    fn grade_answer<P>(&mut self, question: &Question, answer: &str, prompt: &mut P) -> Result<()>
    where
        P: Prompt + ?Sized,
    {
        let meaning = question.meaning.clone();
        match grade(answer, &question.meaning) {
            Grade::Known => {
                self.coverage.mark_known(&question.word)?;
                prompt.show(&Feedback::Correct { meaning });
            }
            Grade::Peek => {
                prompt.show(&Feedback::Peek { meaning });
                let follow_up = read_line(prompt, "Did you know it?")?;
                if is_affirmative(&follow_up) {
                    self.coverage.mark_known(&question.word)?;
                    prompt.show(&Feedback::KnewIt);
                } else {
                    prompt.show(&Feedback::Later);
                }
            }
            Grade::Unknown => prompt.show(&Feedback::Wrong { meaning }),
        }
        Ok(())
    }

    /// Store a word in the preparation week and keep the derived views in step
    pub fn add_word(&mut self, word: &str, meaning: &str) -> Result<()> {
        self.store.add_word(self.prep_week, word, meaning)?;
        self.index = self.store.with(WordIndex::build);
        self.coverage.track(word.trim(), self.prep_week);
        Ok(())
    }

    /// Keep asking for words and meanings until the input closes
    pub fn insert_words<P, S>(&mut self, prompt: &mut P, speaker: &S) -> Result<()>
    where
        P: Prompt + ?Sized,
        S: Speaker + ?Sized,
    {
        loop {
            let label = format!(
                "word #{} of {}",
                self.store.week_len(self.prep_week) + 1,
                self.prep_week
            );
            let word = match read_line(prompt, &label) {
                Ok(word) => word,
                Err(TutorError::Interrupted) => return Ok(()),
                Err(e) => return Err(e),
            };
            if word.trim().is_empty() {
                prompt.show(&Feedback::Rejected("Word cannot be empty".to_string()));
                continue;
            }

            speaker.speak(&word);

            let meaning = match read_line(prompt, "meaning") {
                Ok(meaning) => meaning,
                Err(TutorError::Interrupted) => return Ok(()),
                Err(e) => return Err(e),
            };

            match self.add_word(&word, &meaning) {
                Ok(()) => prompt.show(&Feedback::Added {
                    word: word.trim().to_string(),
                    week: self.prep_week,
                }),
                Err(TutorError::Validation(message)) => prompt.show(&Feedback::Rejected(message)),
                Err(e) => return Err(e),
            }
        }
    }

    /// Look words up until the input closes
    pub fn search<P, S>(&self, prompt: &mut P, speaker: &S) -> Result<()>
    where
        P: Prompt + ?Sized,
        S: Speaker + ?Sized,
    {
        loop {
            let query = match read_line(prompt, "Word:") {
                Ok(query) => query,
                Err(TutorError::Interrupted) => return Ok(()),
                Err(e) => return Err(e),
            };
            let query = query.trim();
            if query.is_empty() {
                continue;
            }

            match self.index.meaning(query) {
                Some(meaning) => {
                    prompt.show(&Feedback::Found {
                        word: query.to_string(),
                        meaning: meaning.to_string(),
                    });
                    speaker.speak(query);
                }
                None => {
                    let suggestions: Vec<String> =
                        fuzzy::suggest(&self.index, query, MAX_SUGGESTIONS)
                            .into_iter()
                            .map(|s| s.word)
                            .collect();
                    if suggestions.is_empty() {
                        prompt.show(&Feedback::NoMatch(query.to_string()));
                    } else {
                        prompt.show(&Feedback::Suggestions(suggestions));
                    }
                }
            }
        }
    }
}

fn read_line<P: Prompt + ?Sized>(prompt: &mut P, label: &str) -> Result<String> {
    prompt
        .ask(label)
        .map_err(TutorError::Prompt)?
        .ok_or(TutorError::Interrupted)
}
