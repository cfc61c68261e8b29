//! Question selection - weighted random pick of the next word to quiz

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::dictionary::WeekId;
use crate::index::WordIndex;
use crate::progress::CoverageSet;

/// Weighted draws attempted before falling back to a plain uniform pick
pub const DEFAULT_MAX_ATTEMPTS: usize = 64;

/// Narrowest Gaussian width, used when preparing for week 1
const MIN_PEAK_WIDTH: f64 = 0.01;

/// A word to ask, with its meaning and home week
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub word: String,
    pub meaning: String,
    pub week: WeekId,
}

/// Bell curve `peak_value * exp(-(x - peak_position)^2 / (2 * peak_width^2))`
pub fn gaussian(peak_value: f64, peak_position: f64, peak_width: f64) -> impl Fn(f64) -> f64 {
    move |x| {
        let deviation = (x - peak_position).powi(2) / (2.0 * peak_width * peak_width);
        peak_value * (-deviation).exp()
    }
}

/// Picks unknown words, favouring early weeks relative to the preparation week.
///
/// Each candidate is drawn uniformly and kept with probability given by a
/// Gaussian peaked at week 1 whose width is `prep_week - 1`. Later weeks are
/// kept less often; the curve flattens as the preparation week grows. The
/// expected number of draws grows as the acceptance probability shrinks, so
/// after `max_attempts` rejected draws the next candidate is taken as-is.
#[derive(Debug, Clone)]
pub struct WeightedSampler {
    prep_week: WeekId,
    max_attempts: usize,
}

impl WeightedSampler {
    pub fn new(prep_week: WeekId) -> Self {
        Self {
            prep_week,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    fn peak_width(&self) -> f64 {
        (f64::from(self.prep_week.number()) - 1.0).max(MIN_PEAK_WIDTH)
    }

    /// Probability of keeping a word that belongs to `week`
    pub fn acceptance(&self, week: WeekId) -> f64 {
        gaussian(1.0, 1.0, self.peak_width())(f64::from(week.number()))
    }

    /// Pick the next question among words not yet known.
    ///
    /// Returns `None` only when every tracked word is already known.
    pub fn pick<R: Rng>(
        &self,
        index: &WordIndex,
        coverage: &CoverageSet,
        rng: &mut R,
    ) -> Option<Question> {
        let pool: Vec<&str> = coverage.pending().filter(|w| index.contains(w)).collect();
        if pool.is_empty() {
            return None;
        }

        for _ in 0..self.max_attempts {
            let word = pool.choose(rng)?;
            let entry = index.get(word)?;
            let p = self.acceptance(entry.week);
            if rng.gen::<f64>() < p {
                return Some(to_question(word, entry.meaning.clone(), entry.week));
            }
        }

        debug!(
            "No word accepted after {} weighted draws, picking uniformly",
            self.max_attempts
        );
        let word = pool.choose(rng)?;
        let entry = index.get(word)?;
        Some(to_question(word, entry.meaning.clone(), entry.week))
    }
}

fn to_question(word: &str, meaning: String, week: WeekId) -> Question {
    Question {
        word: word.to_string(),
        meaning,
        week,
    }
}
