//! Fuzzy word lookup for the search prompt

use strsim::{jaro_winkler, normalized_levenshtein};

use crate::index::WordIndex;

/// Below this score a word is not worth suggesting
const MIN_SIMILARITY: f64 = 0.5;

/// A dictionary word close to what was typed
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub word: String,
    pub similarity_score: f64,
}

/// Similarity of two words in [0, 1], ignoring case and surrounding whitespace
pub fn similarity(query: &str, word: &str) -> f64 {
    let query = query.trim().to_lowercase();
    let word = word.trim().to_lowercase();

    if query == word {
        return 1.0;
    }

    // Weighted toward Jaro-Winkler, which favours shared prefixes
    let levenshtein_sim = normalized_levenshtein(&query, &word);
    let jaro_sim = jaro_winkler(&query, &word);
    let mut score = levenshtein_sim * 0.4 + jaro_sim * 0.6;

    if !query.is_empty() && word.starts_with(&query) {
        score = score.max(0.9);
    }
    score
}

/// Up to `limit` index words closest to `query`, best first
pub fn suggest(index: &WordIndex, query: &str, limit: usize) -> Vec<Suggestion> {
    if query.trim().is_empty() {
        return Vec::new();
    }

    let mut suggestions: Vec<Suggestion> = index
        .words()
        .map(|word| Suggestion {
            word: word.to_string(),
            similarity_score: similarity(query, word),
        })
        .filter(|s| s.similarity_score >= MIN_SIMILARITY)
        .collect();

    suggestions.sort_by(|a, b| {
        b.similarity_score
            .total_cmp(&a.similarity_score)
            .then_with(|| a.word.cmp(&b.word))
    });
    suggestions.truncate(limit);
    suggestions
}
