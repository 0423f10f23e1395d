//! String similarity used for fuzzy key matching.
//!
//! The resolver only needs a 0-100 score, so the scorer is a trait and the
//! default implementation can be swapped in tests or for other metrics.

use rapidfuzz::distance::indel;

/// A similarity metric on a 0-100 scale (100 means identical).
pub trait Similarity {
    fn ratio(&self, a: &str, b: &str) -> u8;
}

/// Indel-normalized ratio, rounded to the nearest integer.
///
/// `100 * (1 - indel_distance / (len(a) + len(b)))`, the same number the
/// classic `fuzz.ratio` reports.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndelRatio;

impl Similarity for IndelRatio {
    fn ratio(&self, a: &str, b: &str) -> u8 {
        if a == b {
            return 100;
        }
        if a.is_empty() || b.is_empty() {
            return 0;
        }
        let score = indel::normalized_similarity(a.chars(), b.chars()) * 100.0;
        // Clamped to 0..=100 before the cast
        score.round().clamp(0.0, 100.0) as u8
    }
}

impl<F> Similarity for F
where
    F: Fn(&str, &str) -> u8,
{
    fn ratio(&self, a: &str, b: &str) -> u8 {
        self(a, b)
    }
}

/// Whether `query` selects `key`: substring containment or a fuzzy score at or
/// above `threshold`. Both arguments are expected to be lower-cased already.
pub fn key_matches(query: &str, key: &str, threshold: u8, similarity: &impl Similarity) -> bool {
    key.contains(query) || similarity.ratio(query, key) >= threshold
}
