//! Lexical richness (type-token ratio).

use std::collections::HashSet;

use crate::text;

/// Unique lowercase words as a percentage of all words. Zero for no words.
pub fn lexical_richness(text: &str) -> f64 {
    let words = text::extract_words(text);
    if words.is_empty() {
        return 0.0;
    }
    let unique: HashSet<&str> = words.iter().map(String::as_str).collect();
    unique.len() as f64 * 100.0 / words.len() as f64
}
