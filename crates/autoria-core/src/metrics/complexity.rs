//! Lexical complexity.

use crate::text;

/// Minimum length, in characters, of a complex word.
pub const COMPLEX_WORD_CHARS: usize = 8;

/// Percentage of words (across all sentences) with eight or more
/// characters, rounded to a whole number.
///
/// A word must contain at least one letter to count as complex, so long
/// numbers and URLs made of digits do not inflate the score.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn lexical_complexity(text: &str) -> f64 {
    let mut total = 0usize;
    let mut complex = 0usize;

    for sentence in text::split_sentences(text) {
        for word in sentence.split_whitespace() {
            total += 1;
            if word.chars().count() >= COMPLEX_WORD_CHARS && word.chars().any(char::is_alphabetic) {
                complex += 1;
            }
        }
    }

    if total == 0 {
        return 0.0;
    }
    (complex as f64 * 100.0 / total as f64).round()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_zero() {
        assert!(lexical_complexity("").abs() < f64::EPSILON);
    }

    #[test]
    fn counts_long_words_as_percentage() {
        // 1 of 4 words has eight or more characters.
        assert!((lexical_complexity("O gato é independente.") - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn digits_alone_are_not_complex() {
        assert!(lexical_complexity("Número 1234567890 aqui").abs() < f64::EPSILON);
    }

    #[test]
    fn result_is_rounded() {
        // 1 of 3 words: 33.33 rounds to 33.
        assert!((lexical_complexity("casa bonita extraordinária") - 33.0).abs() < f64::EPSILON);
    }
}
