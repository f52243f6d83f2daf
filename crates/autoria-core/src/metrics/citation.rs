//! Citation density.

use regex::Regex;
use std::sync::LazyLock;

use crate::text;

/// A parenthetical holding a capitalized token and a four-digit year,
/// e.g. `(Silva, 2019)` or `(FREIRE, 1996, p. 25)`.
static CITATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\p{Lu}[^()]*?\b\d{4}\b[^()]*\)").expect("valid regex"));

/// Parenthetical citations per 1000 words. Zero when there are no words.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn citation_density(text: &str) -> f64 {
    let words = text::word_count(text);
    if words == 0 {
        return 0.0;
    }
    let citations = CITATION.find_iter(text).count();
    citations as f64 * 1000.0 / words as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_has_zero_density() {
        assert!(citation_density("").abs() < f64::EPSILON);
    }

    #[test]
    fn counts_author_year_parentheticals() {
        let text = "Segundo a literatura (Silva, 2019), o tema é amplo (FREIRE, 1996, p. 25).";
        let words = text::word_count(text) as f64;
        let expected = 2.0 * 1000.0 / words;
        assert!((citation_density(text) - expected).abs() < 1e-9);
    }

    #[test]
    fn ignores_parentheses_without_year_or_capital() {
        let text = "Um aparte (sem ano) e outro (em 2019) não contam.";
        assert!(citation_density(text).abs() < f64::EPSILON);
    }
}
