//! Text processing utilities.
//!
//! Provides the word, sentence, and paragraph segmentation shared by every
//! extractor. Segmentation is deliberately coarse: sentences end at runs of
//! `.`, `!`, or `?`, and paragraphs end at blank-line runs.

use regex::Regex;
use std::sync::LazyLock;

/// Runs of sentence terminators.
static SENTENCE_TERMINATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("valid regex"));

/// Blank-line runs (a newline, optional whitespace, another newline).
static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("valid regex"));

/// Basic document counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextCounts {
    /// Whitespace-delimited tokens.
    pub words: usize,
    /// Non-empty fragments between terminator runs.
    pub sentences: usize,
    /// Non-empty blocks between blank-line runs.
    pub paragraphs: usize,
}

/// Count words, sentences, and paragraphs.
///
/// All counts are zero for empty or whitespace-only input.
pub fn count(text: &str) -> TextCounts {
    TextCounts {
        words: word_count(text),
        sentences: split_sentences(text).len(),
        paragraphs: split_paragraphs(text).len(),
    }
}

/// Number of whitespace-delimited tokens.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Split text into trimmed, non-empty sentences (terminators removed).
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn split_sentences(text: &str) -> Vec<&str> {
    SENTENCE_TERMINATORS
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Split text into trimmed, non-empty paragraphs.
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    BLANK_LINES
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Extract words from text, splitting on whitespace and stripping punctuation.
///
/// Words are lowercased so they can be compared for lexical diversity.
pub fn extract_words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'' && c != '-'))
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Number of Unicode scalar values in the trimmed text.
///
/// This is the length compared against the minimum-input thresholds.
pub fn char_length(text: &str) -> usize {
    text.trim().chars().count()
}

/// Byte offset of `part` inside `whole`.
///
/// `part` must be a subslice of `whole`, as returned by the splitters above.
pub fn offset_of(whole: &str, part: &str) -> usize {
    (part.as_ptr() as usize)
        .saturating_sub(whole.as_ptr() as usize)
        .min(whole.len())
}

/// Truncate to at most `max` characters, appending an ellipsis when cut.
pub fn truncate_chars(text: &str, max: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_are_zero_for_empty_input() {
        assert_eq!(count(""), TextCounts::default());
        assert_eq!(count("   \n\n  "), TextCounts::default());
    }

    #[test]
    fn sentences_split_on_terminator_runs() {
        let sentences = split_sentences("Primeira frase. Segunda?! Terceira... Quarta");
        assert_eq!(sentences, vec!["Primeira frase", "Segunda", "Terceira", "Quarta"]);
    }

    #[test]
    fn paragraphs_split_on_blank_line_runs() {
        let text = "Primeiro parágrafo.\n\n\n  \nSegundo parágrafo.\n\nTerceiro.";
        assert_eq!(split_paragraphs(text).len(), 3);
    }

    #[test]
    fn single_newlines_do_not_split_paragraphs() {
        assert_eq!(split_paragraphs("linha um\nlinha dois").len(), 1);
    }

    #[test]
    fn extract_words_strips_punctuation_and_lowercases() {
        let words = extract_words("Olá, mundo! Isto é um TESTE.");
        assert_eq!(words, vec!["olá", "mundo", "isto", "é", "um", "teste"]);
    }

    #[test]
    fn char_length_counts_scalars_not_bytes() {
        assert_eq!(char_length("  ação  "), 4);
    }

    #[test]
    fn offset_of_locates_split_slices() {
        let text = "primeiro\n\nsegundo";
        let paragraphs = split_paragraphs(text);
        assert_eq!(offset_of(text, paragraphs[1]), 10);
    }

    #[test]
    fn truncate_marks_cut_text() {
        assert_eq!(truncate_chars("abcdef", 3), "abc…");
        assert_eq!(truncate_chars("abc", 3), "abc");
    }
}
