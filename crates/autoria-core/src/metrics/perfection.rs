//! Structural "perfection" indicators.
//!
//! Three independent checks, each adding a fixed bonus when its threshold is
//! crossed. The bonuses add up to at most 60.

use regex::Regex;
use std::sync::LazyLock;

use crate::text;

/// Numbered headings (`1. Introdução`) or all-caps title lines.
static HEADING_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(?:[0-9]+\.\s+|\p{Lu}[\p{Lu} \t]{5,})").expect("valid regex")
});

static TRANSITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:portanto|assim|logo|pois|contudo|entretanto|no entanto)\b")
        .expect("valid regex")
});

static LONG_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\p{L}{10,}\b").expect("valid regex"));

/// Bonus when most paragraphs carry a heading.
pub const HEADING_BONUS: f64 = 20.0;
/// Bonus for dense transition words.
pub const TRANSITION_BONUS: f64 = 15.0;
/// Bonus for a high share of very long words.
pub const LONG_WORD_BONUS: f64 = 25.0;

const MIN_PARAGRAPHS_FOR_HEADINGS: usize = 5;
const HEADING_RATIO: f64 = 0.7;
const CHARS_PER_TRANSITION: f64 = 500.0;
const LONG_WORD_RATIO: f64 = 0.15;

/// Sum of the structural bonuses that apply to `text`.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn perfection_score(text: &str) -> f64 {
    let mut score = 0.0;

    let paragraphs = text::split_paragraphs(text).len();
    if paragraphs >= MIN_PARAGRAPHS_FOR_HEADINGS {
        let headings = HEADING_LINE.find_iter(text).count();
        if headings as f64 / paragraphs as f64 > HEADING_RATIO {
            score += HEADING_BONUS;
        }
    }

    let transitions = TRANSITION.find_iter(text).count() as f64;
    if transitions > text.chars().count() as f64 / CHARS_PER_TRANSITION {
        score += TRANSITION_BONUS;
    }

    let words = text::word_count(text);
    if words > 0 {
        let long_words = LONG_WORD.find_iter(text).count();
        if long_words as f64 / words as f64 > LONG_WORD_RATIO {
            score += LONG_WORD_BONUS;
        }
    }

    score
}
