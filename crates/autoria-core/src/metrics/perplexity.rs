//! Perplexity proxy.
//!
//! There is no language model here. The proxy averages per-sentence lexical
//! diversity and subtracts a penalty whenever two consecutive long sentences
//! end with the same three words, a rhythm common in generated text.

use std::collections::HashSet;

use super::reports::PerplexityResult;
use crate::text;

/// Tokens a sentence needs to count toward the diversity average.
pub const MIN_SENTENCE_TOKENS: usize = 5;
/// Qualifying sentences needed before the proxy is assessed.
pub const MIN_QUALIFYING_SENTENCES: usize = 3;
/// A sentence needs more words than this for its ending to be compared.
pub const ENDING_MIN_WORDS: usize = 8;
/// Words that make up a sentence ending.
pub const ENDING_WORDS: usize = 3;
/// Cost of each repeated ending.
pub const REPEATED_ENDING_PENALTY: f64 = 15.0;
/// Score reported when there is too little text.
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Compute the perplexity proxy for `text`.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn perplexity_proxy(text: &str) -> PerplexityResult {
    let sentences: Vec<Vec<String>> = text::split_sentences(text)
        .into_iter()
        .map(text::extract_words)
        .collect();

    let ratios: Vec<f64> = sentences
        .iter()
        .filter(|words| words.len() >= MIN_SENTENCE_TOKENS)
        .map(|words| {
            let unique: HashSet<&String> = words.iter().collect();
            unique.len() as f64 * 100.0 / words.len() as f64
        })
        .collect();

    if ratios.len() < MIN_QUALIFYING_SENTENCES {
        return PerplexityResult {
            score: NEUTRAL_SCORE,
            similar_ending_count: 0,
            sentence_count: ratios.len(),
            note: Some(format!(
                "Frases insuficientes para avaliar a perplexidade ({} de {MIN_QUALIFYING_SENTENCES} necessárias)",
                ratios.len()
            )),
        };
    }

    let average = ratios.iter().sum::<f64>() / ratios.len() as f64;
    let similar = repeated_endings(&sentences);
    let score = (average - similar as f64 * REPEATED_ENDING_PENALTY).clamp(0.0, 100.0);

    PerplexityResult {
        score,
        similar_ending_count: similar,
        sentence_count: ratios.len(),
        note: None,
    }
}

/// Count consecutive long sentences whose endings are identical.
fn repeated_endings(sentences: &[Vec<String>]) -> usize {
    let endings: Vec<Option<String>> = sentences
        .iter()
        .map(|words| {
            (words.len() > ENDING_MIN_WORDS)
                .then(|| words[words.len() - ENDING_WORDS..].join(" "))
        })
        .collect();

    endings
        .windows(2)
        .filter(|pair| matches!(pair, [Some(a), Some(b)] if a == b))
        .count()
}
