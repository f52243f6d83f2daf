//! Personal-voice scoring.

use regex::Regex;
use std::sync::LazyLock;

static FIRST_PERSON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:eu|nós|minhas?|meus?|nossas?|nossos?)\b").expect("valid regex")
});

static PERSONAL_EXPERIENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:(?:experiência|prática|observação|pesquisa|estudo)\s+(?:pessoal|própria|realizada)|n?a minha experiência|em minha experiência)\b",
    )
    .expect("valid regex")
});

static REFLECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:questiono|pergunto|refiro|reflito|parece-me|ao meu ver|a meu ver)\b")
        .expect("valid regex")
});

/// Points per first-person pronoun.
const FIRST_PERSON_POINTS: f64 = 3.0;
/// Most the pronoun term can contribute.
const FIRST_PERSON_CAP: f64 = 30.0;
/// Points per personal-experience phrase.
const EXPERIENCE_POINTS: f64 = 8.0;
/// Points per reflective verb.
const REFLECTION_POINTS: f64 = 5.0;

/// Score first-person presence and reflective language, clamped to 0..=100.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn personal_voice(text: &str) -> f64 {
    let pronouns = FIRST_PERSON.find_iter(text).count() as f64;
    let experiences = PERSONAL_EXPERIENCE.find_iter(text).count() as f64;
    let reflections = REFLECTION.find_iter(text).count() as f64;

    let score = (pronouns * FIRST_PERSON_POINTS).min(FIRST_PERSON_CAP)
        + experiences * EXPERIENCE_POINTS
        + reflections * REFLECTION_POINTS;
    score.clamp(0.0, 100.0)
}
