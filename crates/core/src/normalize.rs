//! Text canonicalization for transcription comparison.
//!
//! Scoring never compares raw input: both sides go through `normalize`
//! first so that case and punctuation differences cost nothing.

/// Canonicalizes text for word-level comparison.
///
/// Lower-cases the input, drops every character that is not a Unicode
/// alphanumeric, underscore, or whitespace (accented letters survive), and
/// trims the ends. Splitting into words is the caller's job; internal runs
/// of whitespace fall out of a plain `split_whitespace`.
///
/// Idempotent: `normalize(normalize(x)) == normalize(x)`.
#[must_use]
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let kept: String = lowered
        .chars()
        .filter(|ch| ch.is_alphanumeric() || *ch == '_' || ch.is_whitespace())
        .collect();
    kept.trim().to_owned()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
