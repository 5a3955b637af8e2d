//! Word-level alignment of a transcription against a reference sentence.
//!
//! Both strings are normalized and split on whitespace, then compared
//! position by position. The word comparator is a startup choice: exact
//! equality or a character-level similarity ratio against a threshold.

use thiserror::Error;

use crate::model::{FeedbackItem, MatchPolicy, ScoreRecord, TrainerSettings};
use crate::normalize::normalize;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScoreError {
    /// The reference sentence normalizes to zero words. This is a data
    /// problem with the lesson, fatal to the current sentence only.
    #[error("reference sentence normalizes to zero words")]
    EmptyReference,
}

//
// ─── SCORER ────────────────────────────────────────────────────────────────────
//

/// Compares transcriptions against reference sentences.
///
/// Cheap to construct and copy; carries only the comparison policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scorer {
    policy: MatchPolicy,
    fuzzy_threshold: f64,
}

impl Scorer {
    #[must_use]
    pub fn from_settings(settings: &TrainerSettings) -> Self {
        Self {
            policy: settings.match_policy(),
            fuzzy_threshold: settings.fuzzy_threshold(),
        }
    }

    /// Scores a transcription against a reference sentence.
    ///
    /// Produces one feedback item per reference position (`Match`,
    /// `Mismatch`, or `Missing`), followed by one `Extra` per surplus user
    /// word. Accuracy counts only `Match` items:
    /// `round(matched / reference_words * 100, 2)`.
    ///
    /// # Errors
    ///
    /// Returns `ScoreError::EmptyReference` if the reference normalizes to
    /// zero words.
    pub fn score(&self, user_input: &str, reference: &str) -> Result<ScoreRecord, ScoreError> {
        let normalized_user = normalize(user_input);
        let normalized_ref = normalize(reference);
        let user_words: Vec<&str> = normalized_user.split_whitespace().collect();
        let ref_words: Vec<&str> = normalized_ref.split_whitespace().collect();

        if ref_words.is_empty() {
            return Err(ScoreError::EmptyReference);
        }

        let total = ref_words.len();
        let mut matched = 0_usize;
        let mut feedback = Vec::with_capacity(total.max(user_words.len()));

        for i in 0..total.max(user_words.len()) {
            match (ref_words.get(i), user_words.get(i)) {
                (Some(expected), Some(actual)) => {
                    if self.words_match(actual, expected) {
                        matched += 1;
                        feedback.push(FeedbackItem::Match {
                            expected: (*expected).to_owned(),
                        });
                    } else {
                        feedback.push(FeedbackItem::Mismatch {
                            expected: (*expected).to_owned(),
                            actual: (*actual).to_owned(),
                        });
                    }
                }
                (Some(expected), None) => feedback.push(FeedbackItem::Missing {
                    expected: (*expected).to_owned(),
                }),
                (None, Some(actual)) => feedback.push(FeedbackItem::Extra {
                    actual: (*actual).to_owned(),
                }),
                (None, None) => unreachable!("loop bounded by max of both lengths"),
            }
        }

        let accuracy = round_two(matched as f64 / total as f64 * 100.0);
        Ok(ScoreRecord::new(accuracy, feedback))
    }

    fn words_match(&self, actual: &str, expected: &str) -> bool {
        match self.policy {
            MatchPolicy::Exact => actual == expected,
            MatchPolicy::Fuzzy => similarity_ratio(actual, expected) >= self.fuzzy_threshold,
        }
    }
}

/// Character-level similarity in [0, 1]: `1 - lev(a, b) / max(|a|, |b|)`.
///
/// A word is always 1.0 similar to itself, so it matches at any threshold
/// up to and including 1.0.
#[must_use]
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    let a_len = a.chars().count();
    let b_len = b.chars().count();
    let max_len = a_len.max(b_len);
    if max_len == 0 {
        return 1.0;
    }
    let distance = levenshtein(a, b);
    1.0 - distance as f64 / max_len as f64
}

fn levenshtein(a: &str, b: &str) -> usize {
    let a_len = a.chars().count();
    if a_len == 0 {
        return b.chars().count();
    }
    let b_chars: Vec<char> = b.chars().collect();
    if b_chars.is_empty() {
        return a_len;
    }

    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0_usize; b_chars.len() + 1];
    for (i, a_ch) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, b_ch) in b_chars.iter().enumerate() {
            let substitution = prev[j] + usize::from(a_ch != *b_ch);
            let insertion = curr[j] + 1;
            let deletion = prev[j + 1] + 1;
            curr[j + 1] = substitution.min(insertion).min(deletion);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b_chars.len()]
}

fn round_two(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn exact_scorer() -> Scorer {
        Scorer::from_settings(&TrainerSettings::new(MatchPolicy::Exact, 0.85, true).unwrap())
    }

    fn fuzzy_scorer(threshold: f64) -> Scorer {
        Scorer::from_settings(&TrainerSettings::new(MatchPolicy::Fuzzy, threshold, true).unwrap())
    }

    #[test]
    fn identical_input_scores_hundred() {
        let record = exact_scorer()
            .score("het is vandaag dinsdag", "Het is vandaag dinsdag.")
            .unwrap();

        assert!((record.accuracy() - 100.0).abs() < f64::EPSILON);
        assert_eq!(record.feedback().len(), 4);
        assert!(record.feedback().iter().all(FeedbackItem::is_match));
    }

    #[test]
    fn empty_input_yields_zero_and_all_missing() {
        let record = exact_scorer()
            .score("   ", "Welke dag is het vandaag?")
            .unwrap();

        assert!((record.accuracy() - 0.0).abs() < f64::EPSILON);
        assert_eq!(record.feedback().len(), 5);
        assert!(record
            .feedback()
            .iter()
            .all(|item| matches!(item, FeedbackItem::Missing { .. })));
    }

    #[test]
    fn truncated_input_marks_trailing_missing() {
        // Scenario: four of five words, last one missing.
        let record = exact_scorer()
            .score("welke dag is het", "Welke dag is het vandaag?")
            .unwrap();

        assert!((record.accuracy() - 80.0).abs() < f64::EPSILON);
        let matches = record.feedback().iter().filter(|i| i.is_match()).count();
        assert_eq!(matches, 4);
        assert_eq!(
            record.feedback().last(),
            Some(&FeedbackItem::Missing {
                expected: "vandaag".into()
            })
        );
    }

    #[test]
    fn surplus_words_become_extras_after_positional_items() {
        let record = exact_scorer()
            .score("dan is het weekend toch wel", "Dan is het weekend.")
            .unwrap();

        assert_eq!(record.feedback().len(), 6);
        assert_eq!(
            &record.feedback()[4..],
            &[
                FeedbackItem::Extra {
                    actual: "toch".into()
                },
                FeedbackItem::Extra {
                    actual: "wel".into()
                },
            ]
        );
        // Extras never count toward accuracy.
        assert!((record.accuracy() - 100.0).abs() < f64::EPSILON);
        assert!(!record.is_perfect());
    }

    #[test]
    fn mismatch_carries_both_words() {
        let record = exact_scorer()
            .score("het is vandaag maandag", "Het is vandaag dinsdag.")
            .unwrap();

        assert!((record.accuracy() - 75.0).abs() < f64::EPSILON);
        assert_eq!(
            record.feedback()[3],
            FeedbackItem::Mismatch {
                expected: "dinsdag".into(),
                actual: "maandag".into()
            }
        );
    }

    #[test]
    fn empty_reference_is_rejected() {
        let err = exact_scorer().score("iets", " ?! ").unwrap_err();
        assert_eq!(err, ScoreError::EmptyReference);
    }

    #[test]
    fn fuzzy_accepts_near_miss() {
        // One substitution in a seven-letter word: ratio 6/7 ≈ 0.857.
        let record = fuzzy_scorer(0.85).score("dinsdak", "dinsdag").unwrap();
        assert!((record.accuracy() - 100.0).abs() < f64::EPSILON);

        // Exact mode rejects the same input.
        let record = exact_scorer().score("dinsdak", "dinsdag").unwrap();
        assert!((record.accuracy() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn self_similarity_is_one_at_any_threshold() {
        assert!((similarity_ratio("weekend", "weekend") - 1.0).abs() < f64::EPSILON);
        let record = fuzzy_scorer(1.0).score("weekend", "weekend").unwrap();
        assert!(record.is_perfect());
    }

    #[test]
    fn similarity_handles_multibyte_chars() {
        // Char-level, not byte-level: één vs een is one substitution over
        // three chars.
        let ratio = similarity_ratio("één", "een");
        assert!((ratio - (1.0 - 1.0 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn accuracy_rounds_to_two_decimals() {
        // 1 of 3 matched: 33.333... → 33.33
        let record = exact_scorer().score("gisteren", "Gisteren was het").unwrap();
        assert!((record.accuracy() - 33.33).abs() < f64::EPSILON);

        // 2 of 3 matched: 66.666... → 66.67
        let record = exact_scorer()
            .score("gisteren was", "Gisteren was het")
            .unwrap();
        assert!((record.accuracy() - 66.67).abs() < f64::EPSILON);
    }
}
