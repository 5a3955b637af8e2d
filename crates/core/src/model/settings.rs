use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("fuzzy threshold must be in (0, 1], got {0}")]
    InvalidFuzzyThreshold(f64),
}

//
// ─── MATCH POLICY ──────────────────────────────────────────────────────────────
//

/// Word-comparison policy, selected once at startup.
///
/// - `Exact`: case-normalized string equality.
/// - `Fuzzy`: character-level similarity ratio against a threshold, so
///   near-misses like a single transposed letter still count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    Exact,
    #[default]
    Fuzzy,
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Configuration for a practice run.
///
/// Covers the scoring policy and the listening gate. These are startup
/// choices, never inferred at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainerSettings {
    match_policy: MatchPolicy,
    fuzzy_threshold: f64,
    strict_listening: bool,
}

impl TrainerSettings {
    /// Default trainer settings: fuzzy matching at 0.85, strict
    /// listen-once gating.
    #[must_use]
    pub fn default_strict() -> Self {
        Self {
            match_policy: MatchPolicy::Fuzzy,
            fuzzy_threshold: 0.85,
            strict_listening: true,
        }
    }

    /// Creates custom settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidFuzzyThreshold` if the threshold is
    /// not a finite value in (0, 1].
    pub fn new(
        match_policy: MatchPolicy,
        fuzzy_threshold: f64,
        strict_listening: bool,
    ) -> Result<Self, SettingsError> {
        if !fuzzy_threshold.is_finite() || fuzzy_threshold <= 0.0 || fuzzy_threshold > 1.0 {
            return Err(SettingsError::InvalidFuzzyThreshold(fuzzy_threshold));
        }

        Ok(Self {
            match_policy,
            fuzzy_threshold,
            strict_listening,
        })
    }

    // Accessors
    #[must_use]
    pub fn match_policy(&self) -> MatchPolicy {
        self.match_policy
    }

    #[must_use]
    pub fn fuzzy_threshold(&self) -> f64 {
        self.fuzzy_threshold
    }

    /// When true, each sentence may be listened to exactly once and typing
    /// only unlocks after listening finishes.
    #[must_use]
    pub fn strict_listening(&self) -> bool {
        self.strict_listening
    }
}

impl Default for TrainerSettings {
    fn default() -> Self {
        Self::default_strict()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
