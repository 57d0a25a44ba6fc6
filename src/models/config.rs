use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, Result};

/// How a timestamp field in a transcript line is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// `MM:SS` (optionally with a fractional seconds part); a three-part
    /// stamp is rejected.
    MinutesSeconds,
    /// `HH:MM:SS` (optionally with a fractional seconds part).
    HoursMinutesSeconds,
}

impl Default for TimestampFormat {
    fn default() -> Self {
        TimestampFormat::MinutesSeconds
    }
}

/// Caller-supplied configuration for the analysis pipeline.
///
/// Validated by [`AnalysisConfig::validate`] before any parsing begins; each
/// run owns its own configuration and shares no state with other runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Disfluency vocabulary: lowercased words classified as fillers.
    pub fillers: BTreeSet<String>,
    /// Minimum same-speaker gap, in seconds, that marks a silence boundary.
    pub silence_threshold: f64,
    /// How leading timestamp fields are interpreted.
    pub timestamp_format: TimestampFormat,
    /// When true, lines that fail to parse are skipped with a warning instead
    /// of failing the whole run.
    pub skip_malformed_lines: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            fillers: ["uh", "um", "hmm", "yeah", "like"]
                .iter()
                .map(|w| w.to_string())
                .collect(),
            silence_threshold: 2.0,
            timestamp_format: TimestampFormat::default(),
            skip_malformed_lines: false,
        }
    }
}

impl AnalysisConfig {
    /// Validate the configuration before any parsing begins.
    pub fn validate(&self) -> Result<()> {
        if !self.silence_threshold.is_finite() || self.silence_threshold <= 0.0 {
            return Err(ConfigurationError::InvalidSilenceThreshold(self.silence_threshold).into());
        }
        if self.fillers.iter().any(|w| w.is_empty()) {
            return Err(ConfigurationError::EmptyFillerWord.into());
        }
        Ok(())
    }

    /// Whether a (lowercased) word is in the configured filler vocabulary.
    pub fn is_filler(&self, word: &str) -> bool {
        self.fillers.contains(word)
    }
}
