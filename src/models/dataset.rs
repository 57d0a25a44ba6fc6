use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Turn;

/// A word and how often a speaker used it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

/// Aggregate metrics for one speaker across the whole transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerProfile {
    /// Speaker id this profile describes
    pub speaker: String,
    /// Total word tokens spoken
    pub total_words: usize,
    /// Total turns taken
    pub total_turns: usize,
    /// Sum of turn durations in seconds
    pub total_duration: f64,
    /// Turns where this speaker interrupted another
    pub interruption_count: usize,
    /// Turns where this speaker was interrupted
    pub interrupted_count: usize,
    /// Total filler tokens
    pub disfluency_count: usize,
    /// Turns containing a question
    pub question_count: usize,
    /// Mean of per-turn internal silence totals in seconds
    pub mean_pause: f64,
    /// Type-token ratio over this speaker's full word list, in [0, 1]
    pub lexical_diversity: f64,
    /// Measure of textual lexical diversity (factor threshold 0.72)
    pub mtld: f64,
    /// Flesch-Kincaid grade level of this speaker's concatenated speech
    pub readability: f64,
    /// Most frequent content words, stop-word filtered
    pub top_words: Vec<WordCount>,
}

impl SpeakerProfile {
    pub fn new(speaker: String) -> Self {
        Self {
            speaker,
            total_words: 0,
            total_turns: 0,
            total_duration: 0.0,
            interruption_count: 0,
            interrupted_count: 0,
            disfluency_count: 0,
            question_count: 0,
            mean_pause: 0.0,
            lexical_diversity: 0.0,
            mtld: 0.0,
            readability: 0.0,
            top_words: Vec::new(),
        }
    }
}

/// Counts of speaker-to-speaker floor changes across adjacent turns
///
/// Self-transitions (the same speaker continuing across a silence-induced
/// turn break) are never recorded; they are not a change of floor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionMatrix {
    counts: BTreeMap<String, BTreeMap<String, u64>>,
}

impl TransitionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one floor change from one speaker to another
    pub fn record(&mut self, from: &str, to: &str) {
        if from == to {
            return;
        }
        *self
            .counts
            .entry(from.to_string())
            .or_default()
            .entry(to.to_string())
            .or_insert(0) += 1;
    }

    /// Transition count for a specific speaker pair
    pub fn count(&self, from: &str, to: &str) -> u64 {
        self.counts
            .get(from)
            .and_then(|row| row.get(to))
            .copied()
            .unwrap_or(0)
    }

    /// Total number of recorded floor changes
    pub fn total(&self) -> u64 {
        self.counts.values().flat_map(|row| row.values()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate (from, to, count) entries in deterministic order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, u64)> {
        self.counts.iter().flat_map(|(from, row)| {
            row.iter()
                .map(move |(to, count)| (from.as_str(), to.as_str(), *count))
        })
    }
}

/// Canonical output of a pipeline run - immutable once assembled
///
/// This is the sole artifact handed to renderers: the turn ledger, the
/// per-speaker profiles, and the global aggregates. Maps are ordered so
/// that serializing the same input twice produces identical bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// All turns in start-time order
    pub turns: Vec<Turn>,
    /// Aggregate metrics keyed by speaker id
    pub profiles: BTreeMap<String, SpeakerProfile>,
    /// Floor-change counts between speakers
    pub transitions: TransitionMatrix,
    /// Span from first turn start to last turn end, in seconds
    pub total_duration: f64,
    /// Total word tokens across all turns
    pub total_words: usize,
}

impl Dataset {
    /// Degenerate dataset for an empty transcript
    pub fn empty() -> Self {
        Self {
            turns: Vec::new(),
            profiles: BTreeMap::new(),
            transitions: TransitionMatrix::new(),
            total_duration: 0.0,
            total_words: 0,
        }
    }

    /// Speaker ids present, in deterministic order
    pub fn speakers(&self) -> Vec<&str> {
        self.profiles.keys().map(String::as_str).collect()
    }
}
