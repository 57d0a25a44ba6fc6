use serde::{Deserialize, Serialize};

use super::{Token, TokenKind};

/// One contiguous speaking span attributed to a single speaker
///
/// Created by the segmenter with its token sequence and interruption flags;
/// the derived count fields are filled in by the metrics engine and the turn
/// is never mutated after the dataset is assembled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// Deterministic identifier ("turn_0", "turn_1", ...)
    pub turn_id: String,
    /// Speaker id this turn is attributed to
    pub speaker: String,
    /// Tokens owned by this turn, in input order
    pub tokens: Vec<Token>,
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    /// Count of word tokens (derived)
    pub word_count: usize,
    /// Count of filler tokens (derived)
    pub disfluency_count: usize,
    /// Durations of silences strictly inside this turn (derived)
    pub silence_durations: Vec<f64>,
    /// Whether any word in this turn carries a question mark (derived)
    pub contains_question: bool,
    /// This turn was cut off by another speaker
    pub interrupted: bool,
    /// Speaker id that cut this turn off - identifier only, never a reference
    pub interrupted_by: Option<String>,
    /// This turn began before the prior turn's declared end
    pub interruption: bool,
    /// Speaker id of the turn this one cut off
    pub interrupts: Option<String>,
}

impl Turn {
    /// Create a bare turn; derived fields are filled by the metrics engine
    pub fn new(turn_id: String, speaker: String, start: f64) -> Self {
        Self {
            turn_id,
            speaker,
            tokens: Vec::new(),
            start,
            end: start,
            word_count: 0,
            disfluency_count: 0,
            silence_durations: Vec::new(),
            contains_question: false,
            interrupted: false,
            interrupted_by: None,
            interruption: false,
            interrupts: None,
        }
    }

    /// Duration of this turn in seconds
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    /// Whether this turn holds any spoken content
    pub fn has_content(&self) -> bool {
        self.tokens.iter().any(Token::is_content)
    }

    /// Total internal silence in seconds
    pub fn silence_total(&self) -> f64 {
        self.silence_durations.iter().sum()
    }

    /// Words of this turn joined with spaces
    pub fn text(&self) -> String {
        let words: Vec<&str> = self
            .tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Word)
            .map(|t| t.text.as_str())
            .collect();
        words.join(" ")
    }
}
