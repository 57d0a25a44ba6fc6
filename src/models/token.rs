use serde::{Deserialize, Serialize};

/// Classification of a parsed transcript token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    /// Plain spoken word (includes unrecognized bracketed markers)
    Word,
    /// Filler utterance from the configured disfluency vocabulary
    Filler,
    /// Explicit silence annotation with a duration
    Silence,
    /// Simultaneous-speech start marker
    Overlap,
    /// Speaker label change; text carries the speaker id
    SpeakerChange,
}

/// Smallest parsed unit of a transcript line - immutable once produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// What this token represents
    pub kind: TokenKind,
    /// Raw text value (speaker id for SpeakerChange tokens)
    pub text: String,
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds (start + duration for silences)
    pub end: f64,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            kind,
            text: text.into(),
            start,
            end,
        }
    }

    /// Point token at a single instant (words, fillers, markers)
    pub fn at(kind: TokenKind, text: impl Into<String>, time: f64) -> Self {
        Self::new(kind, text, time, time)
    }

    /// Duration of this token in seconds
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    /// Whether this token contributes spoken content to a turn
    pub fn is_content(&self) -> bool {
        matches!(self.kind, TokenKind::Word | TokenKind::Filler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_duration() {
        let word = Token::at(TokenKind::Word, "hello", 1.5);
        assert_eq!(word.duration(), 0.0);

        let silence = Token::new(TokenKind::Silence, "[silence: 2.3s]", 1.5, 3.8);
        assert!((silence.duration() - 2.3).abs() < 1e-9);
    }

    #[test]
    fn test_content_kinds() {
        assert!(Token::at(TokenKind::Word, "hi", 0.0).is_content());
        assert!(Token::at(TokenKind::Filler, "um", 0.0).is_content());
        assert!(!Token::at(TokenKind::Overlap, "[overlap]", 0.0).is_content());
        assert!(!Token::at(TokenKind::SpeakerChange, "A", 0.0).is_content());
    }
}
