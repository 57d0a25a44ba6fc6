use crate::models::{AnalysisConfig, Token, TokenKind, Turn};
use crate::tokenizer::UNATTRIBUTED_SPEAKER;

/// Group the transcript-wide token stream into an ordered turn sequence
///
/// A new turn starts when the speaker changes, or when a silence longer than
/// the configured threshold interrupts the same speaker. Overlap detection is
/// evaluated first: silence-splitting is suppressed inside a turn that is
/// itself an interruption. Turns with no spoken content are not emitted.
/// Identical timestamps resolve by input order.
pub fn segment_turns(tokens: &[Token], config: &AnalysisConfig) -> Vec<Turn> {
    let mut segmenter = Segmenter::new(config);
    for token in tokens {
        segmenter.push(token);
    }
    segmenter.finish()
}

struct Segmenter<'a> {
    config: &'a AnalysisConfig,
    turns: Vec<Turn>,
    current: Option<Turn>,
    speaker: String,
    /// Start time for the next turn once content arrives
    pending_start: Option<f64>,
}

impl<'a> Segmenter<'a> {
    fn new(config: &'a AnalysisConfig) -> Self {
        Self {
            config,
            turns: Vec::new(),
            current: None,
            speaker: UNATTRIBUTED_SPEAKER.to_string(),
            pending_start: None,
        }
    }

    fn push(&mut self, token: &Token) {
        match token.kind {
            TokenKind::SpeakerChange => {
                if token.text != self.speaker {
                    self.close_current();
                    self.speaker = token.text.clone();
                    self.pending_start = Some(token.start);
                }
            }
            TokenKind::Silence => {
                if self.current.is_none() {
                    // Leading silence delays the next turn rather than
                    // belonging to it
                    self.pending_start = Some(token.end);
                    return;
                }

                // Overlap takes precedence: an interruption turn is never
                // split by an internal silence
                let interruption_turn = self.current.as_ref().is_some_and(|t| t.interruption);
                if token.duration() > self.config.silence_threshold && !interruption_turn {
                    self.close_current();
                    self.pending_start = Some(token.end);
                } else if let Some(turn) = &mut self.current {
                    turn.tokens.push(token.clone());
                    turn.end = turn.end.max(token.end);
                }
            }
            TokenKind::Overlap => {
                self.ensure_current(token.start);
                self.link_interruption();
                if let Some(turn) = &mut self.current {
                    turn.tokens.push(token.clone());
                }
            }
            TokenKind::Word | TokenKind::Filler => {
                self.ensure_current(token.start);
                if let Some(turn) = &mut self.current {
                    turn.tokens.push(token.clone());
                    turn.end = turn.end.max(token.end);
                }
            }
        }
    }

    fn finish(mut self) -> Vec<Turn> {
        self.close_current();
        self.turns
    }

    /// Open a turn for the current speaker if none is in progress
    ///
    /// The start time is clamped against the previous turn so that floor
    /// ownership stays exclusive per instant: a turn starting before its
    /// predecessor's declared end truncates that predecessor and the pair is
    /// marked as an interruption.
    fn ensure_current(&mut self, fallback_start: f64) {
        if self.current.is_some() {
            return;
        }

        let mut start = self.pending_start.take().unwrap_or(fallback_start);
        let mut turn = Turn::new(String::new(), self.speaker.clone(), start);

        if let Some(previous) = self.turns.last_mut() {
            if start < previous.start {
                // Regressed timestamp; the floor passes at the previous end
                start = previous.end;
                turn.start = start;
                turn.end = start;
            } else if start < previous.end {
                if previous.speaker != turn.speaker {
                    previous.interrupted = true;
                    previous.interrupted_by = Some(turn.speaker.clone());
                    turn.interruption = true;
                    turn.interrupts = Some(previous.speaker.clone());
                }
                previous.end = start;
            }
        }

        self.current = Some(turn);
    }

    /// Mark the current turn and the previously emitted one as an
    /// interruption pair when their speakers differ
    fn link_interruption(&mut self) {
        let Some(turn) = &mut self.current else {
            return;
        };
        let Some(previous) = self.turns.last_mut() else {
            return;
        };
        if previous.speaker == turn.speaker {
            return;
        }

        turn.interruption = true;
        turn.interrupts = Some(previous.speaker.clone());
        previous.interrupted = true;
        previous.interrupted_by = Some(turn.speaker.clone());
    }

    fn close_current(&mut self) {
        if let Some(mut turn) = self.current.take() {
            if turn.has_content() {
                turn.turn_id = format!("turn_{}", self.turns.len());
                self.turns.push(turn);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn segment(text: &str, config: &AnalysisConfig) -> Vec<Turn> {
        let tokens = tokenize(text, config).unwrap();
        segment_turns(&tokens, config)
    }

    #[test]
    fn test_speaker_change_starts_new_turn() {
        let config = AnalysisConfig::default();
        let turns = segment("A: 00:00 Hello there\nB: 00:02 General Kenobi", &config);

        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].speaker, "A");
        assert_eq!(turns[0].turn_id, "turn_0");
        assert_eq!(turns[1].speaker, "B");
        assert_eq!(turns[1].start, 2.0);
    }

    #[test]
    fn test_single_speaker_single_turn() {
        let config = AnalysisConfig::default();
        let turns = segment("A: 00:00 one\nA: 00:05 two\nstill going", &config);

        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].speaker, "A");
    }

    #[test]
    fn test_overlap_marks_interruption_pair() {
        let config = AnalysisConfig::default();
        let turns = segment(
            "A: 00:00 Hello there\nB: 00:02 [uh] yes [overlap] but wait",
            &config,
        );

        assert_eq!(turns.len(), 2);
        assert!(turns[0].interrupted);
        assert_eq!(turns[0].interrupted_by.as_deref(), Some("B"));
        assert!(!turns[0].interruption);
        assert!(turns[1].interruption);
        assert_eq!(turns[1].interrupts.as_deref(), Some("A"));
        assert!(!turns[1].interrupted);
    }

    #[test]
    fn test_long_silence_splits_same_speaker() {
        let config = AnalysisConfig::default();
        let turns = segment("A: 00:00 before the gap [silence: 3.0s] after the gap", &config);

        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].speaker, "A");
        assert_eq!(turns[1].speaker, "A");
        assert!((turns[1].start - 3.0).abs() < 1e-9);
        // The splitting silence belongs to neither turn
        assert!(
            turns
                .iter()
                .all(|t| !t.tokens.iter().any(|tok| tok.kind == TokenKind::Silence))
        );
    }

    #[test]
    fn test_threshold_silence_does_not_split() {
        let config = AnalysisConfig::default();
        // Exactly at the threshold: "exceeds" means strictly greater
        let turns = segment("A: 00:00 before [silence: 2.0s] after", &config);

        assert_eq!(turns.len(), 1);
        assert_eq!(
            turns[0]
                .tokens
                .iter()
                .filter(|t| t.kind == TokenKind::Silence)
                .count(),
            1
        );
    }

    #[test]
    fn test_overlap_suppresses_silence_split() {
        let config = AnalysisConfig::default();
        let turns = segment(
            "A: 00:00 talking along here\nB: 00:03 [overlap] no [silence: 4.0s] listen",
            &config,
        );

        // B's interruption turn stays whole despite the long internal silence
        assert_eq!(turns.len(), 2);
        assert!(turns[1].interruption);
        assert_eq!(turns[1].tokens.iter().filter(|t| t.is_content()).count(), 2);
    }

    #[test]
    fn test_timing_overlap_without_marker() {
        let config = AnalysisConfig::default();
        // A's trailing silence extends its end past B's start
        let turns = segment(
            "A: 00:00 hello [silence: 1.5s]\nB: 00:01 hi there",
            &config,
        );

        assert_eq!(turns.len(), 2);
        assert!(turns[0].interrupted);
        assert_eq!(turns[0].interrupted_by.as_deref(), Some("B"));
        assert!(turns[1].interruption);
        // Floor ownership stays exclusive: A is truncated at B's start
        assert!((turns[0].end - 1.0).abs() < 1e-9);
        assert_eq!(turns[1].start, 1.0);
    }

    #[test]
    fn test_leading_silence_delays_turn_start() {
        let config = AnalysisConfig::default();
        let turns = segment("A: 00:00 [silence: 1.0s] late start", &config);

        assert_eq!(turns.len(), 1);
        assert!((turns[0].start - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_same_speaker_relabel_continues_turn() {
        let config = AnalysisConfig::default();
        let turns = segment("A: 00:00 first\nA: 00:01 second", &config);

        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].end, 1.0);
    }

    #[test]
    fn test_empty_stream_yields_no_turns() {
        let config = AnalysisConfig::default();
        assert!(segment("", &config).is_empty());
    }

    #[test]
    fn test_turns_ordered_with_nonnegative_spans() {
        let config = AnalysisConfig::default();
        let turns = segment(
            "A: 00:00 one two\nB: 00:02 three\nA: 00:04 four [silence: 3.0s] five\nB: 00:09 six",
            &config,
        );

        let mut previous = f64::NEG_INFINITY;
        for turn in &turns {
            assert!(turn.end >= turn.start);
            assert!(turn.start >= previous);
            previous = turn.start;
        }
    }
}
