pub mod lexical;
pub mod readability;

use std::collections::BTreeMap;

use crate::models::{SpeakerProfile, TokenKind, TransitionMatrix, Turn};

use lexical::{mtld, normalize_word, type_token_ratio, word_frequencies};
use readability::grade_level;

/// Per-speaker profiles and global aggregates for one transcript pass
#[derive(Debug, Clone)]
pub struct MetricsSummary {
    /// Aggregate metrics keyed by speaker id
    pub profiles: BTreeMap<String, SpeakerProfile>,
    /// Floor-change counts between speakers
    pub transitions: TransitionMatrix,
    /// Total word tokens across all turns
    pub total_words: usize,
    /// Span from first turn start to last turn end, in seconds
    pub total_duration: f64,
}

/// Compute per-turn and aggregate metrics over the segmented turn sequence
///
/// Turns are enriched in place (word counts, disfluencies, internal
/// silences, question flags); the returned summary carries everything else.
/// Numeric edge cases never fail: a speaker with zero words or zero pauses
/// gets 0.0 for the affected ratios.
pub fn compute_metrics(turns: &mut [Turn]) -> MetricsSummary {
    for turn in turns.iter_mut() {
        enrich_turn(turn);
    }

    let mut accumulators: BTreeMap<String, SpeakerAccumulator> = BTreeMap::new();
    for turn in turns.iter() {
        accumulators
            .entry(turn.speaker.clone())
            .or_default()
            .add(turn);
    }

    let profiles: BTreeMap<String, SpeakerProfile> = accumulators
        .into_iter()
        .map(|(speaker, accumulator)| {
            let profile = accumulator.into_profile(speaker.clone());
            (speaker, profile)
        })
        .collect();

    let mut transitions = TransitionMatrix::new();
    for pair in turns.windows(2) {
        transitions.record(&pair[0].speaker, &pair[1].speaker);
    }

    let total_words = turns.iter().map(|t| t.word_count).sum();
    let total_duration = match (turns.first(), turns.last()) {
        (Some(first), Some(last)) => (last.end - first.start).max(0.0),
        _ => 0.0,
    };

    MetricsSummary {
        profiles,
        transitions,
        total_words,
        total_duration,
    }
}

/// Fill a turn's derived fields from its own token sequence
fn enrich_turn(turn: &mut Turn) {
    turn.word_count = turn
        .tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Word)
        .count();
    turn.disfluency_count = turn
        .tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Filler)
        .count();
    turn.silence_durations = turn
        .tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Silence)
        .map(|t| t.duration())
        .collect();
    turn.contains_question = turn
        .tokens
        .iter()
        .any(|t| t.kind == TokenKind::Word && t.text.contains('?'));
}

/// Running totals for one speaker while walking the turn sequence
#[derive(Debug, Default)]
struct SpeakerAccumulator {
    total_words: usize,
    total_turns: usize,
    total_duration: f64,
    interruption_count: usize,
    interrupted_count: usize,
    disfluency_count: usize,
    question_count: usize,
    /// Per-turn internal silence totals in seconds
    pause_totals: Vec<f64>,
    /// Raw word texts in order, for readability
    raw_words: Vec<String>,
    /// Normalized word forms in order, for lexical diversity
    forms: Vec<String>,
}

impl SpeakerAccumulator {
    fn add(&mut self, turn: &Turn) {
        self.total_words += turn.word_count;
        self.total_turns += 1;
        self.total_duration += turn.duration();
        self.interruption_count += usize::from(turn.interruption);
        self.interrupted_count += usize::from(turn.interrupted);
        self.disfluency_count += turn.disfluency_count;
        self.question_count += usize::from(turn.contains_question);
        self.pause_totals.push(turn.silence_total());

        for token in &turn.tokens {
            if token.kind == TokenKind::Word {
                self.raw_words.push(token.text.clone());
                if let Some(form) = normalize_word(&token.text) {
                    self.forms.push(form);
                }
            }
        }
    }

    fn into_profile(self, speaker: String) -> SpeakerProfile {
        let mean_pause = if self.pause_totals.is_empty() {
            0.0
        } else {
            self.pause_totals.iter().sum::<f64>() / self.pause_totals.len() as f64
        };

        SpeakerProfile {
            speaker,
            total_words: self.total_words,
            total_turns: self.total_turns,
            total_duration: self.total_duration,
            interruption_count: self.interruption_count,
            interrupted_count: self.interrupted_count,
            disfluency_count: self.disfluency_count,
            question_count: self.question_count,
            mean_pause,
            lexical_diversity: type_token_ratio(&self.forms, self.total_words),
            mtld: mtld(&self.forms),
            readability: grade_level(&self.raw_words),
            top_words: word_frequencies(&self.forms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnalysisConfig;
    use crate::segmenter::segment_turns;
    use crate::tokenizer::tokenize;

    fn run(text: &str) -> (Vec<Turn>, MetricsSummary) {
        let config = AnalysisConfig::default();
        let tokens = tokenize(text, &config).unwrap();
        let mut turns = segment_turns(&tokens, &config);
        let summary = compute_metrics(&mut turns);
        (turns, summary)
    }

    #[test]
    fn test_scenario_two_turns() {
        let (turns, summary) = run("A: 00:00 Hello there\nB: 00:02 [uh] yes [overlap] but wait");

        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].word_count, 2);
        assert_eq!(turns[0].disfluency_count, 0);
        assert_eq!(turns[1].disfluency_count, 1);
        assert!(turns[1].interruption);
        assert_eq!(turns[1].interrupts.as_deref(), Some("A"));
        assert_eq!(summary.transitions.count("A", "B"), 1);
    }

    #[test]
    fn test_word_count_conservation() {
        let text = "A: 00:00 Hello there friend\nB: 00:03 [uh] yes [cough] wait\nA: 00:06 done";
        let config = AnalysisConfig::default();
        let tokens = tokenize(text, &config).unwrap();
        let word_tokens = tokens.iter().filter(|t| t.kind == TokenKind::Word).count();

        let (turns, summary) = run(text);
        let per_turn: usize = turns.iter().map(|t| t.word_count).sum();
        let per_speaker: usize = summary.profiles.values().map(|p| p.total_words).sum();

        assert_eq!(per_turn, word_tokens);
        assert_eq!(per_speaker, word_tokens);
        assert_eq!(summary.total_words, word_tokens);
    }

    #[test]
    fn test_unrecognized_marker_counts_as_word() {
        let (turns, _) = run("A: 00:00 [cough] hello");

        assert_eq!(turns[0].word_count, 2);
        assert_eq!(turns[0].disfluency_count, 0);
    }

    #[test]
    fn test_silence_split_excluded_from_transitions() {
        let (turns, summary) = run("A: 00:00 before [silence: 3.0s] after");

        assert_eq!(turns.len(), 2);
        assert!(summary.transitions.is_empty());
    }

    #[test]
    fn test_interruption_counts_per_speaker() {
        let (_, summary) = run("A: 00:00 talking\nB: 00:01 [overlap] no\nA: 00:03 fine");

        assert_eq!(summary.profiles["A"].interrupted_count, 1);
        assert_eq!(summary.profiles["A"].interruption_count, 0);
        assert_eq!(summary.profiles["B"].interruption_count, 1);
        assert_eq!(summary.profiles["B"].interrupted_count, 0);
    }

    #[test]
    fn test_lexical_diversity_in_bounds() {
        let (_, summary) = run("A: 00:00 go go go go\nB: 00:02 every word fresh here");

        let a = &summary.profiles["A"];
        let b = &summary.profiles["B"];
        assert!((a.lexical_diversity - 0.25).abs() < 1e-9);
        assert_eq!(b.lexical_diversity, 1.0);
    }

    #[test]
    fn test_zero_word_speaker_gets_sentinels() {
        // B contributes only a filler: a turn with no words at all
        let (_, summary) = run("A: 00:00 some words here\nB: 00:02 [uh] um");

        let b = &summary.profiles["B"];
        assert_eq!(b.total_words, 0);
        assert_eq!(b.lexical_diversity, 0.0);
        assert_eq!(b.mtld, 0.0);
        assert_eq!(b.readability, 0.0);
        assert_eq!(b.disfluency_count, 2);
    }

    #[test]
    fn test_mean_pause_is_per_turn_average() {
        let (_, summary) = run(
            "A: 00:00 one [silence: 1.0s] two\nB: 00:05 brief\nA: 00:07 three [silence: 0.5s] four",
        );

        // A's two turns hold 1.0s and 0.5s of internal silence
        let a = &summary.profiles["A"];
        assert!((a.mean_pause - 0.75).abs() < 1e-9);
        assert_eq!(summary.profiles["B"].mean_pause, 0.0);
    }

    #[test]
    fn test_question_detection() {
        let (turns, summary) = run("A: 00:00 ready? yes\nB: 00:02 sure thing");

        assert!(turns[0].contains_question);
        assert!(!turns[1].contains_question);
        assert_eq!(summary.profiles["A"].question_count, 1);
        assert_eq!(summary.profiles["B"].question_count, 0);
    }

    #[test]
    fn test_total_duration_spans_the_transcript() {
        let (_, summary) = run("A: 00:00 start\nB: 00:10 end [silence: 1.0s]");
        assert!((summary.total_duration - 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_transcript_summary() {
        let (turns, summary) = run("");
        assert!(turns.is_empty());
        assert!(summary.profiles.is_empty());
        assert!(summary.transitions.is_empty());
        assert_eq!(summary.total_words, 0);
        assert_eq!(summary.total_duration, 0.0);
    }
}
