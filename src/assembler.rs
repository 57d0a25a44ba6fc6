use crate::error::AssemblyError;
use crate::metrics::MetricsSummary;
use crate::models::{Dataset, Turn};

/// Combine enriched turns and computed aggregates into the canonical dataset
///
/// An empty transcript is a valid degenerate dataset, not an error. The
/// invariant checks are defensive: none of them is reachable from the
/// segmenter and metrics engine on well-formed input, and any failure here
/// aborts the run rather than handing renderers a partial dataset.
pub fn assemble(turns: Vec<Turn>, summary: MetricsSummary) -> Result<Dataset, AssemblyError> {
    if turns.is_empty() {
        return Ok(Dataset::empty());
    }

    let mut previous_start = f64::NEG_INFINITY;
    for turn in &turns {
        if turn.end < turn.start {
            return Err(AssemblyError::InvalidTurnSpan {
                turn_id: turn.turn_id.clone(),
                start: turn.start,
                end: turn.end,
            });
        }
        if turn.start < previous_start {
            return Err(AssemblyError::UnorderedTurns {
                turn_id: turn.turn_id.clone(),
                start: turn.start,
                previous_start,
            });
        }
        previous_start = turn.start;

        if !summary.profiles.contains_key(&turn.speaker) {
            return Err(AssemblyError::MissingProfile {
                turn_id: turn.turn_id.clone(),
                speaker: turn.speaker.clone(),
            });
        }
    }

    Ok(Dataset {
        turns,
        profiles: summary.profiles,
        transitions: summary.transitions,
        total_duration: summary.total_duration,
        total_words: summary.total_words,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::compute_metrics;
    use crate::models::{AnalysisConfig, TransitionMatrix};
    use crate::segmenter::segment_turns;
    use crate::tokenizer::tokenize;
    use std::collections::BTreeMap;

    fn empty_summary() -> MetricsSummary {
        MetricsSummary {
            profiles: BTreeMap::new(),
            transitions: TransitionMatrix::new(),
            total_words: 0,
            total_duration: 0.0,
        }
    }

    #[test]
    fn test_empty_transcript_is_degenerate_not_an_error() {
        let dataset = assemble(Vec::new(), empty_summary()).unwrap();
        assert!(dataset.turns.is_empty());
        assert!(dataset.profiles.is_empty());
        assert_eq!(dataset.total_words, 0);
    }

    #[test]
    fn test_well_formed_pipeline_assembles() {
        let config = AnalysisConfig::default();
        let tokens = tokenize("A: 00:00 hello\nB: 00:02 there", &config).unwrap();
        let mut turns = segment_turns(&tokens, &config);
        let summary = compute_metrics(&mut turns);

        let dataset = assemble(turns, summary).unwrap();
        assert_eq!(dataset.turns.len(), 2);
        assert_eq!(dataset.speakers(), vec!["A", "B"]);
        assert_eq!(dataset.transitions.count("A", "B"), 1);
    }

    #[test]
    fn test_missing_profile_is_fatal() {
        let turn = Turn::new("turn_0".to_string(), "ghost".to_string(), 0.0);
        let err = assemble(vec![turn], empty_summary()).unwrap_err();

        assert!(matches!(err, AssemblyError::MissingProfile { speaker, .. } if speaker == "ghost"));
    }

    #[test]
    fn test_inverted_span_is_fatal() {
        let mut turn = Turn::new("turn_0".to_string(), "A".to_string(), 5.0);
        turn.end = 4.0;
        let err = assemble(vec![turn], empty_summary()).unwrap_err();

        assert!(matches!(err, AssemblyError::InvalidTurnSpan { .. }));
    }

    #[test]
    fn test_unordered_turns_are_fatal() {
        let first = Turn::new("turn_0".to_string(), "A".to_string(), 5.0);
        let second = Turn::new("turn_1".to_string(), "A".to_string(), 1.0);

        let mut summary = empty_summary();
        summary
            .profiles
            .insert("A".to_string(), crate::models::SpeakerProfile::new("A".to_string()));

        let err = assemble(vec![first, second], summary).unwrap_err();
        assert!(matches!(err, AssemblyError::UnorderedTurns { .. }));
    }
}
