use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::Dataset;

/// Write the canonical dataset as pretty-printed JSON
///
/// The dataset's maps are ordered, so the same input always produces the
/// same bytes.
pub fn write_dataset_json(dataset: &Dataset, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    serde_json::to_writer_pretty(file, dataset).context("Failed to write dataset JSON")?;
    Ok(())
}

/// Human-readable view of a dataset: speaker comparison, transition counts,
/// and the turn-by-turn ledger
pub struct SummaryReport<'a> {
    dataset: &'a Dataset,
}

impl<'a> SummaryReport<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }

    /// Format the report as plain text
    pub fn format(&self) -> String {
        let mut out = String::new();
        let dataset = self.dataset;

        let _ = writeln!(out, "Conversation Analysis");
        let _ = writeln!(out, "=====================");
        let _ = writeln!(
            out,
            "Turns: {}  Speakers: {}  Words: {}  Duration: {:.1}s",
            dataset.turns.len(),
            dataset.profiles.len(),
            dataset.total_words,
            dataset.total_duration
        );

        for profile in dataset.profiles.values() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Speaker {}", profile.speaker);
            let _ = writeln!(out, "  Turns:              {}", profile.total_turns);
            let _ = writeln!(out, "  Words:              {}", profile.total_words);
            let _ = writeln!(out, "  Speaking time:      {:.1}s", profile.total_duration);
            let _ = writeln!(out, "  Interruptions made: {}", profile.interruption_count);
            let _ = writeln!(out, "  Times interrupted:  {}", profile.interrupted_count);
            let _ = writeln!(out, "  Disfluencies:       {}", profile.disfluency_count);
            let _ = writeln!(out, "  Questions:          {}", profile.question_count);
            let _ = writeln!(out, "  Mean pause:         {:.2}s", profile.mean_pause);
            let _ = writeln!(out, "  Type-token ratio:   {:.3}", profile.lexical_diversity);
            let _ = writeln!(out, "  MTLD:               {:.1}", profile.mtld);
            let _ = writeln!(out, "  FK grade level:     {:.1}", profile.readability);

            if !profile.top_words.is_empty() {
                let preview: Vec<String> = profile
                    .top_words
                    .iter()
                    .take(5)
                    .map(|w| format!("{} ({})", w.word, w.count))
                    .collect();
                let _ = writeln!(out, "  Top words:          {}", preview.join(", "));
            }
        }

        if !dataset.transitions.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Transitions");
            for (from, to, count) in dataset.transitions.iter() {
                let _ = writeln!(out, "  {} -> {}: {}", from, to, count);
            }
        }

        if !dataset.turns.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Turn Ledger");
            for turn in &dataset.turns {
                let mut flags = String::new();
                if turn.interruption {
                    flags.push_str(" [interrupts]");
                }
                if turn.interrupted {
                    flags.push_str(" [interrupted]");
                }
                let _ = writeln!(
                    out,
                    "  [{}] {} ({} words){} {}",
                    format_timestamp(turn.start),
                    turn.speaker,
                    turn.word_count,
                    flags,
                    turn.text()
                );
            }
        }

        out
    }

    /// Write the report to a text file
    pub fn write_file(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        write!(file, "{}", self.format())?;
        Ok(())
    }
}

/// Format seconds as MM:SS.d
fn format_timestamp(seconds: f64) -> String {
    let total = seconds.max(0.0);
    let minutes = (total / 60.0).floor() as u64;
    let secs = total - minutes as f64 * 60.0;
    format!("{:02}:{:04.1}", minutes, secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::parse_transcript_text;
    use crate::models::AnalysisConfig;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0.0), "00:00.0");
        assert_eq!(format_timestamp(1.5), "00:01.5");
        assert_eq!(format_timestamp(65.0), "01:05.0");
        assert_eq!(format_timestamp(3661.5), "61:01.5");
    }

    #[test]
    fn test_report_mentions_speakers_and_transitions() {
        let config = AnalysisConfig::default();
        let dataset = parse_transcript_text(
            "A: 00:00 Hello there\nB: 00:02 [uh] yes [overlap] but wait",
            &config,
        )
        .unwrap();

        let report = SummaryReport::new(&dataset).format();
        assert!(report.contains("Speaker A"));
        assert!(report.contains("Speaker B"));
        assert!(report.contains("A -> B: 1"));
        assert!(report.contains("[interrupts]"));
    }

    #[test]
    fn test_json_round_trip() {
        let config = AnalysisConfig::default();
        let dataset =
            parse_transcript_text("A: 00:00 testing one two three", &config).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataset.json");
        write_dataset_json(&dataset, &path).unwrap();

        let restored: Dataset =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(restored, dataset);
    }

    #[test]
    fn test_empty_dataset_report() {
        let report = SummaryReport::new(&Dataset::empty()).format();
        assert!(report.contains("Turns: 0"));
    }
}
