use std::path::Path;

use tracing::debug;

use crate::assembler::assemble;
use crate::error::Result;
use crate::metrics::compute_metrics;
use crate::models::{AnalysisConfig, Dataset};
use crate::segmenter::segment_turns;
use crate::tokenizer::tokenize;

/// Parse a transcript file into the canonical dataset
pub fn parse_transcript_file(path: &Path, config: &AnalysisConfig) -> Result<Dataset> {
    let content = std::fs::read_to_string(path)?;
    parse_transcript_text(&content, config)
}

/// Run the full pipeline over transcript text: tokenize, segment, compute
/// metrics, assemble
///
/// The configuration is validated before any parsing begins; each run owns
/// its own dataset and shares no state with other runs.
pub fn parse_transcript_text(text: &str, config: &AnalysisConfig) -> Result<Dataset> {
    config.validate()?;

    let tokens = tokenize(text, config)?;
    debug!("tokenized {} tokens", tokens.len());

    let mut turns = segment_turns(&tokens, config);
    debug!("segmented {} turns", turns.len());

    let summary = compute_metrics(&mut turns);
    let dataset = assemble(turns, summary)?;
    Ok(dataset)
}
