//! Error types for the analysis pipeline organized by stage.

use thiserror::Error;

/// Pipeline error variants organized by stage.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid caller-supplied configuration
    #[error(transparent)]
    Config(#[from] ConfigurationError),

    /// Tokenizer failure on a transcript line
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Dataset construction invariant violation
    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    /// IO error while reading a transcript
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Configuration errors, checked before any parsing begins.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Silence threshold must be a positive finite number of seconds
    #[error("invalid silence threshold: {0}s (must be finite and > 0)")]
    InvalidSilenceThreshold(f64),

    /// Filler vocabulary entries must be non-empty
    #[error("filler vocabulary contains an empty word")]
    EmptyFillerWord,
}

/// Tokenizer errors carrying enough context to locate the offending line.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A leading field looked like a timestamp but failed to parse
    #[error("line {line}: malformed timestamp {found:?} in {content:?}")]
    MalformedTimestamp {
        /// 1-based line number in the input
        line: usize,
        /// The field that failed to parse
        found: String,
        /// The raw line text
        content: String,
    },
}

impl ParseError {
    /// 1-based line number the error occurred on
    pub fn line(&self) -> usize {
        match self {
            ParseError::MalformedTimestamp { line, .. } => *line,
        }
    }
}

/// Dataset construction errors. Always fatal: a partial dataset is never
/// handed to renderers, and any of these indicates a defect upstream.
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// A turn references a speaker with no profile
    #[error("turn {turn_id} references speaker {speaker:?} with no profile")]
    MissingProfile { turn_id: String, speaker: String },

    /// A turn ends before it starts
    #[error("turn {turn_id} has end {end}s before start {start}s")]
    InvalidTurnSpan {
        turn_id: String,
        start: f64,
        end: f64,
    },

    /// Turn sequence is not ordered by start time
    #[error("turn {turn_id} starts at {start}s, before its predecessor at {previous_start}s")]
    UnorderedTurns {
        turn_id: String,
        start: f64,
        previous_start: f64,
    },
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;
