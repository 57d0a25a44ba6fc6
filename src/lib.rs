pub mod assembler;
pub mod error;
pub mod io;
pub mod metrics;
pub mod models;
pub mod segmenter;
pub mod tokenizer;

pub use assembler::assemble;
pub use error::{AssemblyError, ConfigurationError, Error, ParseError, Result};
pub use io::{parse_transcript_file, parse_transcript_text, write_dataset_json, SummaryReport};
pub use metrics::{compute_metrics, MetricsSummary};
pub use models::{
    AnalysisConfig, Dataset, SpeakerProfile, TimestampFormat, Token, TokenKind, TransitionMatrix,
    Turn, WordCount,
};
pub use segmenter::segment_turns;
pub use tokenizer::{tokenize, LineTokenizer};
