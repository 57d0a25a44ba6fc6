use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use colloquy::{
    parse_transcript_file, write_dataset_json, AnalysisConfig, SummaryReport, TimestampFormat,
};

#[derive(Parser)]
#[command(name = "colloquy")]
#[command(author, version, about = "Conversation transcript analysis pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a transcript and print speaker statistics
    Analyze {
        /// Input transcript file (plain text, one utterance per line)
        #[arg(short, long)]
        input: PathBuf,

        /// Silence duration in seconds that splits a turn
        #[arg(long, default_value = "2.0")]
        silence_threshold: f64,

        /// Comma-separated filler vocabulary (defaults to uh,um,hmm,yeah,like)
        #[arg(long)]
        fillers: Option<String>,

        /// Interpret timestamps as HH:MM:SS instead of MM:SS
        #[arg(long)]
        hours: bool,

        /// Skip lines that fail to parse instead of aborting
        #[arg(long)]
        skip_malformed: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Export the canonical dataset for downstream renderers
    Export {
        /// Input transcript file (plain text, one utterance per line)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the dataset (JSON)
        #[arg(short, long)]
        output: PathBuf,

        /// Optional output file for a human-readable summary (text)
        #[arg(long)]
        summary: Option<PathBuf>,

        /// Silence duration in seconds that splits a turn
        #[arg(long, default_value = "2.0")]
        silence_threshold: f64,

        /// Comma-separated filler vocabulary (defaults to uh,um,hmm,yeah,like)
        #[arg(long)]
        fillers: Option<String>,

        /// Interpret timestamps as HH:MM:SS instead of MM:SS
        #[arg(long)]
        hours: bool,

        /// Skip lines that fail to parse instead of aborting
        #[arg(long)]
        skip_malformed: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            silence_threshold,
            fillers,
            hours,
            skip_malformed,
            verbose,
        } => {
            setup_logging(verbose);
            let config = build_config(silence_threshold, fillers, hours, skip_malformed);
            analyze_transcript(input, &config)
        }
        Commands::Export {
            input,
            output,
            summary,
            silence_threshold,
            fillers,
            hours,
            skip_malformed,
            verbose,
        } => {
            setup_logging(verbose);
            let config = build_config(silence_threshold, fillers, hours, skip_malformed);
            export_dataset(input, output, summary, &config)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn build_config(
    silence_threshold: f64,
    fillers: Option<String>,
    hours: bool,
    skip_malformed: bool,
) -> AnalysisConfig {
    let mut config = AnalysisConfig {
        silence_threshold,
        skip_malformed_lines: skip_malformed,
        ..Default::default()
    };

    if hours {
        config.timestamp_format = TimestampFormat::HoursMinutesSeconds;
    }

    if let Some(list) = fillers {
        let custom: BTreeSet<String> = list
            .split(',')
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        if !custom.is_empty() {
            config.fillers = custom;
        }
    }

    config
}

fn analyze_transcript(input: PathBuf, config: &AnalysisConfig) -> Result<()> {
    info!("Loading transcript from {:?}", input);
    let dataset =
        parse_transcript_file(&input, config).context("Failed to parse input transcript")?;

    info!(
        "Parsed {} turns across {} speakers",
        dataset.turns.len(),
        dataset.profiles.len()
    );

    print!("{}", SummaryReport::new(&dataset).format());
    Ok(())
}

fn export_dataset(
    input: PathBuf,
    output: PathBuf,
    summary: Option<PathBuf>,
    config: &AnalysisConfig,
) -> Result<()> {
    info!("Loading transcript from {:?}", input);
    let dataset =
        parse_transcript_file(&input, config).context("Failed to parse input transcript")?;

    info!(
        "Parsed {} turns, {} words, {} speakers",
        dataset.turns.len(),
        dataset.total_words,
        dataset.profiles.len()
    );

    write_dataset_json(&dataset, &output)?;
    info!("Dataset written to {:?}", output);

    if let Some(summary_path) = summary {
        SummaryReport::new(&dataset).write_file(&summary_path)?;
        info!("Summary written to {:?}", summary_path);
    }

    Ok(())
}
