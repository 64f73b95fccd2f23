use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use transmark::{
    default_output_path, default_stripped_path, format_sentence_lines, load_transcript,
    read_input_file, strip_subtitle_markup, ClaudeConfig, ClaudeGenerator, DiarizationOracle,
    GenerationOracle, HashEmbedding, KMeansClustering, Pipeline, PipelineConfig, RuleAnnotator,
    SegmentConfig, SidecarDiarizer, StructuredDocument,
};

#[derive(Parser)]
#[command(name = "transmark")]
#[command(author, version, about = "Transcript structuring pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: dedup, segment, head, render
    Process {
        /// Input transcript file (plain text or subtitle markup)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the structured Markdown document
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write a machine-readable JSON view to this path
        #[arg(long)]
        json: Option<PathBuf>,

        /// Audio file whose diarization sidecar enables speaker alignment
        #[arg(short, long)]
        audio: Option<PathBuf>,

        /// Maximum sentences per paragraph
        #[arg(long, default_value = "5")]
        max_sentences: usize,

        /// Clustering seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Strip subtitle markup from a file, writing plain transcript text
    Strip {
        /// Input subtitle file
        #[arg(short, long)]
        input: PathBuf,

        /// Output text file (default: <stem>_cleaned.txt)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Rewrite a file in place so each sentence ends with a newline
    Format {
        /// File to rewrite
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            input,
            output,
            json,
            audio,
            max_sentences,
            seed,
            verbose,
        } => {
            setup_logging(verbose);
            process(input, output, json, audio, max_sentences, seed)
        }
        Commands::Strip { input, output } => {
            setup_logging(false);
            strip(input, output)
        }
        Commands::Format { file } => {
            setup_logging(false);
            format_file(file)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn process(
    input: PathBuf,
    output: Option<PathBuf>,
    json: Option<PathBuf>,
    audio: Option<PathBuf>,
    max_sentences: usize,
    seed: u64,
) -> Result<()> {
    info!("Loading transcript from {:?}", input);
    let text = load_transcript(&input)?;

    let embedder = HashEmbedding::default();
    let clusterer = KMeansClustering::with_seed(seed);
    let annotator = RuleAnnotator::default();

    let generator: Option<ClaudeGenerator> = match ClaudeConfig::from_env() {
        Ok(config) => Some(ClaudeGenerator::new(config)),
        Err(e) => {
            warn!("Generative labeling disabled: {e}");
            None
        }
    };
    let generator_ref: Option<&dyn GenerationOracle> =
        generator.as_ref().map(|g| g as &dyn GenerationOracle);

    let config = PipelineConfig {
        segment: SegmentConfig {
            max_sentences_per_paragraph: max_sentences,
        },
        ..PipelineConfig::default()
    };
    let pipeline = Pipeline::new(&embedder, &clusterer, generator_ref, &annotator, config);

    let segments = match audio {
        Some(audio_path) if audio_path.exists() => {
            info!("Running speaker alignment for {:?}", audio_path);
            match SidecarDiarizer.diarize(&audio_path) {
                Ok(timeline) => pipeline.process_with_timeline(&text, &timeline),
                Err(e) => {
                    warn!("Diarization unavailable, processing without speakers: {e}");
                    pipeline.process_text(&text)
                }
            }
        }
        Some(audio_path) => {
            warn!(
                "Audio file not found: {:?}, processing without speakers",
                audio_path
            );
            pipeline.process_text(&text)
        }
        None => pipeline.process_text(&text),
    };

    let document = StructuredDocument::new(segments);
    let output_path = output.unwrap_or_else(|| default_output_path(&input));
    document.write_file(&output_path)?;
    info!("Structured transcript written to {:?}", output_path);

    if let Some(json_path) = json {
        document.write_json(&json_path)?;
        info!("Machine-readable view written to {:?}", json_path);
    }

    info!("Complete: {} segments", document.segments().len());
    let speakers = document.speakers();
    if !speakers.is_empty() {
        info!("Detected {} speakers: {}", speakers.len(), speakers.join(", "));
    }

    Ok(())
}

fn strip(input: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let content = read_input_file(&input)?;
    let cleaned = strip_subtitle_markup(&content);
    let output_path = output.unwrap_or_else(|| default_stripped_path(&input));
    fs::write(&output_path, cleaned)
        .with_context(|| format!("Failed to write {:?}", output_path))?;
    info!("Cleaned transcript written to {:?}", output_path);
    Ok(())
}

fn format_file(file: PathBuf) -> Result<()> {
    let content = read_input_file(&file)?;
    let formatted = format_sentence_lines(&content);
    fs::write(&file, formatted).with_context(|| format!("Failed to write {:?}", file))?;
    info!("Formatted sentences in {:?}", file);
    Ok(())
}
