pub mod error;
pub mod io;
pub mod models;
pub mod oracles;
pub mod pipeline;
pub mod stages;

pub use error::{OracleError, OracleResult, PipelineError};
pub use io::{
    default_output_path, default_stripped_path, load_transcript, read_input_file,
    strip_subtitle_markup, StructuredDocument,
};
pub use models::{Paragraph, Segment, Sentence, SpeakerInterval, SpeakerTimeline};
pub use oracles::{
    AnnotationOracle, ClaudeConfig, ClaudeGenerator, ClusteringOracle, DiarizationOracle,
    EmbeddingOracle, GenerationOracle, HashEmbedding, KMeansClustering, RuleAnnotator,
    SidecarDiarizer,
};
pub use pipeline::{Pipeline, PipelineConfig};
pub use stages::{
    align, clean, format_sentence_lines, segment, split_sentences, CleanConfig, CleanResult,
    HeaderLabeler, LabelConfig, SegmentConfig,
};
