pub mod annotation;
pub mod clustering;
pub mod diarization;
pub mod embedding;
pub mod generation;

pub use annotation::{AnnotationOracle, RuleAnnotator};
pub use clustering::{ClusteringOracle, KMeansClustering};
pub use diarization::{DiarizationOracle, SidecarDiarizer};
pub use embedding::{cosine_similarity, EmbeddingOracle, HashEmbedding};
pub use generation::{ClaudeConfig, ClaudeGenerator, GenerationOracle};
