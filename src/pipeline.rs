use tracing::{info, warn};

use crate::models::{Segment, SpeakerTimeline};
use crate::oracles::{AnnotationOracle, ClusteringOracle, EmbeddingOracle, GenerationOracle};
use crate::stages::{align, clean, segment, CleanConfig, HeaderLabeler, LabelConfig, SegmentConfig};

/// Configuration for a full pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub clean: CleanConfig,
    pub segment: SegmentConfig,
    pub label: LabelConfig,
}

/// The four-stage transcript pipeline. Owns no oracles; the caller
/// constructs them and manages their lifecycle, the pipeline only
/// borrows.
pub struct Pipeline<'a> {
    embedder: &'a dyn EmbeddingOracle,
    clusterer: &'a dyn ClusteringOracle,
    generator: Option<&'a dyn GenerationOracle>,
    annotator: &'a dyn AnnotationOracle,
    config: PipelineConfig,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        embedder: &'a dyn EmbeddingOracle,
        clusterer: &'a dyn ClusteringOracle,
        generator: Option<&'a dyn GenerationOracle>,
        annotator: &'a dyn AnnotationOracle,
        config: PipelineConfig,
    ) -> Self {
        Self {
            embedder,
            clusterer,
            generator,
            annotator,
            config,
        }
    }

    /// Text-only mode: clean, segment into paragraphs, head each
    /// paragraph. One segment per paragraph.
    pub fn process_text(&self, text: &str) -> Vec<Segment> {
        let cleaned = clean(text, self.embedder, &self.config.clean);
        info!(
            "Cleaner: {} sentences retained ({} exact, {} near-duplicates removed)",
            cleaned.sentences.len(),
            cleaned.exact_removed,
            cleaned.near_removed
        );

        let paragraphs = segment(
            &cleaned.sentences,
            self.embedder,
            self.clusterer,
            &self.config.segment,
        );
        info!("Segmenter: {} paragraphs", paragraphs.len());

        let labeler = HeaderLabeler::new(self.generator, self.annotator, self.config.label.clone());
        paragraphs
            .iter()
            .map(|paragraph| {
                let heading = labeler.label(&paragraph.text());
                Segment::from_paragraph(paragraph, heading)
            })
            .collect()
    }

    /// Diarized mode: clean, then attach speaker and time metadata per
    /// sentence. Degrades to text-only mode when the timeline is empty.
    pub fn process_with_timeline(&self, text: &str, timeline: &SpeakerTimeline) -> Vec<Segment> {
        if timeline.is_empty() {
            warn!("Speaker timeline is empty, processing without speaker metadata");
            return self.process_text(text);
        }

        let cleaned = clean(text, self.embedder, &self.config.clean);
        info!(
            "Cleaner: {} sentences retained ({} exact, {} near-duplicates removed)",
            cleaned.sentences.len(),
            cleaned.exact_removed,
            cleaned.near_removed
        );

        let labeler = HeaderLabeler::new(self.generator, self.annotator, self.config.label.clone());
        let segments = align(&cleaned.sentences, timeline, &labeler);
        info!(
            "Aligner: {} segments across {} speakers",
            segments.len(),
            timeline.speakers().len()
        );
        segments
    }
}
