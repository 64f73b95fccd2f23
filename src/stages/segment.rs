use tracing::{debug, warn};

use crate::models::{Paragraph, Sentence};
use crate::oracles::{ClusteringOracle, EmbeddingOracle};

/// Configuration for the segmentation stage
#[derive(Debug, Clone)]
pub struct SegmentConfig {
    /// Target upper bound on sentences per paragraph; also the fast-path
    /// threshold below which the whole text is one paragraph
    pub max_sentences_per_paragraph: usize,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            max_sentences_per_paragraph: 5,
        }
    }
}

/// Group sentences into ordered paragraphs by semantic similarity.
///
/// Short inputs (at most `max_sentences_per_paragraph` sentences) come
/// back as a single paragraph. Otherwise sentences are embedded and
/// clustered into `k = max(2, n / max_per_para)` groups, capped at
/// `n / 2`. Clusters are unordered, so paragraphs are re-sorted by the
/// original index of their earliest sentence; within a paragraph,
/// sentences keep original order. Empty clusters are dropped silently.
///
/// If embedding or clustering fails, degrades to fixed-size sequential
/// chunks of `max_sentences_per_paragraph` with a warning.
pub fn segment(
    sentences: &[Sentence],
    embedder: &dyn EmbeddingOracle,
    clusterer: &dyn ClusteringOracle,
    config: &SegmentConfig,
) -> Vec<Paragraph> {
    if sentences.is_empty() {
        return vec![];
    }

    let max_per_para = config.max_sentences_per_paragraph.max(1);
    if sentences.len() <= max_per_para {
        return Paragraph::new(sentences.to_vec()).into_iter().collect();
    }

    let k = cluster_count(sentences.len(), max_per_para);
    debug!("Segmenting {} sentences into {} clusters", sentences.len(), k);

    let texts: Vec<&str> = sentences.iter().map(|s| s.text.as_str()).collect();
    let assignment = embedder
        .embed(&texts)
        .and_then(|vectors| clusterer.cluster(&vectors, k));

    let assignment = match assignment {
        Ok(a) if a.len() == sentences.len() => a,
        Ok(_) => {
            warn!("Clustering returned a mismatched assignment, falling back to sequential chunks");
            return sequential_chunks(sentences, max_per_para);
        }
        Err(e) => {
            warn!("Segmentation oracle failed, falling back to sequential chunks: {e}");
            return sequential_chunks(sentences, max_per_para);
        }
    };

    // Group by cluster, preserving original sentence order within each.
    // A custom oracle may hand back ids beyond k; size for the largest.
    let group_count = k.max(assignment.iter().max().map_or(0, |m| m + 1));
    let mut groups: Vec<Vec<Sentence>> = vec![Vec::new(); group_count];
    for (sentence, &cluster) in sentences.iter().zip(assignment.iter()) {
        groups[cluster].push(sentence.clone());
    }

    // Clusters carry no order; sort paragraphs by earliest original index
    let mut paragraphs: Vec<Paragraph> = groups.into_iter().filter_map(Paragraph::new).collect();
    paragraphs.sort_by_key(|p| p.first_index());
    paragraphs
}

/// `k = max(2, n / max_per_para)`, capped so every cluster can hold at
/// least two sentences on average
pub fn cluster_count(sentence_count: usize, max_per_para: usize) -> usize {
    let k = (sentence_count / max_per_para).max(2);
    k.min(sentence_count / 2)
}

/// Oracle-free degraded path: consecutive fixed-size chunks
fn sequential_chunks(sentences: &[Sentence], max_per_para: usize) -> Vec<Paragraph> {
    sentences
        .chunks(max_per_para)
        .filter_map(|chunk| Paragraph::new(chunk.to_vec()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{OracleError, OracleResult};
    use crate::oracles::{HashEmbedding, KMeansClustering};

    fn numbered(texts: &[&str]) -> Vec<Sentence> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Sentence::new(i, *t))
            .collect()
    }

    fn twelve_sentences() -> Vec<Sentence> {
        numbered(&[
            "Rust compiles to native code.",
            "The borrow checker prevents data races.",
            "Cargo manages crate dependencies.",
            "Lifetimes annotate reference validity.",
            "Traits describe shared behavior.",
            "Pattern matching destructures enums.",
            "Bread needs flour and water.",
            "Yeast makes the dough rise.",
            "Kneading develops the gluten.",
            "The oven must be very hot.",
            "Steam gives the crust its shine.",
            "Cooling finishes the bake.",
        ])
    }

    #[test]
    fn test_cluster_count_formula() {
        // 12 sentences, max 5 per paragraph: floor(12/5)=2, cap floor(12/2)=6
        assert_eq!(cluster_count(12, 5), 2);
        // Small n forces the cap below the floor of 2
        assert_eq!(cluster_count(4, 5), 2);
        assert_eq!(cluster_count(3, 5), 1);
        // Many sentences
        assert_eq!(cluster_count(50, 5), 10);
    }

    #[test]
    fn test_fast_path_single_paragraph() {
        let sentences = numbered(&["One.", "Two.", "Three."]);
        let embedder = HashEmbedding::default();
        let clusterer = KMeansClustering::default();
        let paragraphs = segment(&sentences, &embedder, &clusterer, &SegmentConfig::default());
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].len(), 3);
    }

    #[test]
    fn test_twelve_sentences_two_paragraphs() {
        let embedder = HashEmbedding::default();
        let clusterer = KMeansClustering::default();
        let paragraphs = segment(
            &twelve_sentences(),
            &embedder,
            &clusterer,
            &SegmentConfig::default(),
        );
        assert_eq!(paragraphs.len(), 2);
        let total: usize = paragraphs.iter().map(|p| p.len()).sum();
        assert_eq!(total, 12);
    }

    #[test]
    fn test_coverage_and_order() {
        let sentences = twelve_sentences();
        let embedder = HashEmbedding::default();
        let clusterer = KMeansClustering::default();
        let paragraphs = segment(&sentences, &embedder, &clusterer, &SegmentConfig::default());

        // Within each paragraph, original order is preserved
        for paragraph in &paragraphs {
            let indices: Vec<usize> = paragraph.sentences.iter().map(|s| s.index).collect();
            let mut sorted = indices.clone();
            sorted.sort();
            assert_eq!(indices, sorted);
        }

        // Every sentence appears exactly once across all paragraphs
        let mut all: Vec<usize> = paragraphs
            .iter()
            .flat_map(|p| p.sentences.iter().map(|s| s.index))
            .collect();
        all.sort();
        assert_eq!(all, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn test_deterministic_across_runs() {
        let sentences = twelve_sentences();
        let embedder = HashEmbedding::default();
        let clusterer = KMeansClustering::with_seed(42);
        let a = segment(&sentences, &embedder, &clusterer, &SegmentConfig::default());
        let b = segment(&sentences, &embedder, &clusterer, &SegmentConfig::default());
        assert_eq!(a, b);
    }

    #[test]
    fn test_paragraphs_ordered_by_first_index() {
        let sentences = twelve_sentences();
        let embedder = HashEmbedding::default();
        let clusterer = KMeansClustering::default();
        let paragraphs = segment(&sentences, &embedder, &clusterer, &SegmentConfig::default());
        for pair in paragraphs.windows(2) {
            assert!(pair[0].first_index() < pair[1].first_index());
        }
    }

    struct FailingEmbedder;
    impl EmbeddingOracle for FailingEmbedder {
        fn embed(&self, _texts: &[&str]) -> OracleResult<Vec<Vec<f32>>> {
            Err(OracleError::Unavailable("embedder offline".to_string()))
        }
        fn dimension(&self) -> usize {
            0
        }
    }

    #[test]
    fn test_oracle_failure_falls_back_to_chunks() {
        let sentences = twelve_sentences();
        let clusterer = KMeansClustering::default();
        let paragraphs = segment(
            &sentences,
            &FailingEmbedder,
            &clusterer,
            &SegmentConfig::default(),
        );
        // 12 sentences in chunks of 5: 5 + 5 + 2
        assert_eq!(paragraphs.len(), 3);
        assert_eq!(paragraphs[0].len(), 5);
        assert_eq!(paragraphs[2].len(), 2);
    }

    #[test]
    fn test_empty_input() {
        let embedder = HashEmbedding::default();
        let clusterer = KMeansClustering::default();
        assert!(segment(&[], &embedder, &clusterer, &SegmentConfig::default()).is_empty());
    }
}
