use crate::error::OracleResult;

/// Maps text units to fixed-dimension vectors. Batch-oriented: encoding
/// all sentences in one call must yield the same vectors as per-item
/// calls.
pub trait EmbeddingOracle {
    fn embed(&self, texts: &[&str]) -> OracleResult<Vec<Vec<f32>>>;

    /// Embedding dimension produced by this oracle
    fn dimension(&self) -> usize;
}

/// Cosine similarity between two vectors, clamped to [0, 1] for use as
/// a closeness score. Zero vectors score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}

/// Deterministic embedding oracle: bag-of-tokens feature hashing into a
/// fixed-dimension L2-normalized vector. No model files, no network,
/// identical input always yields identical vectors.
#[derive(Debug, Clone)]
pub struct HashEmbedding {
    dimension: usize,
}

impl Default for HashEmbedding {
    fn default() -> Self {
        Self { dimension: 256 }
    }
}

impl HashEmbedding {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn encode_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];

        for token in tokenize(text) {
            let bucket = (fnv1a(&token) as usize) % self.dimension;
            vector[bucket] += 1.0;
        }

        // Character trigrams make near-duplicates with small word-level
        // edits still score high.
        let chars: Vec<char> = text.to_lowercase().chars().collect();
        for window in chars.windows(3) {
            let gram: String = window.iter().collect();
            let bucket = (fnv1a(&gram) as usize) % self.dimension;
            vector[bucket] += 0.5;
        }

        l2_normalize(&mut vector);
        vector
    }
}

impl EmbeddingOracle for HashEmbedding {
    fn embed(&self, texts: &[&str]) -> OracleResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.encode_one(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Lowercased alphanumeric word tokens
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

/// FNV-1a, fixed offset/prime so hashes are stable across runs
fn fnv1a(s: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in s.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

fn l2_normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}
