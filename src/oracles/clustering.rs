use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::{OracleError, OracleResult};

/// Partitions vectors into `k` groups. Assignment indices are parallel
/// to the input slice. Must be deterministic for a fixed seed so that
/// identical input yields identical paragraph boundaries across runs.
pub trait ClusteringOracle {
    fn cluster(&self, vectors: &[Vec<f32>], k: usize) -> OracleResult<Vec<usize>>;
}

/// Seeded Lloyd's k-means. Centroid initialization draws from a
/// `StdRng` seeded with a fixed value, so repeated runs on the same
/// input produce the same assignment.
#[derive(Debug, Clone)]
pub struct KMeansClustering {
    pub seed: u64,
    pub max_iterations: usize,
}

impl Default for KMeansClustering {
    fn default() -> Self {
        Self {
            seed: 42,
            max_iterations: 100,
        }
    }
}

impl KMeansClustering {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }
}

impl ClusteringOracle for KMeansClustering {
    fn cluster(&self, vectors: &[Vec<f32>], k: usize) -> OracleResult<Vec<usize>> {
        if k == 0 {
            return Err(OracleError::Call("cluster count must be positive".to_string()));
        }
        if vectors.is_empty() {
            return Ok(vec![]);
        }
        let dim = vectors[0].len();
        if vectors.iter().any(|v| v.len() != dim) {
            return Err(OracleError::Call(
                "all vectors must share one dimension".to_string(),
            ));
        }
        if k >= vectors.len() {
            // Degenerate case: one point per cluster
            return Ok((0..vectors.len()).collect());
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let init = rand::seq::index::sample(&mut rng, vectors.len(), k);
        let mut centroids: Vec<Vec<f32>> = init.iter().map(|i| vectors[i].clone()).collect();
        let mut assignment = vec![0usize; vectors.len()];

        for _ in 0..self.max_iterations {
            let mut changed = false;

            for (i, vector) in vectors.iter().enumerate() {
                let best = nearest_centroid(vector, &centroids);
                if assignment[i] != best {
                    assignment[i] = best;
                    changed = true;
                }
            }

            if !changed {
                break;
            }

            // Recompute centroids; empty clusters keep their previous
            // position.
            let mut sums = vec![vec![0.0f32; dim]; k];
            let mut counts = vec![0usize; k];
            for (vector, &cluster) in vectors.iter().zip(assignment.iter()) {
                counts[cluster] += 1;
                for (acc, &x) in sums[cluster].iter_mut().zip(vector.iter()) {
                    *acc += x;
                }
            }
            for (cluster, sum) in sums.into_iter().enumerate() {
                if counts[cluster] > 0 {
                    centroids[cluster] = sum
                        .into_iter()
                        .map(|x| x / counts[cluster] as f32)
                        .collect();
                }
            }
        }

        Ok(assignment)
    }
}

/// Index of the closest centroid; ties break to the lowest index
fn nearest_centroid(vector: &[f32], centroids: &[Vec<f32>]) -> usize {
    let mut best = 0;
    let mut best_dist = f32::MAX;
    for (i, centroid) in centroids.iter().enumerate() {
        let dist: f32 = vector
            .iter()
            .zip(centroid.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum();
        if dist < best_dist {
            best_dist = dist;
            best = i;
        }
    }
    best
}
