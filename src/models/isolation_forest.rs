//! Isolation forest: an ensemble of random partitioning trees.
//!
//! Each tree recursively splits a random subsample on a random feature at a
//! random threshold. Points that end up isolated after few splits are the
//! anomalous ones. Scores follow the usual normalisation
//! `s(x) = 2^(-E[h(x)] / c(psi))`, where `psi` is the per-tree sample size.

use crate::types::label::AnomalyLabel;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Ensemble hyperparameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub max_samples: usize,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_samples: 256,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        size: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

#[derive(Debug, Clone)]
struct IsolationTree {
    root: Node,
}

impl IsolationTree {
    fn grow<const D: usize>(
        data: &[[f64; D]],
        indices: Vec<usize>,
        depth: usize,
        max_depth: usize,
        rng: &mut ChaCha8Rng,
    ) -> Node {
        if depth >= max_depth || indices.len() <= 1 {
            return Node::Leaf {
                size: indices.len(),
            };
        }

        // Only features that still vary inside this node can split it.
        let mut candidates: Vec<(usize, f64, f64)> = Vec::with_capacity(D);
        for feature in 0..D {
            let (lo, hi) = indices.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &i| {
                (lo.min(data[i][feature]), hi.max(data[i][feature]))
            });
            if hi > lo {
                candidates.push((feature, lo, hi));
            }
        }

        if candidates.is_empty() {
            return Node::Leaf {
                size: indices.len(),
            };
        }

        let (feature, lo, hi) = candidates[rng.gen_range(0..candidates.len())];
        // threshold in [lo, hi): both sides are non-empty under `<=`.
        let threshold = rng.gen_range(lo..hi);

        let (left, right): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| data[i][feature] <= threshold);

        Node::Split {
            feature,
            threshold,
            left: Box::new(Self::grow(data, left, depth + 1, max_depth, rng)),
            right: Box::new(Self::grow(data, right, depth + 1, max_depth, rng)),
        }
    }

    fn path_length<const D: usize>(&self, point: &[f64; D]) -> f64 {
        let mut node = &self.root;
        let mut depth = 0usize;
        loop {
            match node {
                Node::Leaf { size } => return depth as f64 + average_path_length(*size),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if point[*feature] <= *threshold {
                        left
                    } else {
                        right
                    };
                    depth += 1;
                }
            }
        }
    }
}

/// Fitted isolation forest
#[derive(Debug, Clone)]
pub struct IsolationForest {
    trees: Vec<IsolationTree>,
    sample_size: usize,
}

impl IsolationForest {
    /// Fit the ensemble on `data`.
    ///
    /// Fitting is fully determined by `params.seed`. Returns `None` for an
    /// empty input.
    pub fn fit<const D: usize>(params: &ForestParams, data: &[[f64; D]]) -> Option<Self> {
        if data.is_empty() || params.n_estimators == 0 {
            return None;
        }

        let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
        let sample_size = params.max_samples.clamp(1, data.len());
        let max_depth = (sample_size.max(2) as f64).log2().ceil() as usize;

        let trees = (0..params.n_estimators)
            .map(|_| {
                let indices = index::sample(&mut rng, data.len(), sample_size).into_vec();
                IsolationTree {
                    root: IsolationTree::grow(data, indices, 0, max_depth, &mut rng),
                }
            })
            .collect();

        Some(Self { trees, sample_size })
    }

    pub fn n_estimators(&self) -> usize {
        self.trees.len()
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// Anomaly score in (0, 1]; higher means easier to isolate
    pub fn anomaly_score<const D: usize>(&self, point: &[f64; D]) -> f64 {
        let mean_depth = self
            .trees
            .iter()
            .map(|tree| tree.path_length(point))
            .sum::<f64>()
            / self.trees.len() as f64;

        let norm = average_path_length(self.sample_size);
        if norm > 0.0 {
            2f64.powf(-mean_depth / norm)
        } else {
            // Single-row sample: nothing can be isolated, every point looks alike.
            0.5
        }
    }

    pub fn anomaly_scores<const D: usize>(&self, data: &[[f64; D]]) -> Vec<f64> {
        data.iter().map(|p| self.anomaly_score(p)).collect()
    }

    /// Score below which a point is an outlier, chosen so that roughly a
    /// `contamination` share of `scores` falls beneath it.
    ///
    /// Works on negated anomaly scores, so lower means more abnormal.
    pub fn offset(scores: &[f64], contamination: f64) -> f64 {
        let negated: Vec<f64> = scores.iter().map(|s| -s).collect();
        percentile(&negated, contamination * 100.0)
    }

    /// Label per point: Suspicious when the negated score falls strictly
    /// below `offset` (model code `-1`), Normal otherwise (code `1`).
    pub fn predict(scores: &[f64], offset: f64) -> Vec<AnomalyLabel> {
        scores
            .iter()
            .map(|&s| {
                if -s < offset {
                    AnomalyLabel::Suspicious
                } else {
                    AnomalyLabel::Normal
                }
            })
            .collect()
    }
}

/// Average path length of an unsuccessful binary search tree lookup over `n`
/// points; normalises tree depths.
pub fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        n => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

/// Percentile with linear interpolation between closest ranks
pub fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = (q / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluster_with_outliers() -> Vec<[f64; 2]> {
        let mut data: Vec<[f64; 2]> = (0..95)
            .map(|i| {
                let i = i as f64;
                [50.0 + (i * 7.0) % 20.0, 5.0 + (i * 3.0) % 10.0]
            })
            .collect();
        data.extend([
            [900.0, 400.0],
            [1200.0, 5.0],
            [55.0, 800.0],
            [2000.0, 1500.0],
            [700.0, 650.0],
        ]);
        data
    }

    #[test]
    fn test_average_path_length() {
        assert_eq!(average_path_length(0), 0.0);
        assert_eq!(average_path_length(1), 0.0);
        assert_eq!(average_path_length(2), 1.0);
        // c(256) is about 10.24
        assert!((average_path_length(256) - 10.24).abs() < 0.01);
    }

    #[test]
    fn test_percentile() {
        let values = [4.0, 1.0, 3.0, 2.0, 5.0];
        assert_eq!(percentile(&values, 0.0), 1.0);
        assert_eq!(percentile(&values, 50.0), 3.0);
        assert_eq!(percentile(&values, 100.0), 5.0);
        assert!((percentile(&values, 10.0) - 1.4).abs() < 1e-12);
    }

    #[test]
    fn test_fit_empty() {
        let data: Vec<[f64; 2]> = Vec::new();
        assert!(IsolationForest::fit(&ForestParams::default(), &data).is_none());
    }

    #[test]
    fn test_outliers_score_higher() {
        let data = cluster_with_outliers();
        let forest = IsolationForest::fit(&ForestParams::default(), &data).unwrap();
        let scores = forest.anomaly_scores(&data);

        let max_inlier = scores[..95].iter().cloned().fold(f64::MIN, f64::max);
        let min_outlier = scores[95..].iter().cloned().fold(f64::MAX, f64::min);
        assert!(min_outlier > max_inlier);
        assert!(scores.iter().all(|&s| s > 0.0 && s <= 1.0));
    }

    #[test]
    fn test_predict_flags_contamination_share() {
        let data = cluster_with_outliers();
        let forest = IsolationForest::fit(&ForestParams::default(), &data).unwrap();
        let scores = forest.anomaly_scores(&data);

        let offset = IsolationForest::offset(&scores, 0.05);
        let labels = IsolationForest::predict(&scores, offset);
        let outliers: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|(_, l)| l.is_suspicious())
            .map(|(i, _)| i)
            .collect();
        assert!(labels.iter().all(|l| matches!(l.code(), 1 | -1)));

        assert_eq!(outliers, vec![95, 96, 97, 98, 99]);
    }

    #[test]
    fn test_same_seed_same_scores() {
        let data = cluster_with_outliers();
        let params = ForestParams::default();
        let a = IsolationForest::fit(&params, &data).unwrap().anomaly_scores(&data);
        let b = IsolationForest::fit(&params, &data).unwrap().anomaly_scores(&data);
        assert_eq!(a, b);
    }

    #[test]
    fn test_sample_size_capped() {
        let data = cluster_with_outliers();
        let forest = IsolationForest::fit(&ForestParams::default(), &data).unwrap();
        assert_eq!(forest.sample_size(), 100);
        assert_eq!(forest.n_estimators(), 100);
    }

    #[test]
    fn test_constant_data() {
        let data = vec![[1.0, 1.0]; 10];
        let forest = IsolationForest::fit(&ForestParams::default(), &data).unwrap();
        let scores = forest.anomaly_scores(&data);
        assert!(scores.windows(2).all(|w| w[0] == w[1]));

        // Ties leave nothing strictly below the offset.
        let offset = IsolationForest::offset(&scores, 0.1);
        assert!(IsolationForest::predict(&scores, offset)
            .iter()
            .all(|&l| l == AnomalyLabel::Normal));
    }
}
