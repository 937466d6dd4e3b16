//! Dataset annotated with one detection run's results

use crate::types::label::{AnomalyLabel, GroundTruth};
use crate::types::transaction::Dataset;
use std::sync::Arc;

/// Output of a full detection pass.
///
/// The label and score columns always cover every row of the dataset; a new
/// contamination value produces a new `AnnotatedTable` rather than patching
/// this one.
#[derive(Debug, Clone)]
pub struct AnnotatedTable {
    /// Shared, read-only source table
    pub dataset: Arc<Dataset>,
    /// Names of the two feature columns (x, y)
    pub feature_names: [String; 2],
    /// Feature values per row, in dataset order
    pub features: Vec<[f64; 2]>,
    /// Detector verdict per row
    pub labels: Vec<AnomalyLabel>,
    /// Anomaly score per row (0.0 - 1.0, higher = easier to isolate)
    pub scores: Vec<f64>,
    /// Contamination rate the run was configured with
    pub contamination: f64,
    /// Ground-truth flags carried by the dataset, if any
    pub ground_truth: GroundTruth,
}

impl AnnotatedTable {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn suspicious_count(&self) -> usize {
        self.labels.iter().filter(|l| l.is_suspicious()).count()
    }

    /// Row indices labeled Suspicious, in dataset order
    pub fn suspicious_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, label)| label.is_suspicious())
            .map(|(row, _)| row)
    }
}
