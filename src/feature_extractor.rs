//! Feature extraction for the isolation forest.
//!
//! Projects the loaded table onto the two configured numeric columns. The
//! column order is fixed: the first feature is the scatter x-axis, the
//! second the y-axis.

use crate::config::DetectorConfig;
use crate::error::FeatureError;
use crate::types::transaction::{Dataset, AMOUNT, DIST_FROM_HOME};

/// Two-column feature matrix, one point per dataset row
pub type FeatureMatrix = Vec<[f64; 2]>;

/// Feature extractor that turns a dataset into model input points.
pub struct FeatureExtractor {
    x: String,
    y: String,
}

impl FeatureExtractor {
    /// Create an extractor over the given x and y columns.
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
        }
    }

    pub fn from_config(config: &DetectorConfig) -> Self {
        Self::new(&config.feature_x, &config.feature_y)
    }

    /// Extract features from every row.
    ///
    /// Fails if either column is absent or holds a value that does not parse
    /// as a finite number; no partial matrix is ever returned.
    pub fn extract(&self, dataset: &Dataset) -> Result<FeatureMatrix, FeatureError> {
        let xs = dataset.numeric_column(&self.x)?;
        let ys = dataset.numeric_column(&self.y)?;

        if xs.is_empty() {
            return Err(FeatureError::Empty);
        }

        Ok(xs.into_iter().zip(ys).map(|(x, y)| [x, y]).collect())
    }

    /// Get the number of features produced.
    pub fn feature_count(&self) -> usize {
        2
    }

    /// Get feature names in matrix column order.
    pub fn feature_names(&self) -> [String; 2] {
        [self.x.clone(), self.y.clone()]
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(AMOUNT, DIST_FROM_HOME)
    }
}
