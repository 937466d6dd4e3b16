//! Outlier model and detection pass

pub mod detector;
pub mod isolation_forest;

pub use detector::AnomalyDetector;
pub use isolation_forest::{ForestParams, IsolationForest};
