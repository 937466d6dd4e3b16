//! Transaction Anomaly Explorer Library
//!
//! Loads a transaction dataset, fits an isolation forest over two numeric
//! features and renders the flagged records as tables, an SVG scatter chart
//! and a CSV export.

pub mod config;
pub mod control;
pub mod error;
pub mod feature_extractor;
pub mod loader;
pub mod metrics;
pub mod models;
pub mod render;
pub mod session;
pub mod types;

pub use config::AppConfig;
pub use control::{Command, Contamination};
pub use error::{DetectError, FeatureError, LoadError};
pub use feature_extractor::FeatureExtractor;
pub use loader::{DatasetCache, DatasetLoader};
pub use models::detector::AnomalyDetector;
pub use render::Report;
pub use session::{RunOutcome, Session};
pub use types::{annotated::AnnotatedTable, label::AnomalyLabel, transaction::Dataset};
