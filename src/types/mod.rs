//! Type definitions for the anomaly explorer

pub mod annotated;
pub mod label;
pub mod transaction;

pub use annotated::AnnotatedTable;
pub use label::{AnomalyLabel, GroundTruth};
pub use transaction::{Dataset, Transaction};
