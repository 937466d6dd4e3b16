//! Projection of an annotated table into what the user sees.
//!
//! [`Report::from_table`] is pure: it reads the annotated table and builds
//! plain data. The sinks in the submodules decide how that data is shown.

pub mod export;
pub mod scatter;
pub mod terminal;

use crate::types::annotated::AnnotatedTable;
use crate::types::label::{AnomalyLabel, GroundTruth};

pub use export::AnomalyExporter;
pub use scatter::ScatterChart;
pub use terminal::TerminalRenderer;

/// Rows shown in the ground-truth comparison
pub const COMPARISON_ROWS: usize = 10;

/// One plotted transaction
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub label: AnomalyLabel,
}

/// One line of the Suspicious rows table
#[derive(Debug, Clone, PartialEq)]
pub struct SuspiciousRow {
    pub transaction_id: String,
    pub amount: String,
    pub dist_from_home: String,
    pub merchant_category: String,
    pub score: f64,
}

/// Ground-truth flag next to the derived detection flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonRow {
    pub transaction_id: String,
    pub is_fraud: u8,
    pub detected: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    /// Dataset has no ground-truth column
    Unavailable,
    /// First rows of the annotated table with both flags
    Rows(Vec<ComparisonRow>),
    /// Ground-truth column failed validation at `row`
    Withheld { row: usize, value: String },
}

/// Everything the display surface shows for one run
#[derive(Debug, Clone)]
pub struct Report {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub contamination: f64,
    pub total_rows: usize,
    pub suspicious_count: usize,
    pub points: Vec<ScatterPoint>,
    pub suspicious: Vec<SuspiciousRow>,
    pub comparison: Comparison,
}

impl Report {
    pub fn from_table(table: &AnnotatedTable) -> Self {
        let [x_label, y_label] = table.feature_names.clone();

        let points = table
            .features
            .iter()
            .zip(&table.labels)
            .map(|(&[x, y], &label)| ScatterPoint { x, y, label })
            .collect();

        let suspicious: Vec<SuspiciousRow> = table
            .suspicious_rows()
            .map(|row| {
                let tx = table.dataset.transaction(row);
                SuspiciousRow {
                    transaction_id: tx.transaction_id,
                    amount: tx.amount,
                    dist_from_home: tx.dist_from_home,
                    merchant_category: tx.merchant_category,
                    score: table.scores[row],
                }
            })
            .collect();

        let comparison = match &table.ground_truth {
            GroundTruth::Absent => Comparison::Unavailable,
            GroundTruth::Malformed { row, value } => Comparison::Withheld {
                row: *row,
                value: value.clone(),
            },
            GroundTruth::Valid(flags) => Comparison::Rows(
                flags
                    .iter()
                    .zip(&table.labels)
                    .take(COMPARISON_ROWS)
                    .enumerate()
                    .map(|(row, (&is_fraud, label))| ComparisonRow {
                        transaction_id: table.dataset.transaction(row).transaction_id,
                        is_fraud,
                        detected: label.as_flag(),
                    })
                    .collect(),
            ),
        };

        Self {
            title: format!("Anomaly Detection: {} vs {}", x_label, y_label),
            x_label,
            y_label,
            contamination: table.contamination,
            total_rows: table.len(),
            suspicious_count: suspicious.len(),
            points,
            suspicious,
            comparison,
        }
    }

    pub fn has_anomalies(&self) -> bool {
        self.suspicious_count > 0
    }
}
