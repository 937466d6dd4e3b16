//! Terminal display of a report

use crate::error::{DetectError, LoadError};
use crate::render::{Comparison, Report};
use crate::types::transaction::Dataset;
use comfy_table::{Cell, Color, Table};

/// Renders reports and diagnostics as terminal text.
pub struct TerminalRenderer;

impl TerminalRenderer {
    pub fn new() -> Self {
        Self
    }

    /// First `rows` records of the dataset, all columns
    pub fn preview(&self, dataset: &Dataset, rows: usize) -> String {
        let mut table = Table::new();
        table.set_header(dataset.headers().to_vec());
        for record in dataset.rows().take(rows) {
            table.add_row(record.iter().map(str::trim));
        }
        format!(
            "### Data Preview ({} of {} rows)\n{}",
            rows.min(dataset.len()),
            dataset.len(),
            table
        )
    }

    /// Placeholder shown while no dataset can be loaded
    pub fn load_failure(&self, error: &LoadError) -> String {
        format!(
            "Could not load the transaction data: {}\nFix the file and enter a value to try again.",
            error
        )
    }

    pub fn detection_failure(&self, error: &DetectError) -> String {
        format!("Detection aborted: {}", error)
    }

    pub fn render(&self, report: &Report) -> String {
        let mut out = format!(
            "## {}\nContamination {:.2} | Suspicious transactions: {} of {}\n\n### Detected Anomalies\n",
            report.title, report.contamination, report.suspicious_count, report.total_rows
        );

        if report.has_anomalies() {
            out.push_str(&format!(
                "Found {} suspicious data points.\n{}\n",
                report.suspicious_count,
                self.suspicious_table(report)
            ));
        } else {
            out.push_str("No anomalies detected with current settings.\n");
        }

        match &report.comparison {
            Comparison::Unavailable => {}
            Comparison::Rows(_) => out.push_str(&format!(
                "\n### Ground Truth vs Detection (first rows)\n{}\n",
                self.comparison_table(report)
            )),
            Comparison::Withheld { row, value } => out.push_str(&format!(
                "\nGround-truth comparison unavailable: is_fraud holds {:?} at row {} (expected 0 or 1).\n",
                value, row
            )),
        }

        out
    }

    fn suspicious_table(&self, report: &Report) -> Table {
        let mut table = Table::new();
        table.set_header(vec![
            "transaction_id",
            "amount",
            "dist_from_home",
            "merchant_category",
            "score",
        ]);
        for row in &report.suspicious {
            table.add_row(vec![
                Cell::new(&row.transaction_id),
                Cell::new(&row.amount),
                Cell::new(&row.dist_from_home),
                Cell::new(&row.merchant_category),
                Cell::new(format!("{:.3}", row.score)).fg(Color::Red),
            ]);
        }
        table
    }

    fn comparison_table(&self, report: &Report) -> Table {
        let mut table = Table::new();
        table.set_header(vec!["transaction_id", "is_fraud", "detected"]);
        if let Comparison::Rows(rows) = &report.comparison {
            for row in rows {
                let detected = if row.detected == row.is_fraud {
                    Cell::new(row.detected).fg(Color::Green)
                } else {
                    Cell::new(row.detected).fg(Color::Yellow)
                };
                table.add_row(vec![
                    Cell::new(&row.transaction_id),
                    Cell::new(row.is_fraud),
                    detected,
                ]);
            }
        }
        table
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::tests::annotated;
    use crate::types::label::GroundTruth;
    use std::path::PathBuf;

    #[test]
    fn test_render_lists_suspicious_rows() {
        let report = Report::from_table(&annotated(6, GroundTruth::Absent));
        let text = TerminalRenderer::new().render(&report);

        assert!(text.contains("Suspicious transactions: 2 of 6"));
        assert!(text.contains("tx_0"));
        assert!(text.contains("tx_3"));
        assert!(!text.contains("tx_4"));
        assert!(!text.contains("Ground Truth"));
    }

    #[test]
    fn test_render_without_anomalies() {
        let mut report = Report::from_table(&annotated(3, GroundTruth::Absent));
        report.suspicious.clear();
        report.suspicious_count = 0;

        let text = TerminalRenderer::new().render(&report);
        assert!(text.contains("No anomalies detected"));
    }

    #[test]
    fn test_render_comparison() {
        let report = Report::from_table(&annotated(12, GroundTruth::Valid(vec![0; 12])));
        let text = TerminalRenderer::new().render(&report);
        assert!(text.contains("Ground Truth vs Detection"));
        assert!(text.contains("is_fraud"));
    }

    #[test]
    fn test_render_withheld_comparison() {
        let ground_truth = GroundTruth::Malformed {
            row: 2,
            value: "yes".to_string(),
        };
        let report = Report::from_table(&annotated(4, ground_truth));
        let text = TerminalRenderer::new().render(&report);

        assert!(text.starts_with("## Anomaly Detection: amount vs dist_from_home\n"));
        assert!(text.contains("is_fraud holds \"yes\" at row 2"));
        assert!(!text.contains("Ground Truth vs Detection"));
    }

    #[test]
    fn test_detection_failure_message() {
        let err = DetectError::InvalidContamination(1.5);
        let text = TerminalRenderer::new().detection_failure(&err);
        assert_eq!(text, "Detection aborted: contamination must be in (0, 1), got 1.5");
    }

    #[test]
    fn test_load_failure_message() {
        let err = LoadError::NotFound {
            path: PathBuf::from("data/transactions.csv"),
        };
        let text = TerminalRenderer::new().load_failure(&err);
        assert!(text.contains("data/transactions.csv"));
    }

    #[test]
    fn test_preview_limits_rows() {
        let table = annotated(8, GroundTruth::Absent);
        let text = TerminalRenderer::new().preview(&table.dataset, 5);
        assert!(text.contains("5 of 8 rows"));
        assert!(text.contains("tx_4"));
        assert!(!text.contains("tx_5"));
    }
}
