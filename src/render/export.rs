//! CSV export of the Suspicious rows

use crate::types::annotated::AnnotatedTable;
use anyhow::{Context, Result};
use csv::Writer;
use std::path::Path;
use tracing::info;

/// Writes flagged transactions with every original column plus the
/// detector's status and score.
pub struct AnomalyExporter;

impl AnomalyExporter {
    pub fn new() -> Self {
        Self
    }

    pub fn export(&self, table: &AnnotatedTable) -> Result<String> {
        let mut wtr = Writer::from_writer(vec![]);

        let mut header: Vec<&str> = table.dataset.headers().iter().map(String::as_str).collect();
        header.extend(["status", "anomaly_score"]);
        wtr.write_record(&header)?;

        for row in table.suspicious_rows() {
            let width = table.dataset.headers().len();
            let mut record: Vec<String> = (0..width)
                .map(|col| table.dataset.field(row, col).unwrap_or("").to_string())
                .collect();
            record.push(table.labels[row].to_string());
            record.push(format!("{:.6}", table.scores[row]));
            wtr.write_record(&record)?;
        }

        let data = wtr
            .into_inner()
            .map_err(|e| anyhow::anyhow!("CSV writer error: {}", e))?;
        String::from_utf8(data).context("UTF-8 conversion error")
    }

    /// Export and write to `path`, creating parent directories as needed
    pub fn write<P: AsRef<Path>>(&self, table: &AnnotatedTable, path: P) -> Result<()> {
        let path = path.as_ref();
        let csv = self.export(table)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(path, csv)
            .with_context(|| format!("Failed to write anomaly export to {}", path.display()))?;

        info!(
            path = %path.display(),
            rows = table.suspicious_count(),
            "Anomaly list exported"
        );
        Ok(())
    }
}

impl Default for AnomalyExporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::tests::annotated;
    use crate::types::label::GroundTruth;

    #[test]
    fn test_export_only_suspicious() {
        let table = annotated(7, GroundTruth::Absent);
        let result = AnomalyExporter::new().export(&table).unwrap();

        let mut reader = csv::Reader::from_reader(result.as_bytes());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec![
                "transaction_id",
                "amount",
                "dist_from_home",
                "merchant_category",
                "status",
                "anomaly_score"
            ]
        );

        let ids: Vec<String> = reader
            .records()
            .map(|r| r.unwrap()[0].to_string())
            .collect();
        assert_eq!(ids, vec!["tx_0", "tx_3", "tx_6"]);
    }

    #[test]
    fn test_export_status_column() {
        let table = annotated(2, GroundTruth::Absent);
        let result = AnomalyExporter::new().export(&table).unwrap();
        let line = result.lines().nth(1).unwrap();
        assert!(line.starts_with("tx_0,0,0,travel,Suspicious,0.700000"));
    }

    #[test]
    fn test_write_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("detected_anomalies.csv");
        AnomalyExporter::new()
            .write(&annotated(3, GroundTruth::Absent), &path)
            .unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("Suspicious"));
    }
}
