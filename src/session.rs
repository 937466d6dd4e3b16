//! One interactive session: cached load, full refit and render per input.

use crate::config::{AppConfig, OutputConfig};
use crate::control::Contamination;
use crate::error::{DetectError, LoadError};
use crate::loader::DatasetCache;
use crate::metrics::SessionMetrics;
use crate::models::detector::AnomalyDetector;
use crate::render::{AnomalyExporter, Report, ScatterChart, TerminalRenderer};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info, info_span};
use uuid::Uuid;

/// Result of a single pass
#[derive(Debug)]
pub enum RunOutcome {
    /// No dataset available; detection was not attempted
    LoadFailed(LoadError),
    /// Dataset loaded but it cannot be scored
    DetectionFailed {
        error: DetectError,
        /// Data preview, present on the first successful load only
        preview: Option<String>,
    },
    Completed(Box<CompletedRun>),
}

#[derive(Debug)]
pub struct CompletedRun {
    pub run_id: Uuid,
    pub finished_at: DateTime<Utc>,
    pub report: Report,
    /// Data preview, present on the first successful load only
    pub preview: Option<String>,
    /// Files written by the chart and export sinks
    pub artifacts: Vec<PathBuf>,
}

/// Interactive explorer state shared across passes
pub struct Session {
    cache: DatasetCache,
    detector: AnomalyDetector,
    output: OutputConfig,
    terminal: TerminalRenderer,
    chart: ScatterChart,
    exporter: AnomalyExporter,
    metrics: SessionMetrics,
    preview_shown: bool,
}

impl Session {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            cache: DatasetCache::new(&config.data.path),
            detector: AnomalyDetector::new(&config.detector),
            output: config.output.clone(),
            terminal: TerminalRenderer::new(),
            chart: ScatterChart::default(),
            exporter: AnomalyExporter::new(),
            metrics: SessionMetrics::new(),
            preview_shown: false,
        }
    }

    pub fn metrics(&self) -> &SessionMetrics {
        &self.metrics
    }

    /// Load (cached), refit over every row, and render.
    pub fn run(&mut self, contamination: Contamination) -> RunOutcome {
        let run_id = Uuid::new_v4();
        let span = info_span!("detection_run", run_id = %run_id, contamination = %contamination);
        let _enter = span.enter();

        let dataset = match self.cache.get_or_load() {
            Ok(dataset) => dataset,
            Err(e) => {
                self.metrics.record_failure();
                return RunOutcome::LoadFailed(e);
            }
        };

        let preview = if self.preview_shown {
            None
        } else {
            self.preview_shown = true;
            Some(self.terminal.preview(&dataset, self.output.preview_rows))
        };

        let start = Instant::now();
        let table = match self.detector.detect(&dataset, contamination.value()) {
            Ok(table) => table,
            Err(e) => {
                error!(error = %e, "Detection aborted");
                self.metrics.record_failure();
                return RunOutcome::DetectionFailed { error: e, preview };
            }
        };
        self.metrics.record_run(&table, start.elapsed());

        let report = Report::from_table(&table);
        let mut artifacts = Vec::new();

        let scatter_path = self.output.scatter_path();
        match self.chart.write(&report, &scatter_path) {
            Ok(()) => artifacts.push(scatter_path),
            Err(e) => error!(error = %format!("{:#}", e), "Failed to write scatter chart"),
        }

        let export_path = self.output.export_path();
        match self.exporter.write(&table, &export_path) {
            Ok(()) => artifacts.push(export_path),
            Err(e) => error!(error = %format!("{:#}", e), "Failed to export anomaly list"),
        }

        info!(
            suspicious = report.suspicious_count,
            total = report.total_rows,
            "Run rendered"
        );

        RunOutcome::Completed(Box::new(CompletedRun {
            run_id,
            finished_at: Utc::now(),
            report,
            preview,
            artifacts,
        }))
    }

    /// Text shown to the user for an outcome
    pub fn display(&self, outcome: &RunOutcome) -> String {
        match outcome {
            RunOutcome::LoadFailed(e) => self.terminal.load_failure(e),
            RunOutcome::DetectionFailed { error, preview } => {
                let mut out = preview_block(preview.as_deref());
                out.push_str(&self.terminal.detection_failure(error));
                out
            }
            RunOutcome::Completed(run) => {
                let mut out = preview_block(run.preview.as_deref());
                out.push_str(&self.terminal.render(&run.report));
                out.push_str(&format!(
                    "\nRun {} finished at {}\n",
                    run.run_id,
                    run.finished_at.format("%Y-%m-%d %H:%M:%S UTC")
                ));
                for path in &run.artifacts {
                    out.push_str(&format!("Wrote {}\n", path.display()));
                }
                out
            }
        }
    }
}

fn preview_block(preview: Option<&str>) -> String {
    preview.map(|p| format!("{}\n\n", p)).unwrap_or_default()
}
