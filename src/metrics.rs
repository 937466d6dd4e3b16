//! Statistics over the detection runs of one interactive session.

use crate::types::annotated::AnnotatedTable;
use std::time::Duration;
use tracing::info;

/// Metrics collector for an explorer session
#[derive(Debug, Default)]
pub struct SessionMetrics {
    /// Completed detection runs
    runs: u64,
    /// Runs aborted by a load or feature error
    failed_runs: u64,
    /// Rows scored across all runs
    rows_scored: u64,
    /// Rows flagged Suspicious across all runs
    rows_flagged: u64,
    /// Detection times (in microseconds)
    detection_times: Vec<u64>,
    /// Anomaly score distribution buckets of the latest run
    score_buckets: [u64; 10],
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed run
    pub fn record_run(&mut self, table: &AnnotatedTable, elapsed: Duration) {
        self.runs += 1;
        self.rows_scored += table.len() as u64;
        self.rows_flagged += table.suspicious_count() as u64;
        self.detection_times.push(elapsed.as_micros() as u64);

        self.score_buckets = [0; 10];
        for &score in &table.scores {
            let bucket = (score * 10.0).clamp(0.0, 9.0) as usize;
            self.score_buckets[bucket] += 1;
        }
    }

    /// Record a run that never produced labels
    pub fn record_failure(&mut self) {
        self.failed_runs += 1;
    }

    pub fn runs(&self) -> u64 {
        self.runs
    }

    pub fn failed_runs(&self) -> u64 {
        self.failed_runs
    }

    /// Share of scored rows flagged Suspicious, over all runs
    pub fn flag_rate(&self) -> f64 {
        if self.rows_scored == 0 {
            0.0
        } else {
            self.rows_flagged as f64 / self.rows_scored as f64
        }
    }

    /// Get detection time statistics
    pub fn get_timing_stats(&self) -> TimingStats {
        if self.detection_times.is_empty() {
            return TimingStats::default();
        }

        let mut sorted = self.detection_times.clone();
        sorted.sort_unstable();

        let count = sorted.len();
        TimingStats {
            count: count as u64,
            mean_us: sorted.iter().sum::<u64>() / count as u64,
            p50_us: sorted[count / 2],
            max_us: sorted[count - 1],
        }
    }

    pub fn get_score_distribution(&self) -> [u64; 10] {
        self.score_buckets
    }

    /// Print summary statistics
    pub fn print_summary(&self) {
        let timing = self.get_timing_stats();

        info!("╔══════════════════════════════════════════════════════════════╗");
        info!("║              ANOMALY EXPLORER - SESSION SUMMARY              ║");
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!(
            "║ Detection Runs: {:>6}  │  Failed Runs: {:>6}                 ║",
            self.runs, self.failed_runs
        );
        info!(
            "║ Rows Flagged:   {:>6}  │  Flag Rate:   {:>6.1}%                ║",
            self.rows_flagged,
            self.flag_rate() * 100.0
        );
        info!(
            "║ Detection Time (μs): mean={:>7} p50={:>7} max={:>7}       ║",
            timing.mean_us, timing.p50_us, timing.max_us
        );

        if self.runs == 0 {
            info!("╚══════════════════════════════════════════════════════════════╝");
            return;
        }

        info!("╠══════════════════════════════════════════════════════════════╣");
        info!("║ Anomaly Score Distribution (latest run):                     ║");
        let total: u64 = self.score_buckets.iter().sum();
        for (i, &count) in self.score_buckets.iter().enumerate() {
            let pct = if total > 0 {
                (count as f64 / total as f64) * 100.0
            } else {
                0.0
            };
            let bar: String = "█".repeat(((pct / 2.0) as usize).min(20));
            info!(
                "║   {:.1}-{:.1}: {:>6} ({:>5.1}%) {}",
                i as f64 / 10.0,
                (i + 1) as f64 / 10.0,
                count,
                pct,
                bar
            );
        }
        info!("╚══════════════════════════════════════════════════════════════╝");
    }
}

/// Detection time statistics
#[derive(Debug, Default, PartialEq)]
pub struct TimingStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub max_us: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::tests::annotated;
    use crate::types::label::GroundTruth;

    #[test]
    fn test_metrics_recording() {
        let mut metrics = SessionMetrics::new();
        let table = annotated(6, GroundTruth::Absent);

        metrics.record_run(&table, Duration::from_micros(100));
        metrics.record_run(&table, Duration::from_micros(300));
        metrics.record_failure();

        assert_eq!(metrics.runs(), 2);
        assert_eq!(metrics.failed_runs(), 1);
        assert!((metrics.flag_rate() - 2.0 / 6.0).abs() < 1e-12);

        let timing = metrics.get_timing_stats();
        assert_eq!(timing.count, 2);
        assert_eq!(timing.mean_us, 200);
        assert_eq!(timing.max_us, 300);
    }

    #[test]
    fn test_score_distribution() {
        let mut metrics = SessionMetrics::new();
        metrics.record_run(&annotated(6, GroundTruth::Absent), Duration::ZERO);

        let dist = metrics.get_score_distribution();
        assert_eq!(dist[7], 2);
        assert_eq!(dist[4], 4);
        assert_eq!(dist.iter().sum::<u64>(), 6);
    }

    #[test]
    fn test_empty_session() {
        let metrics = SessionMetrics::new();
        assert_eq!(metrics.flag_rate(), 0.0);
        assert_eq!(metrics.get_timing_stats(), TimingStats::default());
    }
}
