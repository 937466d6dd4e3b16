//! SVG scatter chart of the two feature columns

use crate::render::{Report, ScatterPoint};
use crate::types::label::AnomalyLabel;
use anyhow::{Context, Result};
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;
use tracing::info;

const NORMAL_COLOR: RGBColor = RGBColor(0x00, 0xCC, 0x96);
const SUSPICIOUS_COLOR: RGBColor = RGBColor(0xEF, 0x55, 0x3B);

/// Scatter of feature x against feature y, colored and shaped by label.
pub struct ScatterChart {
    size: (u32, u32),
}

impl ScatterChart {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
        }
    }

    /// Render the chart as an SVG document
    pub fn render_svg(&self, report: &Report) -> Result<String> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, self.size).into_drawing_area();
            root.fill(&WHITE)?;

            let x_range = axis_range(report.points.iter().map(|p| p.x));
            let y_range = axis_range(report.points.iter().map(|p| p.y));

            let mut chart = ChartBuilder::on(&root)
                .caption(&report.title, ("sans-serif", 22))
                .margin(15)
                .x_label_area_size(40)
                .y_label_area_size(60)
                .build_cartesian_2d(x_range, y_range)?;

            chart
                .configure_mesh()
                .x_desc(report.x_label.as_str())
                .y_desc(report.y_label.as_str())
                .draw()?;

            chart
                .draw_series(
                    points_with(report, AnomalyLabel::Normal)
                        .map(|p| Circle::new((p.x, p.y), 4, NORMAL_COLOR.filled())),
                )?
                .label(AnomalyLabel::Normal.as_str())
                .legend(|(x, y)| Circle::new((x, y), 4, NORMAL_COLOR.filled()));

            chart
                .draw_series(
                    points_with(report, AnomalyLabel::Suspicious)
                        .map(|p| TriangleMarker::new((p.x, p.y), 6, SUSPICIOUS_COLOR.filled())),
                )?
                .label(AnomalyLabel::Suspicious.as_str())
                .legend(|(x, y)| TriangleMarker::new((x, y), 6, SUSPICIOUS_COLOR.filled()));

            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()?;

            root.present()?;
        }
        Ok(svg)
    }

    /// Render and write the chart, creating parent directories as needed
    pub fn write<P: AsRef<Path>>(&self, report: &Report, path: P) -> Result<()> {
        let path = path.as_ref();
        let svg = self.render_svg(report)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(path, svg)
            .with_context(|| format!("Failed to write scatter chart to {}", path.display()))?;

        info!(path = %path.display(), points = report.points.len(), "Scatter chart written");
        Ok(())
    }
}

impl Default for ScatterChart {
    fn default() -> Self {
        Self::new(1200, 700)
    }
}

fn points_with(report: &Report, label: AnomalyLabel) -> impl Iterator<Item = &ScatterPoint> {
    report.points.iter().filter(move |p| p.label == label)
}

/// Data bounds padded by 5% on each side
fn axis_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });

    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }
    if hi <= lo {
        return (lo - 1.0)..(hi + 1.0);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad)..(hi + pad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::tests::annotated;
    use crate::types::label::GroundTruth;

    #[test]
    fn test_axis_range() {
        let range = axis_range([0.0, 10.0].into_iter());
        assert!((range.start + 0.5).abs() < 1e-9);
        assert!((range.end - 10.5).abs() < 1e-9);
        assert_eq!(axis_range([3.0, 3.0].into_iter()), 2.0..4.0);
        assert_eq!(axis_range(std::iter::empty()), 0.0..1.0);
    }

    #[test]
    fn test_render_svg() {
        let report = Report::from_table(&annotated(9, GroundTruth::Absent));
        let svg = ScatterChart::default().render_svg(&report).unwrap();

        assert!(svg.contains("<svg"));
        assert!(svg.contains("Anomaly Detection: amount vs dist_from_home"));
        assert!(svg.contains("Suspicious"));
    }

    #[test]
    fn test_write_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("charts").join("scatter.svg");
        let report = Report::from_table(&annotated(4, GroundTruth::Absent));

        ScatterChart::default().write(&report, &path).unwrap();
        assert!(path.exists());
    }
}
