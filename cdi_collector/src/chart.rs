//! Line chart of a [`RateSeries`].
//!
//! The x axis is the row index (collection order), not a time axis.

use std::fmt::Display;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use plotters::style::{FontDesc, FontFamily, FontStyle};
use thiserror::Error;
use tracing::info;

use crate::models::series::RateSeries;

/// Extension of rendered charts.
pub const CHART_EXTENSION: &str = "svg";

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("no observations to plot")]
    EmptySeries,

    #[error("invalid chart name {0:?}: must be non-empty and contain no path separators")]
    InvalidName(String),

    #[error("failed to render chart {}: {message}", path.display())]
    Render { path: PathBuf, message: String },
}

/// Size and labels of the rendered chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 1800,
            height: 900,
            title: "Evolução da Taxa CDI".to_string(),
            x_label: "Coleta".to_string(),
            y_label: "Taxa CDI (%)".to_string(),
        }
    }
}

/// `<out_dir>/<name>.svg`, after checking that `name` is a bare file stem.
pub fn chart_path(out_dir: &Path, name: &str) -> Result<PathBuf, ChartError> {
    let name = name.trim();
    if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(ChartError::InvalidName(name.to_string()));
    }
    Ok(out_dir.join(format!("{name}.{CHART_EXTENSION}")))
}

/// Renders `series` and returns the path of the written file.
///
/// Nothing is written for an empty series.
pub fn render_line_chart(
    series: &RateSeries,
    options: &ChartOptions,
    out_dir: &Path,
    name: &str,
) -> Result<PathBuf, ChartError> {
    let path = chart_path(out_dir, name)?;
    let (y_min, y_max) = padded_bounds(series).ok_or(ChartError::EmptySeries)?;
    let x_max = series.len().saturating_sub(1).max(1) as f64;

    let points: Vec<(f64, f64)> = series
        .points()
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.rate))
        .collect();

    {
        let root = SVGBackend::new(&path, (options.width, options.height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_error(&path))?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                &options.title,
                FontDesc::new(FontFamily::SansSerif, 28.0, FontStyle::Bold),
            )
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(-0.5f64..x_max + 0.5, y_min..y_max)
            .map_err(render_error(&path))?;

        chart
            .configure_mesh()
            .x_desc(options.x_label.as_str())
            .y_desc(options.y_label.as_str())
            .x_labels(series.len().clamp(2, 20))
            .x_label_formatter(&|x| format!("{x:.0}"))
            .y_label_formatter(&|y| format!("{y:.2}"))
            .light_line_style(RGBColor(235, 235, 235))
            .axis_desc_style(FontDesc::new(FontFamily::SansSerif, 18.0, FontStyle::Normal))
            .draw()
            .map_err(render_error(&path))?;

        chart
            .draw_series(LineSeries::new(points.iter().copied(), BLUE.stroke_width(2)))
            .map_err(render_error(&path))?;
        chart
            .draw_series(
                points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 5, BLUE.filled())),
            )
            .map_err(render_error(&path))?;

        root.present().map_err(render_error(&path))?;
    }

    info!(path = %path.display(), points = series.len(), "chart written");
    Ok(path)
}

fn padded_bounds(series: &RateSeries) -> Option<(f64, f64)> {
    let (lo, hi) = series.bounds()?;
    let pad = if hi > lo { (hi - lo) * 0.05 } else { 0.1 };
    Some((lo - pad, hi + pad))
}

fn render_error<E: Display>(path: &Path) -> impl Fn(E) -> ChartError + '_ {
    move |e| ChartError::Render {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_path_like_names() {
        let dir = Path::new("charts");
        assert!(chart_path(dir, "").is_err());
        assert!(chart_path(dir, "../evil").is_err());
        assert!(chart_path(dir, "a\\b").is_err());
        assert_eq!(
            chart_path(dir, "grafico-cdi").unwrap(),
            Path::new("charts/grafico-cdi.svg")
        );
    }

    #[test]
    fn empty_series_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let err = render_line_chart(&RateSeries::new(), &ChartOptions::default(), dir.path(), "x")
            .unwrap_err();
        assert!(matches!(err, ChartError::EmptySeries));
        assert!(!dir.path().join("x.svg").exists());
    }

    #[test]
    fn flat_series_gets_a_visible_range() {
        let mut series = RateSeries::new();
        series.push("10:00:00", 13.0);
        let (lo, hi) = padded_bounds(&series).unwrap();
        assert!((lo - 12.9).abs() < 1e-9 && (hi - 13.1).abs() < 1e-9);
    }

    #[test]
    fn renders_svg_with_labels() {
        let dir = tempfile::tempdir().unwrap();
        let mut series = RateSeries::new();
        for (i, rate) in [13.1, 12.9, 13.4].into_iter().enumerate() {
            series.push(format!("10:00:0{i}"), rate);
        }

        let path = render_line_chart(&series, &ChartOptions::default(), dir.path(), "analise-cdi")
            .unwrap();
        assert_eq!(path, dir.path().join("analise-cdi.svg"));

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("Evolução da Taxa CDI"));
        assert!(svg.contains("Taxa CDI (%)"));
    }
}
