use chrono::{DateTime, Duration, Utc};
use plotters::coord::types::RangedDateTime;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ProcessingError, Result};
use crate::models::Series;
use crate::utils::constants::{DEFAULT_CHART_HEIGHT, DEFAULT_CHART_WIDTH, DEFAULT_OUTPUT_DIR};
use crate::utils::filename::chart_filename;

/// Number of dashes drawn across the median line
const MEDIAN_DASHES: i32 = 40;

/// Everything a renderer needs for one column's chart.
#[derive(Debug, Clone)]
pub struct ChartRequest<'a> {
    pub station_id: &'a str,
    pub series: &'a Series,
    pub title: String,
    pub x_label: &'a str,
    pub y_label: &'a str,
    pub median: f64,
}

impl ChartRequest<'_> {
    pub fn column(&self) -> &str {
        &self.series.column
    }

    pub fn median_label(&self) -> String {
        format!("Median {}: {:.2}", self.column(), self.median)
    }
}

/// Persists one chart per request. An empty series must fail with `NoData`.
pub trait ChartRenderer: Send + Sync {
    fn render(&self, request: &ChartRequest<'_>) -> Result<PathBuf>;
}

/// Writes SVG line charts with a dashed median reference line.
pub struct SvgChartWriter {
    output_dir: PathBuf,
    width: u32,
    height: u32,
}

impl SvgChartWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            width: DEFAULT_CHART_WIDTH,
            height: DEFAULT_CHART_HEIGHT,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn draw(
        &self,
        request: &ChartRequest<'_>,
        path: &Path,
        (x0, x1): (DateTime<Utc>, DateTime<Utc>),
        (y0, y1): (f64, f64),
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let series = request.series;
        let root = SVGBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let x_range: RangedDateTime<DateTime<Utc>> = (x0..x1).into();
        let mut chart = ChartBuilder::on(&root)
            .caption(&request.title, ("sans-serif", 20))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(65)
            .build_cartesian_2d(x_range, y0..y1)?;

        chart
            .configure_mesh()
            .x_desc(request.x_label)
            .y_desc(request.y_label)
            .x_labels(8)
            .x_label_formatter(&|ts: &DateTime<Utc>| ts.format("%m-%d %H:%M").to_string())
            .draw()?;

        chart
            .draw_series(LineSeries::new(series.points().iter().copied(), BLUE))?
            .label(request.column())
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

        chart.draw_series(
            series
                .points()
                .iter()
                .map(|point| Circle::new(*point, 3, BLUE.filled())),
        )?;

        chart
            .draw_series(
                median_dashes(x0, x1, request.median)
                    .into_iter()
                    .map(|dash| PathElement::new(dash, RED.stroke_width(2))),
            )?
            .label(request.median_label())
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        root.present()?;
        Ok(())
    }
}

impl Default for SvgChartWriter {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_DIR)
    }
}

impl ChartRenderer for SvgChartWriter {
    fn render(&self, request: &ChartRequest<'_>) -> Result<PathBuf> {
        let no_data = || ProcessingError::NoData {
            column: request.column().to_string(),
        };
        let time_span = request.series.time_span().ok_or_else(no_data)?;
        let value_range = request.series.value_range().ok_or_else(no_data)?;

        std::fs::create_dir_all(&self.output_dir)?;
        let path = chart_filename(&self.output_dir, request.station_id, request.column(), "svg");

        self.draw(request, &path, pad_time_span(time_span), pad_value_range(value_range))
            .map_err(|e| ProcessingError::Chart(format!("{}: {}", path.display(), e)))?;

        debug!("Chart written to {}", path.display());
        Ok(path)
    }
}

/// A single reading still gets a visible x axis.
fn pad_time_span((start, end): (DateTime<Utc>, DateTime<Utc>)) -> (DateTime<Utc>, DateTime<Utc>) {
    if start == end {
        (start - Duration::minutes(30), end + Duration::minutes(30))
    } else {
        (start, end)
    }
}

fn pad_value_range((lo, hi): (f64, f64)) -> (f64, f64) {
    let span = hi - lo;
    let pad = if span > 0.0 {
        span * 0.1
    } else {
        (lo.abs() * 0.05).max(1.0)
    };
    (lo - pad, hi + pad)
}

/// Evenly spaced segments along `y = median`, every other gap left blank.
fn median_dashes(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    median: f64,
) -> Vec<Vec<(DateTime<Utc>, f64)>> {
    let step = (end - start) / (MEDIAN_DASHES * 2);
    (0..MEDIAN_DASHES)
        .map(|i| {
            let from = start + step * (i * 2);
            vec![(from, median), (from + step, median)]
        })
        .collect()
}
