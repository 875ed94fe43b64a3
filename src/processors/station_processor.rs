use crate::error::{ProcessingError, Result};
use crate::models::{ColumnOutcome, ColumnReport, NoDataCause, ObservationSet, RunReport};
use crate::processors::{SeriesExtractor, TimeWindow, WindowFilter};
use crate::readers::{FeedParser, FeedSource};
use crate::utils::constants::{column_label, DEFAULT_WINDOW_HOURS};
use crate::utils::progress::ProgressReporter;
use crate::writers::{ChartRenderer, ChartRequest};
use chrono::Utc;
use rayon::prelude::*;
use tracing::{info, instrument, warn};

/// Drives one fetch-parse-filter-plot cycle for a station.
pub struct StationProcessor {
    max_workers: usize,
    window_hours: i64,
    window: Option<TimeWindow>,
    columns: Option<Vec<String>>,
}

impl StationProcessor {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
            window_hours: DEFAULT_WINDOW_HOURS,
            window: None,
            columns: None,
        }
    }

    pub fn with_window_hours(mut self, hours: i64) -> Self {
        self.window_hours = hours;
        self
    }

    /// Use a fixed window instead of one ending at the time the feed arrives.
    pub fn with_window(mut self, window: TimeWindow) -> Self {
        self.window = Some(window);
        self
    }

    /// Only chart these columns. Each must exist in the feed header.
    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = Some(columns).filter(|c| !c.is_empty());
        self
    }

    fn resolve_window(&self) -> TimeWindow {
        self.window
            .unwrap_or_else(|| TimeWindow::trailing_hours(self.window_hours))
    }

    /// Fetch the station feed once and chart every column from it.
    ///
    /// A failed fetch is not an error: the report comes back with no columns
    /// and `fetch_error` set.
    #[instrument(skip(self, source, renderer, progress))]
    pub async fn process_station(
        &self,
        source: &dyn FeedSource,
        renderer: &dyn ChartRenderer,
        station_id: &str,
        progress: Option<&ProgressReporter>,
    ) -> Result<RunReport> {
        let description = source.describe(station_id);
        info!("Fetching feed from {}", description);

        match source.fetch(station_id).await {
            Ok(raw) => self.process_feed(&raw, renderer, station_id, &description, progress),
            Err(e) => {
                warn!("Error fetching buoy data for station {}: {}", station_id, e);
                let window = self.resolve_window();
                Ok(RunReport {
                    station_id: station_id.to_string(),
                    source: description,
                    generated_at: Utc::now(),
                    window_start: window.start,
                    window_end: window.end,
                    total_records: 0,
                    window_records: 0,
                    skipped_lines: Vec::new(),
                    fetch_error: Some(e.to_string()),
                    columns: Vec::new(),
                })
            }
        }
    }

    /// Parse raw feed text, window it and chart each column.
    pub fn process_feed(
        &self,
        raw: &str,
        renderer: &dyn ChartRenderer,
        station_id: &str,
        source: &str,
        progress: Option<&ProgressReporter>,
    ) -> Result<RunReport> {
        let parsed = FeedParser::new().parse(raw)?;
        let window = self.resolve_window();
        let filtered = WindowFilter::new(window).filter(&parsed.observations);
        info!(
            "Parsed {} records, {} inside {} to {}",
            parsed.observations.len(),
            filtered.len(),
            window.start,
            window.end
        );

        let columns = self.select_columns(&filtered)?;
        if let Some(p) = progress {
            p.set_length(columns.len() as u64);
        }
        let reports = self.process_columns(&filtered, &columns, renderer, station_id, &window, progress)?;

        Ok(RunReport {
            station_id: station_id.to_string(),
            source: source.to_string(),
            generated_at: Utc::now(),
            window_start: window.start,
            window_end: window.end,
            total_records: parsed.observations.len(),
            window_records: filtered.len(),
            skipped_lines: parsed.skipped,
            fetch_error: None,
            columns: reports,
        })
    }

    fn select_columns(&self, window: &ObservationSet) -> Result<Vec<String>> {
        match self.columns {
            Some(ref requested) => {
                let mut selected: Vec<String> = Vec::with_capacity(requested.len());
                for column in requested {
                    if !window.has_column(column) {
                        return Err(ProcessingError::MissingColumn {
                            column: column.clone(),
                        });
                    }
                    if !selected.contains(column) {
                        selected.push(column.clone());
                    }
                }
                Ok(selected)
            }
            None => Ok(window
                .distinct_columns()
                .into_iter()
                .map(str::to_string)
                .collect()),
        }
    }

    /// Columns are independent; results come back in `columns` order.
    fn process_columns(
        &self,
        window: &ObservationSet,
        columns: &[String],
        renderer: &dyn ChartRenderer,
        station_id: &str,
        time_window: &TimeWindow,
        progress: Option<&ProgressReporter>,
    ) -> Result<Vec<ColumnReport>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| ProcessingError::Config(e.to_string()))?;

        pool.install(|| {
            columns
                .par_iter()
                .map(|column| {
                    if let Some(p) = progress {
                        p.set_message(column);
                    }
                    let result = self.process_column(window, column, renderer, station_id, time_window);
                    if let Some(p) = progress {
                        p.increment(1);
                    }
                    result
                })
                .collect()
        })
    }

    fn process_column(
        &self,
        window: &ObservationSet,
        column: &str,
        renderer: &dyn ChartRenderer,
        station_id: &str,
        time_window: &TimeWindow,
    ) -> Result<ColumnReport> {
        let label = column_label(column).to_string();

        let outcome = match SeriesExtractor::new().extract_with_median(window, column) {
            Ok((series, median)) => {
                let request = ChartRequest {
                    station_id,
                    series: &series,
                    title: format!(
                        "Buoy Data - Station {} (Last {} Hours) - {}",
                        station_id,
                        time_window.duration().num_hours(),
                        column
                    ),
                    x_label: "Time",
                    y_label: &label,
                    median,
                };

                match renderer.render(&request) {
                    Ok(path) => {
                        info!("Plot saved for column {}: {}", column, path.display());
                        ColumnOutcome::Rendered {
                            path,
                            median,
                            points: series.len(),
                        }
                    }
                    Err(ProcessingError::NoData { .. }) => ColumnOutcome::NoData {
                        cause: NoDataCause::EmptyWindow,
                    },
                    Err(e) => {
                        warn!("Error plotting column {}: {}", column, e);
                        ColumnOutcome::NoData {
                            cause: NoDataCause::RenderFailed(e.to_string()),
                        }
                    }
                }
            }
            Err(ProcessingError::NoData { .. }) => {
                info!("No data available for column: {}", column);
                ColumnOutcome::NoData {
                    cause: NoDataCause::EmptyWindow,
                }
            }
            Err(e) => return Err(e),
        };

        Ok(ColumnReport {
            column: column.to_string(),
            label,
            outcome,
        })
    }
}

impl Default for StationProcessor {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}
