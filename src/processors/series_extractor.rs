use crate::error::{ProcessingError, Result};
use crate::models::{ObservationSet, Series};

pub struct SeriesExtractor;

impl SeriesExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Project one column of the window into `(timestamp, value)` pairs,
    /// dropping missing readings. Fails only when the column is not in the header.
    pub fn extract(&self, window: &ObservationSet, column: &str) -> Result<Series> {
        let index = window
            .column_index(column)
            .ok_or_else(|| ProcessingError::MissingColumn {
                column: column.to_string(),
            })?;

        let points = window
            .records()
            .iter()
            .filter_map(|record| {
                record
                    .reading(index)
                    .and_then(|reading| reading.value())
                    .map(|value| (record.timestamp, value))
            })
            .collect();

        Ok(Series::new(column, points))
    }

    /// Extract a column and its median. An empty series is `NoData`.
    pub fn extract_with_median(&self, window: &ObservationSet, column: &str) -> Result<(Series, f64)> {
        let series = self.extract(window, column)?;
        let median = series.median()?;
        Ok((series, median))
    }
}

impl Default for SeriesExtractor {
    fn default() -> Self {
        Self::new()
    }
}
