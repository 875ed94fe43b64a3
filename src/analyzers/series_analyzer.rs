use crate::models::{median, ObservationSet};
use crate::processors::SeriesExtractor;
use crate::utils::constants::column_label;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStatistics {
    pub column: String,
    pub label: String,
    pub present: usize,
    pub missing: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub latest: Option<(DateTime<Utc>, f64)>,
}

impl ColumnStatistics {
    pub fn has_data(&self) -> bool {
        self.present > 0
    }

    pub fn missing_percentage(&self) -> f64 {
        let total = self.present + self.missing;
        if total == 0 {
            return 0.0;
        }
        (self.missing as f64 / total as f64) * 100.0
    }

    pub fn summary_line(&self) -> String {
        match (self.min, self.max, self.mean, self.median, self.latest) {
            (Some(min), Some(max), Some(mean), Some(median), Some((at, latest))) => format!(
                "{:<6} {:<28} n={:<4} min={:.2} max={:.2} mean={:.2} median={:.2} latest={:.2} at {} ({:.0}% missing)",
                self.column,
                self.label,
                self.present,
                min,
                max,
                mean,
                median,
                latest,
                at.format("%Y-%m-%d %H:%M"),
                self.missing_percentage()
            ),
            _ => format!(
                "{:<6} {:<28} No valid measurements ({} missing)",
                self.column, self.label, self.missing
            ),
        }
    }
}

pub struct SeriesAnalyzer;

impl SeriesAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Statistics for every distinct column in the window, in header order.
    pub fn analyze(&self, window: &ObservationSet) -> Vec<ColumnStatistics> {
        window
            .distinct_columns()
            .into_iter()
            .filter_map(|column| self.analyze_column(window, column))
            .collect()
    }

    pub fn analyze_column(&self, window: &ObservationSet, column: &str) -> Option<ColumnStatistics> {
        let series = SeriesExtractor::new().extract(window, column).ok()?;
        let values = series.values();

        let (min, max) = match series.value_range() {
            Some((lo, hi)) => (Some(lo), Some(hi)),
            None => (None, None),
        };
        let mean = if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f64>() / values.len() as f64)
        };
        // The feed lists newest first but is not guaranteed sorted
        let latest = series
            .points()
            .iter()
            .copied()
            .max_by_key(|(timestamp, _)| *timestamp);

        Some(ColumnStatistics {
            column: column.to_string(),
            label: column_label(column).to_string(),
            present: series.len(),
            missing: window.len() - series.len(),
            min,
            max,
            mean,
            median: median(&values),
            latest,
        })
    }
}

impl Default for SeriesAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Observation, Reading};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap()
    }

    fn window() -> ObservationSet {
        ObservationSet::new(
            vec!["hPa".to_string(), "ft".to_string()],
            vec![
                Observation::new(at(3), vec![Reading::Present(1012.0), Reading::Missing]),
                Observation::new(at(2), vec![Reading::Present(1010.0), Reading::Missing]),
                Observation::new(at(1), vec![Reading::Missing, Reading::Missing]),
                Observation::new(at(0), vec![Reading::Present(1014.0), Reading::Missing]),
            ],
        )
    }

    #[test]
    fn test_analyze_column() {
        let stats = SeriesAnalyzer::new().analyze_column(&window(), "hPa").unwrap();

        assert_eq!(stats.label, "Pressure (hPa)");
        assert_eq!(stats.present, 3);
        assert_eq!(stats.missing, 1);
        assert_eq!(stats.min, Some(1010.0));
        assert_eq!(stats.max, Some(1014.0));
        assert_eq!(stats.mean, Some(1012.0));
        assert_eq!(stats.median, Some(1012.0));
        assert_eq!(stats.latest, Some((at(3), 1012.0)));
        assert_eq!(stats.missing_percentage(), 25.0);
        assert!(stats.summary_line().contains("median=1012.00"));
    }

    #[test]
    fn test_all_missing_column() {
        let stats = SeriesAnalyzer::new().analyze(&window());

        assert_eq!(stats.len(), 2);
        assert!(!stats[1].has_data());
        assert_eq!(stats[1].median, None);
        assert!(stats[1].summary_line().contains("No valid measurements (4 missing)"));
    }

    #[test]
    fn test_unknown_column() {
        assert!(SeriesAnalyzer::new().analyze_column(&window(), "knots").is_none());
    }
}
