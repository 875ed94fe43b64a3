use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

use super::SkippedLine;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum NoDataCause {
    /// No present readings fell inside the window.
    EmptyWindow,
    /// The renderer gave up on a non-empty series.
    RenderFailed(String),
}

/// Terminal state of one column in a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ColumnOutcome {
    Rendered {
        path: PathBuf,
        median: f64,
        points: usize,
    },
    NoData {
        cause: NoDataCause,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnReport {
    pub column: String,
    pub label: String,
    #[serde(flatten)]
    pub outcome: ColumnOutcome,
}

impl ColumnReport {
    pub fn is_rendered(&self) -> bool {
        matches!(self.outcome, ColumnOutcome::Rendered { .. })
    }
}

/// Aggregate result of one fetch-parse-filter-plot cycle.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub station_id: String,
    pub source: String,
    pub generated_at: DateTime<Utc>,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub total_records: usize,
    pub window_records: usize,
    pub skipped_lines: Vec<SkippedLine>,
    /// Set when the feed could not be retrieved; the run then has no columns.
    pub fetch_error: Option<String>,
    pub columns: Vec<ColumnReport>,
}

impl RunReport {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn rendered(&self) -> impl Iterator<Item = &ColumnReport> {
        self.columns.iter().filter(|c| c.is_rendered())
    }

    /// Names of columns that ended without a chart, in report order.
    pub fn no_data_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| !c.is_rendered())
            .map(|c| c.column.as_str())
            .collect()
    }

    pub fn summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str(&format!("=== Station {} ===\n", self.station_id));
        summary.push_str(&format!("Source: {}\n", self.source));
        if let Some(ref error) = self.fetch_error {
            summary.push_str(&format!("Fetch failed: {}\n", error));
        }
        summary.push_str(&format!(
            "Window: {} to {}\n",
            self.window_start.format("%Y-%m-%d %H:%M UTC"),
            self.window_end.format("%Y-%m-%d %H:%M UTC")
        ));
        summary.push_str(&format!(
            "Records: {} parsed, {} in window, {} lines skipped\n",
            self.total_records,
            self.window_records,
            self.skipped_lines.len()
        ));
        summary.push_str(&format!(
            "Columns: {} rendered, {} without data\n",
            self.rendered().count(),
            self.no_data_columns().len()
        ));

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn report(columns: Vec<ColumnReport>) -> RunReport {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        RunReport {
            station_id: "46029".to_string(),
            source: "test".to_string(),
            generated_at: now,
            window_start: now - chrono::Duration::hours(12),
            window_end: now,
            total_records: 10,
            window_records: 4,
            skipped_lines: vec![],
            fetch_error: None,
            columns,
        }
    }

    #[test]
    fn test_no_data_columns() {
        let report = report(vec![
            ColumnReport {
                column: "degT".to_string(),
                label: "Wind Direction (degrees)".to_string(),
                outcome: ColumnOutcome::Rendered {
                    path: PathBuf::from("charts/buoy_data_46029_degT.svg"),
                    median: 120.0,
                    points: 4,
                },
            },
            ColumnReport {
                column: "ft".to_string(),
                label: "Tide (feet)".to_string(),
                outcome: ColumnOutcome::NoData {
                    cause: NoDataCause::EmptyWindow,
                },
            },
        ]);

        assert_eq!(report.no_data_columns(), vec!["ft"]);
        assert_eq!(report.rendered().count(), 1);
        assert!(report.summary().contains("1 rendered, 1 without data"));
    }

    #[test]
    fn test_serializes_outcome_tags() {
        let report = report(vec![ColumnReport {
            column: "nmi".to_string(),
            label: "Visibility (nautical miles)".to_string(),
            outcome: ColumnOutcome::NoData {
                cause: NoDataCause::RenderFailed("disk full".to_string()),
            },
        }]);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["columns"][0]["status"], "no_data");
        assert_eq!(json["columns"][0]["cause"]["kind"], "render_failed");
        assert_eq!(json["columns"][0]["cause"]["detail"], "disk full");
    }
}
