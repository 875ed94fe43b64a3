use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LineError;
use crate::utils::constants::MISSING_TOKEN;

/// A single measured value, or the feed's explicit "missing" marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Reading {
    Present(f64),
    Missing,
}

impl Reading {
    /// Parse a raw feed token. Returns `None` for anything that is neither
    /// the missing marker nor a finite number.
    pub fn parse(token: &str) -> Option<Self> {
        if token == MISSING_TOKEN {
            return Some(Reading::Missing);
        }

        match token.parse::<f64>() {
            Ok(value) if value.is_finite() => Some(Reading::Present(value)),
            _ => None,
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Reading::Present(value) => Some(*value),
            Reading::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Reading::Missing)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub timestamp: DateTime<Utc>,
    readings: Vec<Reading>,
}

impl Observation {
    pub fn new(timestamp: DateTime<Utc>, readings: Vec<Reading>) -> Self {
        Self {
            timestamp,
            readings,
        }
    }

    /// Readings in header column order.
    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn reading(&self, index: usize) -> Option<Reading> {
        self.readings.get(index).copied()
    }
}

/// Parsed records together with the data column names they are keyed by.
///
/// Every record holds exactly one reading per column; the parser discards
/// lines that cannot satisfy that.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservationSet {
    columns: Vec<String>,
    records: Vec<Observation>,
}

impl ObservationSet {
    pub fn new(columns: Vec<String>, records: Vec<Observation>) -> Self {
        debug_assert!(records.iter().all(|r| r.readings.len() == columns.len()));
        Self { columns, records }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Observation] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Position of `column` in each record. A repeated header name resolves
    /// to its last occurrence.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().rposition(|c| c == column)
    }

    /// Column names with repeats removed, in first-seen header order.
    pub fn distinct_columns(&self) -> Vec<&str> {
        let mut seen = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            if !seen.contains(&column.as_str()) {
                seen.push(column.as_str());
            }
        }
        seen
    }

    /// New set with the same columns and only the records matching `predicate`,
    /// in their original order.
    pub fn select<F>(&self, predicate: F) -> ObservationSet
    where
        F: Fn(&Observation) -> bool,
    {
        ObservationSet {
            columns: self.columns.clone(),
            records: self
                .records
                .iter()
                .filter(|record| predicate(record))
                .cloned()
                .collect(),
        }
    }
}

/// A data line the parser dropped, with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedLine {
    pub line_number: usize,
    pub reason: LineError,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_reading_parse() {
        assert_eq!(Reading::parse("120"), Some(Reading::Present(120.0)));
        assert_eq!(Reading::parse("-1.5"), Some(Reading::Present(-1.5)));
        assert_eq!(Reading::parse("MM"), Some(Reading::Missing));
        assert_eq!(Reading::parse("abc"), None);
        assert_eq!(Reading::parse("NaN"), None);
        assert_eq!(Reading::parse("inf"), None);
    }

    #[test]
    fn test_reading_value() {
        assert_eq!(Reading::Present(3.5).value(), Some(3.5));
        assert_eq!(Reading::Missing.value(), None);
        assert!(Reading::Missing.is_missing());
    }

    #[test]
    fn test_duplicate_columns_resolve_to_last() {
        let set = ObservationSet::new(
            vec!["degT".to_string(), "m/s".to_string(), "m/s".to_string()],
            vec![],
        );

        assert_eq!(set.column_index("m/s"), Some(2));
        assert_eq!(set.column_index("degT"), Some(0));
        assert_eq!(set.column_index("hPa"), None);
        assert_eq!(set.distinct_columns(), vec!["degT", "m/s"]);
    }

    #[test]
    fn test_select_keeps_order_and_columns() {
        let set = ObservationSet::new(
            vec!["degT".to_string()],
            vec![
                Observation::new(at(0), vec![Reading::Present(1.0)]),
                Observation::new(at(1), vec![Reading::Missing]),
                Observation::new(at(2), vec![Reading::Present(3.0)]),
            ],
        );

        let selected = set.select(|r| r.timestamp != at(1));

        assert_eq!(selected.columns(), set.columns());
        assert_eq!(selected.len(), 2);
        assert_eq!(selected.records()[0].timestamp, at(0));
        assert_eq!(selected.records()[1].timestamp, at(2));
    }
}
