use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{ProcessingError, Result};

/// Present values of one column, in window order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub column: String,
    points: Vec<(DateTime<Utc>, f64)>,
}

impl Series {
    pub fn new(column: impl Into<String>, points: Vec<(DateTime<Utc>, f64)>) -> Self {
        Self {
            column: column.into(),
            points,
        }
    }

    pub fn points(&self) -> &[(DateTime<Utc>, f64)] {
        &self.points
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|(_, value)| *value).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn median(&self) -> Result<f64> {
        median(&self.values()).ok_or_else(|| ProcessingError::NoData {
            column: self.column.clone(),
        })
    }

    /// Earliest and latest timestamps; the feed is not guaranteed sorted.
    pub fn time_span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let first = self.points.first()?.0;
        Some(self.points.iter().fold((first, first), |(lo, hi), (ts, _)| {
            (lo.min(*ts), hi.max(*ts))
        }))
    }

    pub fn value_range(&self) -> Option<(f64, f64)> {
        let first = self.points.first()?.1;
        Some(self.points.iter().fold((first, first), |(lo, hi), (_, v)| {
            (lo.min(*v), hi.max(*v))
        }))
    }
}

/// Median of `values`, averaging the two middle values for even lengths.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}
