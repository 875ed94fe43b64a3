use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::models::ObservationSet;
use crate::utils::constants::DEFAULT_WINDOW_HOURS;

/// Trailing time interval `[end - duration, end]`, inclusive at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(reference_time: DateTime<Utc>, duration: Duration) -> Self {
        Self {
            start: reference_time - duration,
            end: reference_time,
        }
    }

    /// Window of `duration` ending at the current instant.
    pub fn trailing(duration: Duration) -> Self {
        Self::new(Utc::now(), duration)
    }

    pub fn trailing_hours(hours: i64) -> Self {
        Self::trailing(Duration::hours(hours))
    }

    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self::trailing_hours(DEFAULT_WINDOW_HOURS)
    }
}

pub struct WindowFilter {
    window: TimeWindow,
}

impl WindowFilter {
    pub fn new(window: TimeWindow) -> Self {
        Self { window }
    }

    pub fn window(&self) -> &TimeWindow {
        &self.window
    }

    /// Records inside the window, in their original order.
    pub fn filter(&self, observations: &ObservationSet) -> ObservationSet {
        observations.select(|record| self.window.contains(record.timestamp))
    }
}

impl Default for WindowFilter {
    fn default() -> Self {
        Self::new(TimeWindow::default())
    }
}
