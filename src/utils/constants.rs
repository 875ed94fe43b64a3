/// Raw token the feed uses for a missing measurement
pub const MISSING_TOKEN: &str = "MM";

/// Feed layout
pub const HEADER_LINE_INDEX: usize = 1;
pub const FIRST_DATA_LINE_INDEX: usize = 2;
pub const TIMESTAMP_FIELDS: usize = 5;
pub const MIN_FEED_LINES: usize = 3;

/// NDBC realtime feed location
pub const NDBC_REALTIME_BASE_URL: &str = "https://www.ndbc.noaa.gov/data/realtime2";
pub const DEFAULT_STATION_ID: &str = "46029";

/// Processing defaults
pub const DEFAULT_WINDOW_HOURS: i64 = 12;
pub const MAX_WINDOW_HOURS: i64 = 45 * 24; // realtime2 keeps 45 days
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Chart defaults
pub const DEFAULT_OUTPUT_DIR: &str = "charts";
pub const DEFAULT_CHART_WIDTH: u32 = 1000;
pub const DEFAULT_CHART_HEIGHT: u32 = 500;
pub const CHART_FILE_PREFIX: &str = "buoy_data";

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "buoy-charts.toml";
pub const ENV_PREFIX: &str = "BUOY";

/// Axis labels for the unit tokens NDBC uses as column names
pub const COLUMN_LABELS: &[(&str, &str)] = &[
    ("degT", "Wind Direction (degrees)"),
    ("m/s", "Wind Speed (m/s)"),
    ("m", "Wave Height (meters)"),
    ("sec", "Wave Period (seconds)"),
    ("hPa", "Pressure (hPa)"),
    ("degC", "Temperature (Celsius)"),
    ("nmi", "Visibility (nautical miles)"),
    ("ft", "Tide (feet)"),
];

/// Human label for a column, falling back to the raw name.
pub fn column_label(column: &str) -> &str {
    COLUMN_LABELS
        .iter()
        .find(|(name, _)| *name == column)
        .map(|(_, label)| *label)
        .unwrap_or(column)
}
