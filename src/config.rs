use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

use crate::error::Result;
use crate::utils::constants::{
    DEFAULT_CHART_HEIGHT, DEFAULT_CHART_WIDTH, DEFAULT_CONFIG_FILE, DEFAULT_FETCH_TIMEOUT_SECS,
    DEFAULT_OUTPUT_DIR, DEFAULT_STATION_ID, DEFAULT_WINDOW_HOURS, ENV_PREFIX, MAX_WINDOW_HOURS,
    NDBC_REALTIME_BASE_URL,
};

/// Run settings, layered as defaults, then config file, then `BUOY_*`
/// environment variables. Command line flags are applied on top by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Settings {
    #[validate(length(min = 1))]
    pub station_id: String,

    #[validate(length(min = 1))]
    pub base_url: String,

    #[validate(range(min = 1, max = MAX_WINDOW_HOURS))]
    pub window_hours: i64,

    #[validate(range(min = 1, max = 300))]
    pub timeout_secs: u64,

    pub output_dir: PathBuf,

    #[validate(range(min = 200, max = 4000))]
    pub chart_width: u32,

    #[validate(range(min = 200, max = 4000))]
    pub chart_height: u32,

    #[validate(range(min = 1))]
    pub max_workers: usize,
}

impl Settings {
    /// Load settings. `path` must exist when given; otherwise
    /// `buoy-charts.toml` in the working directory is used if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let builder = Config::builder()
            .set_default("station_id", DEFAULT_STATION_ID)?
            .set_default("base_url", NDBC_REALTIME_BASE_URL)?
            .set_default("window_hours", DEFAULT_WINDOW_HOURS)?
            .set_default("timeout_secs", DEFAULT_FETCH_TIMEOUT_SECS as i64)?
            .set_default("output_dir", DEFAULT_OUTPUT_DIR)?
            .set_default("chart_width", DEFAULT_CHART_WIDTH as i64)?
            .set_default("chart_height", DEFAULT_CHART_HEIGHT as i64)?
            .set_default("max_workers", num_cpus::get() as i64)?;

        let builder = match path {
            Some(path) => builder.add_source(File::from(path).format(FileFormat::Toml).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let settings: Settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            station_id: DEFAULT_STATION_ID.to_string(),
            base_url: NDBC_REALTIME_BASE_URL.to_string(),
            window_hours: DEFAULT_WINDOW_HOURS,
            timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            chart_width: DEFAULT_CHART_WIDTH,
            chart_height: DEFAULT_CHART_HEIGHT,
            max_workers: num_cpus::get(),
        }
    }
}
