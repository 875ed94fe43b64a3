use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Settings;

#[derive(Parser)]
#[command(name = "buoy-charts")]
#[command(about = "Chart recent NDBC buoy observations, one chart per measurement")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Hide progress output")]
    pub quiet: bool,

    #[arg(long, global = true, help = "Settings file (TOML) [default: buoy-charts.toml]")]
    pub config: Option<PathBuf>,
}

/// Where the feed comes from and how much of it to keep.
#[derive(Args, Debug, Clone, Default)]
pub struct FeedArgs {
    #[arg(short, long, help = "NDBC station identifier [default: 46029]")]
    pub station: Option<String>,

    #[arg(long, help = "Length of the trailing window in hours [default: 12]")]
    pub hours: Option<i64>,

    #[arg(short, long, help = "Read a saved realtime2 feed instead of fetching it")]
    pub input: Option<PathBuf>,
}

impl FeedArgs {
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(ref station) = self.station {
            settings.station_id = station.clone();
        }
        if let Some(hours) = self.hours {
            settings.window_hours = hours;
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch a station feed and save a chart for every column
    Plot {
        #[command(flatten)]
        feed: FeedArgs,

        #[arg(short, long, help = "Directory for chart files [default: charts]")]
        output_dir: Option<PathBuf>,

        #[arg(long, value_delimiter = ',', help = "Only chart these columns")]
        columns: Vec<String>,

        #[arg(long)]
        max_workers: Option<usize>,

        #[arg(long, help = "Write the run report as JSON")]
        report: Option<PathBuf>,
    },

    /// Print per-column statistics for the window without drawing charts
    Stats {
        #[command(flatten)]
        feed: FeedArgs,
    },

    /// List the columns a station feed provides
    Columns {
        #[command(flatten)]
        feed: FeedArgs,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_plot() {
        let cli = Cli::try_parse_from([
            "buoy-charts",
            "plot",
            "-s",
            "46089",
            "--hours",
            "24",
            "--columns",
            "hPa,degC",
            "-q",
        ])
        .unwrap();

        assert!(cli.quiet);
        match cli.command {
            Commands::Plot { feed, columns, .. } => {
                assert_eq!(feed.station.as_deref(), Some("46089"));
                assert_eq!(feed.hours, Some(24));
                assert_eq!(columns, vec!["hPa".to_string(), "degC".to_string()]);
            }
            _ => panic!("expected plot"),
        }
    }

    #[test]
    fn test_feed_args_override_settings() {
        let mut settings = Settings::default();
        let feed = FeedArgs {
            station: Some("51001".to_string()),
            hours: None,
            input: None,
        };
        feed.apply(&mut settings);

        assert_eq!(settings.station_id, "51001");
        assert_eq!(settings.window_hours, 12);
    }
}
