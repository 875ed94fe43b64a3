use std::path::Path;
use std::time::Duration;

use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use validator::Validate;

use crate::analyzers::SeriesAnalyzer;
use crate::cli::args::{Cli, Commands, FeedArgs};
use crate::config::Settings;
use crate::error::{ProcessingError, Result};
use crate::models::{ColumnOutcome, RunReport};
use crate::processors::{StationProcessor, TimeWindow, WindowFilter};
use crate::readers::{FeedParser, FeedSource, FileFeedSource, NdbcFetcher, ParsedFeed};
use crate::utils::constants::column_label;
use crate::utils::progress::ProgressReporter;
use crate::writers::{ReportWriter, SvgChartWriter};

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose);

    let mut settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Plot {
            feed,
            output_dir,
            columns,
            max_workers,
            report,
        } => {
            feed.apply(&mut settings);
            if let Some(dir) = output_dir {
                settings.output_dir = dir;
            }
            if let Some(workers) = max_workers {
                settings.max_workers = workers;
            }
            settings.validate()?;
            check_output_dir(&settings.output_dir)?;
            debug!("Settings: {:?}", settings);

            let source = feed_source(&feed, &settings)?;
            let renderer = SvgChartWriter::new(&settings.output_dir)
                .with_size(settings.chart_width, settings.chart_height);
            let processor = StationProcessor::new(settings.max_workers)
                .with_window_hours(settings.window_hours)
                .with_columns(columns);

            let progress = ProgressReporter::columns(cli.quiet);
            let run_report = processor
                .process_station(source.as_ref(), &renderer, &settings.station_id, Some(&progress))
                .await?;
            progress.finish_and_clear();

            print_plot_report(&run_report, cli.verbose);

            if let Some(path) = report {
                ReportWriter::new().write_json(&run_report, &path)?;
                println!("Report written to {}", path.display());
            }
        }

        Commands::Stats { feed } => {
            feed.apply(&mut settings);
            settings.validate()?;

            let source = feed_source(&feed, &settings)?;
            let Some(parsed) = load_feed(source.as_ref(), &settings.station_id, cli.quiet).await?
            else {
                return Ok(());
            };

            let window = WindowFilter::new(TimeWindow::trailing_hours(settings.window_hours))
                .filter(&parsed.observations);

            println!(
                "Station {} - {} of {} records in the last {} hours ({} lines skipped)",
                settings.station_id,
                window.len(),
                parsed.observations.len(),
                settings.window_hours,
                parsed.skipped.len()
            );
            println!();

            for stats in SeriesAnalyzer::new().analyze(&window) {
                println!("{}", stats.summary_line());
            }
        }

        Commands::Columns { feed } => {
            feed.apply(&mut settings);
            settings.validate()?;

            let source = feed_source(&feed, &settings)?;
            let Some(parsed) = load_feed(source.as_ref(), &settings.station_id, cli.quiet).await?
            else {
                return Ok(());
            };

            println!(
                "Station {} provides {} columns:",
                settings.station_id,
                parsed.columns().len()
            );
            let observations = &parsed.observations;
            for (index, column) in observations.columns().iter().enumerate() {
                let shadowed = observations.column_index(column) != Some(index);
                println!(
                    "  {:>2}. {:<6} {}{}",
                    index + 1,
                    column,
                    column_label(column),
                    if shadowed { " (shadowed by a later column)" } else { "" }
                );
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A subscriber may already be installed when running inside tests
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

fn feed_source(feed: &FeedArgs, settings: &Settings) -> Result<Box<dyn FeedSource>> {
    match feed.input {
        Some(ref path) => Ok(Box::new(FileFeedSource::new(path))),
        None => Ok(Box::new(NdbcFetcher::new(
            settings.base_url.clone(),
            Duration::from_secs(settings.timeout_secs),
        )?)),
    }
}

/// Fetch and parse a feed for the read-only subcommands. A fetch failure is
/// reported and yields `None`.
async fn load_feed(
    source: &dyn FeedSource,
    station_id: &str,
    quiet: bool,
) -> Result<Option<ParsedFeed>> {
    let spinner = ProgressReporter::spinner(
        &format!("Fetching {}...", source.describe(station_id)),
        quiet,
    );
    let fetched = source.fetch(station_id).await;
    spinner.finish_and_clear();

    match fetched {
        Ok(raw) => Ok(Some(FeedParser::new().parse(&raw)?)),
        Err(e) => {
            eprintln!("Error fetching buoy data for station {}: {}", station_id, e);
            println!("No data available.");
            Ok(None)
        }
    }
}

fn print_plot_report(report: &RunReport, verbose: bool) {
    if let Some(ref error) = report.fetch_error {
        eprintln!("Error fetching buoy data for station {}: {}", report.station_id, error);
    }
    if report.is_empty() {
        println!("No data available to plot.");
        return;
    }

    if verbose {
        println!("{}", report.summary());
    }

    for column in report.rendered() {
        if let ColumnOutcome::Rendered { ref path, .. } = column.outcome {
            println!("Plot saved for column: {} ({})", column.column, path.display());
        }
    }

    let no_data = report.no_data_columns();
    if !no_data.is_empty() {
        println!();
        println!("The following columns were not plotted due to no data being available:");
        for column in no_data {
            println!("- {}", column);
        }
    }
}

fn check_output_dir(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(ProcessingError::Config(format!(
            "output path {} is not a directory",
            dir.display()
        )));
    }
    Ok(())
}
