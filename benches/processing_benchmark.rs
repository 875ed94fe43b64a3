use buoy_charts::processors::{SeriesExtractor, TimeWindow, WindowFilter};
use buoy_charts::readers::FeedParser;
use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const HEADER: &str = "#YY  MM DD hh mm WDIR WSPD GST  WVHT   DPD   APD MWD   PRES  ATMP  WTMP  DEWP  VIS PTDY  TIDE\n\
#yr  mo dy hr mn degT m/s  m/s     m   sec   sec degT   hPa  degC  degC  degC  nmi  hPa    ft\n";

// Ten-minute rows, newest first, with a sprinkling of missing values
fn create_test_feed(rows: usize) -> String {
    let newest = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let mut feed = String::from(HEADER);

    for row in 0..rows {
        let ts = newest - Duration::minutes(10 * row as i64);
        let wvht = if row % 3 == 0 {
            format!("{:.1}", 1.5 + (row % 7) as f64 * 0.1)
        } else {
            "MM".to_string()
        };
        feed.push_str(&format!(
            "{} {:>3} {:>4} {:>4}  {:>4} {} MM MM {:>6.1} {:>5.1} {:>5.1} MM MM MM MM\n",
            ts.format("%Y %m %d %H %M"),
            (row * 7) % 360,
            5.0 + (row % 5) as f64,
            7.0 + (row % 5) as f64,
            wvht,
            8,
            1013.0 + (row % 11) as f64 * 0.2,
            12.0 + (row % 4) as f64 * 0.3,
            13.0 + (row % 6) as f64 * 0.1,
        ));
    }

    feed
}

fn benchmark_feed_parser(c: &mut Criterion) {
    let feed = create_test_feed(6500);

    c.bench_function("feed_parser_45_days", |b| {
        b.iter(|| {
            let parsed = FeedParser::new().parse(black_box(&feed));
            black_box(parsed.map(|p| p.observations.len()).unwrap_or(0))
        })
    });
}

fn benchmark_window_filter(c: &mut Criterion) {
    let parsed = match FeedParser::new().parse(&create_test_feed(6500)) {
        Ok(parsed) => parsed,
        Err(_) => return,
    };
    let reference = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let window = TimeWindow::new(reference, Duration::hours(12));

    c.bench_function("window_filter_12h", |b| {
        b.iter(|| {
            let filtered = WindowFilter::new(window).filter(black_box(&parsed.observations));
            black_box(filtered.len())
        })
    });
}

fn benchmark_series_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("series_extraction_by_rows");

    for &rows in &[72, 500, 2000, 6500] {
        group.bench_with_input(BenchmarkId::new("rows", rows), &rows, |b, &rows| {
            let parsed = match FeedParser::new().parse(&create_test_feed(rows)) {
                Ok(parsed) => parsed,
                Err(_) => return,
            };
            let columns: Vec<String> = parsed
                .observations
                .distinct_columns()
                .into_iter()
                .map(str::to_string)
                .collect();

            b.iter(|| {
                let extractor = SeriesExtractor::new();
                let rendered = columns
                    .iter()
                    .filter(|c| extractor.extract_with_median(&parsed.observations, c).is_ok())
                    .count();
                black_box(rendered)
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_feed_parser,
    benchmark_window_filter,
    benchmark_series_extraction
);
criterion_main!(benches);
