pub mod series_extractor;
pub mod station_processor;
pub mod window_filter;

pub use series_extractor::SeriesExtractor;
pub use station_processor::StationProcessor;
pub use window_filter::{TimeWindow, WindowFilter};
