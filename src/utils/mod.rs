pub mod constants;
pub mod filename;
pub mod progress;

pub use constants::*;
pub use filename::{chart_filename, sanitize_column};
pub use progress::ProgressReporter;
