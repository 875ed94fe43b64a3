pub mod observation;
pub mod report;
pub mod series;

pub use observation::{Observation, ObservationSet, Reading, SkippedLine};
pub use report::{ColumnOutcome, ColumnReport, NoDataCause, RunReport};
pub use series::{median, Series};
