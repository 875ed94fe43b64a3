use crate::error::{LineError, ProcessingError, Result};
use crate::models::{Observation, ObservationSet, Reading, SkippedLine};
use crate::utils::constants::{
    FIRST_DATA_LINE_INDEX, HEADER_LINE_INDEX, MIN_FEED_LINES, TIMESTAMP_FIELDS,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::{debug, instrument, warn};

/// Result of parsing one raw feed.
#[derive(Debug, Clone)]
pub struct ParsedFeed {
    pub observations: ObservationSet,
    pub skipped: Vec<SkippedLine>,
    /// Candidate data lines seen (blank and comment lines excluded).
    pub data_lines: usize,
}

impl ParsedFeed {
    pub fn columns(&self) -> &[String] {
        self.observations.columns()
    }
}

/// Parses the NDBC realtime text layout: two header lines, then whitespace
/// separated rows of `YY MM DD hh mm` followed by one field per data column.
pub struct FeedParser;

impl FeedParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a whole feed. Only structural problems fail; bad data lines are
    /// skipped and reported in [`ParsedFeed::skipped`].
    #[instrument(skip(self, raw), fields(size = raw.len()))]
    pub fn parse(&self, raw: &str) -> Result<ParsedFeed> {
        let lines: Vec<&str> = raw.lines().collect();
        if lines.len() < MIN_FEED_LINES {
            return Err(ProcessingError::EmptyFeed { lines: lines.len() });
        }

        let columns: Vec<String> = lines[HEADER_LINE_INDEX]
            .split_whitespace()
            .skip(TIMESTAMP_FIELDS)
            .map(str::to_string)
            .collect();
        debug!("Header columns: {:?}", columns);

        let mut records = Vec::new();
        let mut skipped = Vec::new();
        let mut data_lines = 0;

        for (index, line) in lines.iter().enumerate().skip(FIRST_DATA_LINE_INDEX) {
            let trimmed = line.trim();

            // Skip empty lines and repeated header lines
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            data_lines += 1;

            match self.parse_data_line(trimmed, &columns) {
                Ok(record) => records.push(record),
                Err(reason) => {
                    let line_number = index + 1;
                    if reason.is_ragged() {
                        debug!("Line {} skipped: {}", line_number, reason);
                    } else {
                        warn!("Line {} skipped: {} ({})", line_number, reason, trimmed);
                    }
                    skipped.push(SkippedLine {
                        line_number,
                        reason,
                    });
                }
            }
        }

        if !skipped.is_empty() {
            warn!("Skipped {} unparseable lines out of {}", skipped.len(), data_lines);
        }
        debug!("Parsed {} observations from {} lines", records.len(), data_lines);

        Ok(ParsedFeed {
            observations: ObservationSet::new(columns, records),
            skipped,
            data_lines,
        })
    }

    /// Parse one data row against the header columns.
    fn parse_data_line(
        &self,
        line: &str,
        columns: &[String],
    ) -> std::result::Result<Observation, LineError> {
        let parts: Vec<&str> = line.split_whitespace().collect();

        if parts.len() <= TIMESTAMP_FIELDS {
            return Err(LineError::InsufficientFields { found: parts.len() });
        }

        let timestamp = self.parse_timestamp(&parts[..TIMESTAMP_FIELDS])?;

        let expected = TIMESTAMP_FIELDS + columns.len();
        if parts.len() < expected {
            return Err(LineError::TooFewFields {
                found: parts.len(),
                expected,
            });
        }

        let readings = columns
            .iter()
            .zip(&parts[TIMESTAMP_FIELDS..expected])
            .map(|(column, token)| {
                Reading::parse(token).ok_or_else(|| LineError::InvalidValue {
                    column: column.clone(),
                    value: token.to_string(),
                })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Observation::new(timestamp, readings))
    }

    /// Build a UTC timestamp from `year month day hour minute` tokens.
    fn parse_timestamp(&self, fields: &[&str]) -> std::result::Result<DateTime<Utc>, LineError> {
        let value = format!(
            "{}-{}-{} {}:{}:00",
            fields[0], fields[1], fields[2], fields[3], fields[4]
        );
        let naive = NaiveDateTime::parse_from_str(&value, "%Y-%m-%d %H:%M:%S")
            .map_err(|_| LineError::InvalidTimestamp { value: value.clone() })?;

        Ok(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
    }
}

impl Default for FeedParser {
    fn default() -> Self {
        Self::new()
    }
}
