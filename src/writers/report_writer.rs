use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::error::Result;
use crate::models::RunReport;

pub struct ReportWriter {
    pretty: bool,
}

impl ReportWriter {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Write the run report as JSON, creating parent directories as needed.
    pub fn write_json(&self, report: &RunReport, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let writer = BufWriter::new(File::create(path)?);
        if self.pretty {
            serde_json::to_writer_pretty(writer, report)?;
        } else {
            serde_json::to_writer(writer, report)?;
        }
        Ok(())
    }
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    #[test]
    fn test_write_json() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("reports").join("run.json");
        let now = Utc::now();
        let report = RunReport {
            station_id: "46029".to_string(),
            source: "file".to_string(),
            generated_at: now,
            window_start: now,
            window_end: now,
            total_records: 0,
            window_records: 0,
            skipped_lines: vec![],
            fetch_error: Some("HTTP 404".to_string()),
            columns: vec![],
        };

        ReportWriter::new().write_json(&report, &path)?;

        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
        assert_eq!(value["station_id"], "46029");
        assert_eq!(value["fetch_error"], "HTTP 404");
        Ok(())
    }
}
