use std::path::{Path, PathBuf};

use crate::utils::constants::CHART_FILE_PREFIX;

/// Make a column name safe to embed in a file name (`m/s` -> `m_s`).
pub fn sanitize_column(column: &str) -> String {
    column
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

/// Chart path with format: {output_dir}/buoy_data_{station}_{column}.{extension}
pub fn chart_filename(output_dir: &Path, station_id: &str, column: &str, extension: &str) -> PathBuf {
    let filename = format!(
        "{}_{}_{}.{}",
        CHART_FILE_PREFIX,
        sanitize_column(station_id),
        sanitize_column(column),
        extension
    );
    output_dir.join(filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_column() {
        assert_eq!(sanitize_column("m/s"), "m_s");
        assert_eq!(sanitize_column("degT"), "degT");
        assert_eq!(sanitize_column("#yr"), "_yr");
    }

    #[test]
    fn test_chart_filename() {
        let path = chart_filename(Path::new("output"), "46029", "m/s", "svg");
        let path_str = path.to_string_lossy();

        assert!(path_str.starts_with("output"));
        assert!(path_str.ends_with("buoy_data_46029_m_s.svg"));
        assert_eq!(path.parent(), Some(Path::new("output")));
    }
}
