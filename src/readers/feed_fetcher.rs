use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::error::FetchError;
use crate::utils::constants::NDBC_REALTIME_BASE_URL;

/// Anything that can hand back the raw feed text for a station.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self, station_id: &str) -> Result<String, FetchError>;

    /// Where the feed comes from, for logs and reports.
    fn describe(&self, station_id: &str) -> String;
}

/// Fetches `{base_url}/{station_id}.txt` from the NDBC realtime2 service.
#[derive(Clone)]
pub struct NdbcFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl NdbcFetcher {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Client for the public NDBC service.
    pub fn ndbc(timeout: Duration) -> Result<Self, FetchError> {
        Self::new(NDBC_REALTIME_BASE_URL, timeout)
    }

    pub fn feed_url(&self, station_id: &str) -> String {
        format!("{}/{}.txt", self.base_url.trim_end_matches('/'), station_id)
    }
}

#[async_trait]
impl FeedSource for NdbcFetcher {
    #[instrument(skip(self), fields(url = %self.feed_url(station_id)))]
    async fn fetch(&self, station_id: &str) -> Result<String, FetchError> {
        let url = self.feed_url(station_id);

        debug!("Sending HTTP request for station feed");
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        debug!("Received HTTP response with status: {}", status);

        if !status.is_success() {
            return Err(FetchError::Status {
                station_id: station_id.to_string(),
                status,
            });
        }

        let text = response.text().await?;
        debug!("Retrieved feed, size: {} bytes", text.len());
        Ok(text)
    }

    fn describe(&self, station_id: &str) -> String {
        self.feed_url(station_id)
    }
}

/// Reads a previously saved feed from disk; the station id is only used for labelling.
#[derive(Debug, Clone)]
pub struct FileFeedSource {
    path: PathBuf,
}

impl FileFeedSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FeedSource for FileFeedSource {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn fetch(&self, _station_id: &str) -> Result<String, FetchError> {
        let text = tokio::fs::read_to_string(&self.path).await?;
        debug!("Read feed file, size: {} bytes", text.len());
        Ok(text)
    }

    fn describe(&self, _station_id: &str) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::constants::DEFAULT_FETCH_TIMEOUT_SECS;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_feed_url() {
        let fetcher = NdbcFetcher::new("https://example.test/realtime2/", Duration::from_secs(5))
            .unwrap();
        assert_eq!(
            fetcher.feed_url("46029"),
            "https://example.test/realtime2/46029.txt"
        );
    }

    #[test]
    fn test_ndbc_fetcher_targets_realtime2() {
        let fetcher =
            NdbcFetcher::ndbc(Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS)).unwrap();
        assert_eq!(
            fetcher.describe("46089"),
            "https://www.ndbc.noaa.gov/data/realtime2/46089.txt"
        );
    }

    #[tokio::test]
    async fn test_file_source_reads_feed() -> Result<(), FetchError> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "header")?;
        writeln!(file, "YY MM DD hh mm degT")?;
        writeln!(file, "2024 06 01 00 00 120")?;

        let source = FileFeedSource::new(file.path());
        let text = source.fetch("46029").await?;

        assert_eq!(text.lines().count(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_file_source_missing_file() {
        let source = FileFeedSource::new("/definitely/not/here/46029.txt");
        let result = source.fetch("46029").await;
        assert!(matches!(result, Err(FetchError::Io(_))));
    }
}
