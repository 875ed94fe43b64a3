pub mod feed_fetcher;
pub mod feed_parser;

pub use feed_fetcher::{FeedSource, FileFeedSource, NdbcFetcher};
pub use feed_parser::{FeedParser, ParsedFeed};
