use clap::{ArgAction, Parser};
use tracing::Level;

use crate::config::{self, Config, DecodePolicy, QueryEncoding};
use crate::error::LookupError;

/// Search for images and print the results as an XML document.
///
/// Errors are reported inside the document and the exit status is 0 unless
/// `--exit-codes` is given.
#[derive(Parser, Debug, Default)]
#[command(name = "imgsearch", version)]
#[command(about = "Search for images and print the results as XML", long_about = None)]
pub struct Cli {
    /// Text to search images for, taken as given even if it starts with `-`
    #[arg(allow_hyphen_values = true)]
    pub query: Option<String>,

    /// Anything after the query is accepted and ignored
    #[arg(hide = true, allow_hyphen_values = true)]
    pub ignored: Vec<String>,

    /// Search endpoint [env: IMGSEARCH_ENDPOINT]
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Request timeout in seconds, 0 waits forever [env: IMGSEARCH_TIMEOUT_SECS]
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Fail the whole lookup on the first malformed result [env: IMGSEARCH_STRICT]
    #[arg(long)]
    pub strict: bool,

    /// Put the query into the url without encoding it [env: IMGSEARCH_RAW_QUERY]
    #[arg(long)]
    pub raw_query: bool,

    /// Keep non-ASCII characters in titles, descriptions and urls
    #[arg(long)]
    pub unicode: bool,

    /// Class name of the metadata elements [env: IMGSEARCH_MARKER]
    #[arg(long)]
    pub marker: Option<String>,

    /// Exit with a non-zero status when the document reports an error
    #[arg(long)]
    pub exit_codes: bool,

    /// More logging on stderr, repeat for more
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn query(&self) -> Result<&str, LookupError> {
        self.query.as_deref().ok_or(LookupError::Usage)
    }

    /// Layer the flags over a config loaded from the environment.
    pub fn apply(&self, mut config: Config) -> Result<Config, LookupError> {
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = config::parse_endpoint(endpoint)?;
        }
        if let Some(secs) = self.timeout {
            config.timeout = config::timeout_from_secs(secs);
        }
        if self.strict {
            config.decode_policy = DecodePolicy::Strict;
        }
        if self.raw_query {
            config.query_encoding = QueryEncoding::Raw;
        }
        if self.unicode {
            config.ascii_only = false;
        }
        if let Some(marker) = &self.marker {
            config.marker = config::validate_marker(marker)?;
        }
        config.log_level = self.log_level(config.log_level);
        Ok(config)
    }

    pub fn log_level(&self, base: Level) -> Level {
        let mut level = base;
        for _ in 0..self.verbose {
            level = if level == Level::ERROR {
                Level::WARN
            } else if level == Level::WARN {
                Level::INFO
            } else if level == Level::INFO {
                Level::DEBUG
            } else {
                Level::TRACE
            };
        }
        level
    }
}
