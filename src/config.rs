use dotenvy::dotenv;
use reqwest::Url;
use std::env;
use std::time::Duration;
use tracing::Level;

use crate::error::LookupError;

pub const DEFAULT_ENDPOINT: &str = "https://www.google.com/search";
pub const DEFAULT_MARKER: &str = "rg_meta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// What to do with a metadata node whose payload does not decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodePolicy {
    /// Log and skip the node.
    #[default]
    Lenient,
    /// Abort the whole lookup.
    Strict,
}

/// How the query text is placed into the search URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryEncoding {
    #[default]
    Encoded,
    /// Splice the text in as given, the way older callers expect.
    Raw,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: Url,
    pub timeout: Option<Duration>,
    pub decode_policy: DecodePolicy,
    pub query_encoding: QueryEncoding,
    pub ascii_only: bool,
    pub marker: String,
    pub log_level: Level,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            endpoint: Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid url"),
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            decode_policy: DecodePolicy::default(),
            query_encoding: QueryEncoding::default(),
            ascii_only: true,
            marker: DEFAULT_MARKER.to_string(),
            log_level: Level::WARN,
        }
    }
}

impl Config {
    /// Load `.env` if present, then read `IMGSEARCH_*` variables.
    pub fn from_env() -> Result<Config, LookupError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Unset keys keep their
    /// defaults; set keys must parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, LookupError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(endpoint) = lookup("IMGSEARCH_ENDPOINT") {
            config.endpoint = parse_endpoint(&endpoint)?;
        }
        if let Some(secs) = lookup("IMGSEARCH_TIMEOUT_SECS") {
            let secs = secs.trim().parse::<u64>().map_err(|e| {
                LookupError::Config(format!("IMGSEARCH_TIMEOUT_SECS={secs:?}: {e}"))
            })?;
            config.timeout = timeout_from_secs(secs);
        }
        if let Some(strict) = lookup("IMGSEARCH_STRICT") {
            if parse_bool("IMGSEARCH_STRICT", &strict)? {
                config.decode_policy = DecodePolicy::Strict;
            }
        }
        if let Some(raw) = lookup("IMGSEARCH_RAW_QUERY") {
            if parse_bool("IMGSEARCH_RAW_QUERY", &raw)? {
                config.query_encoding = QueryEncoding::Raw;
            }
        }
        if let Some(ascii) = lookup("IMGSEARCH_ASCII_ONLY") {
            config.ascii_only = parse_bool("IMGSEARCH_ASCII_ONLY", &ascii)?;
        }
        if let Some(marker) = lookup("IMGSEARCH_MARKER") {
            config.marker = validate_marker(&marker)?;
        }
        if let Some(level) = lookup("IMGSEARCH_LOG") {
            config.log_level = level
                .trim()
                .parse::<Level>()
                .map_err(|e| LookupError::Config(format!("IMGSEARCH_LOG={level:?}: {e}")))?;
        }

        Ok(config)
    }
}

pub fn parse_endpoint(value: &str) -> Result<Url, LookupError> {
    let url = Url::parse(value.trim())
        .map_err(|e| LookupError::Config(format!("endpoint {value:?}: {e}")))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(LookupError::Config(format!(
            "endpoint {value:?}: scheme must be http or https"
        )));
    }
    Ok(url)
}

pub fn validate_marker(value: &str) -> Result<String, LookupError> {
    let marker = value.trim();
    let valid = !marker.is_empty()
        && !marker.starts_with(|c: char| c.is_ascii_digit())
        && marker
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid {
        return Err(LookupError::Config(format!(
            "marker {value:?} is not a usable class name"
        )));
    }
    Ok(marker.to_string())
}

pub fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, LookupError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(LookupError::Config(format!("{key}={value:?} is not a boolean"))),
    }
}
