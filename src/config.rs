use std::env;
use std::str::FromStr;

pub const DEFAULT_API_URL: &str = "https://api.wavespeed.ai/api/v3/wavespeed-ai/any-llm";
pub const DEFAULT_MODEL: &str = "anthropic/claude-3.7-sonnet";

/// Tickers analysed by `--all` when `TECH_STOCKS` is not set
pub const DEFAULT_TECH_STOCKS: &[&str] = &["AAPL", "MSFT", "GOOGL", "AMZN", "NVDA", "META", "TSLA"];

/// Configuration errors are fatal: nothing gets constructed without a valid config
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),

    #[error("{0} environment variable is empty")]
    Empty(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime settings for the sentiment pipeline
#[derive(Debug, Clone)]
pub struct SentimentConfig {
    /// Bearer token for the scoring backend
    pub api_key: String,
    /// Scoring endpoint
    pub api_url: String,
    /// Model identifier sent with every request
    pub model: String,
    /// Upper bound on scoring calls in flight per batch
    pub max_workers: usize,
    /// Request timeout in seconds
    pub timeout: u64,
    /// How far back the article source looks, reported alongside each result
    pub lookback_days: u32,
    /// Tickers used by multi-stock analysis
    pub tickers: Vec<String>,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_workers: 5,
            timeout: 60,
            lookback_days: 7,
            tickers: DEFAULT_TECH_STOCKS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SentimentConfig {
    /// Load settings from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load settings through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_key = lookup("WAVESPEED_API_KEY").ok_or(ConfigError::Missing("WAVESPEED_API_KEY"))?;
        if api_key.trim().is_empty() {
            return Err(ConfigError::Empty("WAVESPEED_API_KEY"));
        }

        let tickers = match lookup("TECH_STOCKS") {
            Some(list) => parse_tickers(&list),
            None => defaults.tickers,
        };

        Ok(Self {
            api_key: api_key.trim().to_string(),
            api_url: lookup("WAVESPEED_API_URL").unwrap_or(defaults.api_url),
            model: lookup("LLM_MODEL").unwrap_or(defaults.model),
            max_workers: parse_var(&lookup, "MAX_CONCURRENT_LLM_CALLS", defaults.max_workers)?,
            timeout: parse_var(&lookup, "LLM_TIMEOUT_SECS", defaults.timeout)?,
            lookback_days: parse_var(&lookup, "NEWS_LOOKBACK_DAYS", defaults.lookback_days)?,
            tickers,
        })
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

/// Split a comma separated ticker list, upper-casing and dropping blanks
pub fn parse_tickers(list: &str) -> Vec<String> {
    list.split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}
