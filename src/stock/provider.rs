use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Error types for article source operations
#[derive(Debug, thiserror::Error)]
pub enum NewsError {
    /// Ticker was blank after trimming
    #[error("Invalid symbol: {0}")]
    InvalidTicker(String),

    /// Article file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Article file is not a JSON list of articles
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Stock news article as handed over by an article source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Article {
    /// Stock symbol the article was fetched for (e.g., "AAPL")
    pub ticker: String,
    /// Article title
    pub title: String,
    /// Article summary or content
    pub description: String,
    /// Publication timestamp as reported by the source
    pub published_utc: String,
    /// Publisher name
    pub source: String,
}

/// Source of raw articles for a ticker
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Get the source name
    fn name(&self) -> &str;

    /// Fetch up to `limit` recent articles for a stock, newest first when the source knows the order
    async fn get_news(&self, ticker: &str, limit: usize) -> Result<Vec<Article>, NewsError>;
}

/// Article source backed by a JSON file holding a list of articles
pub struct JsonFileNewsSource {
    articles: Vec<Article>,
}

impl JsonFileNewsSource {
    pub fn new(articles: Vec<Article>) -> Self {
        Self { articles }
    }

    pub fn from_json(json: &str) -> Result<Self, NewsError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, NewsError> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| NewsError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let source = Self::from_json(&json)?;
        log::info!("📂 Loaded {} articles from {}", source.articles.len(), path.display());
        Ok(source)
    }
}

#[async_trait]
impl NewsSource for JsonFileNewsSource {
    fn name(&self) -> &str {
        "JSON file"
    }

    async fn get_news(&self, ticker: &str, limit: usize) -> Result<Vec<Article>, NewsError> {
        Ok(self
            .articles
            .iter()
            .filter(|a| a.ticker.eq_ignore_ascii_case(ticker))
            .take(limit)
            .cloned()
            .collect())
    }
}
