use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use super::provider::{NewsError, NewsSource};
use crate::ai::AiBackend;
use crate::config::SentimentConfig;
use crate::sentiment::{Scorer, Sentiment, Verdict, aggregate, analyze_batch};

/// Full sentiment analysis for one stock
#[derive(Debug, Clone, Serialize)]
pub struct StockAnalysis {
    pub ticker: String,
    pub analysis_time: DateTime<Utc>,
    pub lookback_days: u32,
    #[serde(flatten)]
    pub verdict: Verdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// One line of the multi-stock ranking
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub ticker: String,
    pub score: f64,
    pub sentiment: Sentiment,
    pub news_count: usize,
    pub avg_confidence: f64,
    pub bullish: usize,
    pub bearish: usize,
    pub neutral: usize,
}

impl From<&StockAnalysis> for SummaryRow {
    fn from(analysis: &StockAnalysis) -> Self {
        let verdict = &analysis.verdict;
        Self {
            ticker: analysis.ticker.clone(),
            score: verdict.final_score,
            sentiment: verdict.sentiment,
            news_count: verdict.news_count,
            avg_confidence: verdict.avg_confidence,
            bullish: verdict.bullish_count,
            bearish: verdict.bearish_count,
            neutral: verdict.neutral_count,
        }
    }
}

/// Ties an article source to the scorer for per-stock analysis
pub struct SentimentService {
    news: Box<dyn NewsSource>,
    scorer: Arc<Scorer>,
    max_workers: usize,
    lookback_days: u32,
}

impl SentimentService {
    pub fn new(config: &SentimentConfig, news: Box<dyn NewsSource>, backend: Arc<dyn AiBackend>) -> Self {
        log::info!(
            "🔧 Sentiment service ready: news from {}, scoring with {} ({} workers)",
            news.name(),
            backend.name(),
            config.max_workers
        );

        Self {
            news,
            scorer: Arc::new(Scorer::new(backend)),
            max_workers: config.max_workers,
            lookback_days: config.lookback_days,
        }
    }

    pub fn lookback_days(&self) -> u32 {
        self.lookback_days
    }

    /// Fetch news for one stock, score every article and reduce to a verdict
    pub async fn analyze_stock(&self, ticker: &str, news_limit: usize) -> Result<StockAnalysis, NewsError> {
        if ticker.trim().is_empty() {
            return Err(NewsError::InvalidTicker("Symbol cannot be empty".to_string()));
        }

        let ticker = ticker.trim().to_uppercase();
        log::info!("📰 Fetching news for {ticker} (last {} days, limit {news_limit})", self.lookback_days);

        let articles = self.news.get_news(&ticker, news_limit).await?;

        if articles.is_empty() {
            log::warn!("⚠️ No news found for {ticker}");
            return Ok(StockAnalysis {
                ticker,
                analysis_time: Utc::now(),
                lookback_days: self.lookback_days,
                verdict: aggregate(&[]),
                message: Some("No news found".to_string()),
            });
        }

        log::info!("  Found {} articles for {ticker}", articles.len());

        let judgments = analyze_batch(Arc::clone(&self.scorer), &articles, self.max_workers).await;
        let verdict = aggregate(&judgments);

        log::info!(
            "📊 {ticker}: {:.2} ({}) from {} articles",
            verdict.final_score,
            verdict.sentiment,
            verdict.news_count
        );

        Ok(StockAnalysis {
            ticker,
            analysis_time: Utc::now(),
            lookback_days: self.lookback_days,
            verdict,
            message: None,
        })
    }

    /// Analyze stocks one after another; a stock whose news can't be fetched is skipped
    pub async fn analyze_multiple(&self, tickers: &[String], news_limit: usize) -> Vec<StockAnalysis> {
        let mut analyses = Vec::with_capacity(tickers.len());
        for ticker in tickers {
            match self.analyze_stock(ticker, news_limit).await {
                Ok(analysis) => analyses.push(analysis),
                Err(e) => log::error!("❌ Failed to analyze {ticker}: {e}"),
            }
        }
        analyses
    }
}

/// Rank analyses by final score, highest first
pub fn summarize(analyses: &[StockAnalysis]) -> Vec<SummaryRow> {
    let mut rows: Vec<SummaryRow> = analyses.iter().map(SummaryRow::from).collect();
    rows.sort_by(|a, b| b.score.total_cmp(&a.score));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::BackendError;
    use crate::stock::{Article, JsonFileNewsSource};
    use async_trait::async_trait;

    /// Bullish for titles mentioning "record", bearish otherwise
    struct KeywordBackend;

    #[async_trait]
    impl AiBackend for KeywordBackend {
        async fn complete(&self, prompt: &str) -> Result<String, BackendError> {
            let reply = if prompt.contains("Record") {
                r#"{"sentiment": "bullish", "score": 85, "confidence": 90, "reason": "record"}"#
            } else {
                r#"{"sentiment": "bearish", "score": 25, "confidence": 70, "reason": "delays"}"#
            };
            Ok(reply.to_string())
        }

        fn name(&self) -> &'static str {
            "keyword"
        }
    }

    struct BrokenSource;

    #[async_trait]
    impl NewsSource for BrokenSource {
        fn name(&self) -> &str {
            "broken"
        }

        async fn get_news(&self, _ticker: &str, _limit: usize) -> Result<Vec<Article>, NewsError> {
            Err(NewsError::Parse(serde_json::from_str::<Vec<Article>>("nope").unwrap_err()))
        }
    }

    fn article(ticker: &str, title: &str) -> Article {
        Article {
            ticker: ticker.to_string(),
            title: title.to_string(),
            ..Default::default()
        }
    }

    fn service() -> SentimentService {
        let news = JsonFileNewsSource::new(vec![
            article("AAPL", "Apple Reports Record iPhone Sales"),
            article("AAPL", "Apple Faces Supply Chain Challenges"),
            article("NVDA", "Nvidia Posts Record Revenue"),
            article("TSLA", "Tesla Recalls Vehicles"),
        ]);
        let config = SentimentConfig {
            api_key: "test".to_string(),
            max_workers: 2,
            ..Default::default()
        };
        SentimentService::new(&config, Box::new(news), Arc::new(KeywordBackend))
    }

    #[tokio::test]
    async fn test_analyze_stock() {
        let analysis = service().analyze_stock(" aapl ", 20).await.unwrap();

        assert_eq!(analysis.ticker, "AAPL");
        assert_eq!(analysis.lookback_days, 7);
        assert!(analysis.message.is_none());

        let verdict = &analysis.verdict;
        assert_eq!(verdict.news_count, 2);
        assert_eq!(verdict.bullish_count, 1);
        assert_eq!(verdict.bearish_count, 1);
        // (85 * 0.9 + 25 * 0.7) / 1.6
        assert_eq!(verdict.final_score, 58.75);
        assert_eq!(verdict.sentiment, Sentiment::Neutral);
        assert_eq!(verdict.details[0].title, "Apple Reports Record iPhone Sales");
    }

    #[tokio::test]
    async fn test_analyze_stock_without_news() {
        let analysis = service().analyze_stock("MSFT", 20).await.unwrap();
        assert_eq!(analysis.message.as_deref(), Some("No news found"));
        assert_eq!(analysis.verdict, Verdict::default());
    }

    #[tokio::test]
    async fn test_analyze_stock_rejects_blank_ticker() {
        let result = service().analyze_stock("  ", 20).await;
        assert!(matches!(result, Err(NewsError::InvalidTicker(_))));
    }

    #[tokio::test]
    async fn test_analyze_multiple_and_summarize() {
        let tickers: Vec<String> = ["TSLA", "AAPL", "NVDA"].iter().map(|s| s.to_string()).collect();
        let analyses = service().analyze_multiple(&tickers, 20).await;
        assert_eq!(analyses.len(), 3);

        let rows = summarize(&analyses);
        let order: Vec<&str> = rows.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(order, vec!["NVDA", "AAPL", "TSLA"]);
        assert_eq!(rows[0].sentiment, Sentiment::Bullish);
        assert_eq!(rows[2].sentiment, Sentiment::Bearish);
    }

    #[tokio::test]
    async fn test_analyze_multiple_skips_source_failures() {
        let config = SentimentConfig::default();
        let service = SentimentService::new(&config, Box::new(BrokenSource), Arc::new(KeywordBackend));
        let analyses = service.analyze_multiple(&["AAPL".to_string()], 5).await;
        assert!(analyses.is_empty());
    }

    #[tokio::test]
    async fn test_analysis_json_is_flat() {
        let analysis = service().analyze_stock("NVDA", 5).await.unwrap();
        let value = serde_json::to_value(&analysis).unwrap();
        assert_eq!(value["ticker"], "NVDA");
        assert_eq!(value["sentiment"], "bullish");
        assert_eq!(value["news_count"], 1);
        assert!(value["details"].is_array());
        assert!(value.get("message").is_none());
    }
}
