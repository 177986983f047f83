use serde::{Deserialize, Serialize};
use std::fmt;

use crate::stock::Article;

pub const DEFAULT_REASON: &str = "Analysis failed, using default";

/// News sentiment classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Bullish,
    Neutral,
    Bearish,
}

impl Sentiment {
    /// Classify a 0-100 score: `>= 60` bullish, `<= 40` bearish
    pub fn from_score(score: f64) -> Self {
        if score >= 60.0 {
            Sentiment::Bullish
        } else if score <= 40.0 {
            Sentiment::Bearish
        } else {
            Sentiment::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Bullish => "bullish",
            Sentiment::Neutral => "neutral",
            Sentiment::Bearish => "bearish",
        }
    }

    /// Short marker used in article listings
    pub fn tag(&self) -> &'static str {
        match self {
            Sentiment::Bullish => "[+]",
            Sentiment::Neutral => "[=]",
            Sentiment::Bearish => "[-]",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sentiment judgment for one article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Judgment {
    pub sentiment: Sentiment,
    /// 0 (very bearish) to 100 (very bullish)
    pub score: f64,
    /// Self-reported certainty, 0 to 100
    pub confidence: f64,
    pub reason: String,
    pub title: String,
    pub source: String,
    pub published_utc: String,
}

impl Judgment {
    /// Neutral placeholder used whenever an article could not be scored
    pub fn fallback(article: &Article) -> Self {
        Self {
            sentiment: Sentiment::Neutral,
            score: 50.0,
            confidence: 0.0,
            reason: DEFAULT_REASON.to_string(),
            title: article.title.clone(),
            source: article.source.clone(),
            published_utc: article.published_utc.clone(),
        }
    }
}

/// Stock-level outcome reduced from a sequence of judgments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub final_score: f64,
    pub sentiment: Sentiment,
    pub news_count: usize,
    pub avg_confidence: f64,
    pub bullish_count: usize,
    pub neutral_count: usize,
    pub bearish_count: usize,
    pub details: Vec<Judgment>,
}

impl Default for Verdict {
    fn default() -> Self {
        Self {
            final_score: 50.0,
            sentiment: Sentiment::Neutral,
            news_count: 0,
            avg_confidence: 0.0,
            bullish_count: 0,
            neutral_count: 0,
            bearish_count: 0,
            details: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentiment_wire_format() {
        assert_eq!(serde_json::to_string(&Sentiment::Bullish).unwrap(), "\"bullish\"");
        let parsed: Sentiment = serde_json::from_str("\"bearish\"").unwrap();
        assert_eq!(parsed, Sentiment::Bearish);
        assert!(serde_json::from_str::<Sentiment>("\"positive\"").is_err());
    }

    #[test]
    fn test_from_score_boundaries() {
        assert_eq!(Sentiment::from_score(60.0), Sentiment::Bullish);
        assert_eq!(Sentiment::from_score(40.0), Sentiment::Bearish);
        assert_eq!(Sentiment::from_score(59.99), Sentiment::Neutral);
        assert_eq!(Sentiment::from_score(40.01), Sentiment::Neutral);
    }

    #[test]
    fn test_fallback_keeps_article_metadata() {
        let article = Article {
            ticker: "AAPL".to_string(),
            title: "Apple Reports Record iPhone Sales".to_string(),
            description: "ignored".to_string(),
            published_utc: "2026-02-05T10:00:00Z".to_string(),
            source: "Reuters".to_string(),
        };

        let judgment = Judgment::fallback(&article);
        assert_eq!(judgment.sentiment, Sentiment::Neutral);
        assert_eq!(judgment.score, 50.0);
        assert_eq!(judgment.confidence, 0.0);
        assert_eq!(judgment.reason, DEFAULT_REASON);
        assert_eq!(judgment.title, article.title);
        assert_eq!(judgment.source, "Reuters");
        assert_eq!(judgment.published_utc, "2026-02-05T10:00:00Z");
    }

    #[test]
    fn test_display_and_tag() {
        assert_eq!(format!("{}", Sentiment::Neutral), "neutral");
        assert_eq!(Sentiment::Bearish.tag(), "[-]");
    }
}
