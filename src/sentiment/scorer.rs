use log::warn;
use serde::Deserialize;
use std::sync::Arc;

use super::types::{Judgment, Sentiment};
use crate::ai::{AiBackend, BackendError};
use crate::stock::Article;

const SENTIMENT_PROMPT: &str = r#"You are a professional financial analyst. Analyze the sentiment of the following news article about the stock {ticker}.

Title: {title}
Description: {description}
Published: {published_date}

Judge how this news is likely to affect the stock price of {ticker} in the short term.

Respond ONLY with a JSON object in exactly this format:
{
  "sentiment": "bullish" | "neutral" | "bearish",
  "score": <integer 0-100, 0 = extremely bearish, 50 = neutral, 100 = extremely bullish>,
  "confidence": <integer 0-100, how certain you are>,
  "reason": "<one or two sentence explanation>"
}"#;

#[derive(Debug, thiserror::Error)]
pub enum ScoreError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("JSON parse failed: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ScoreError {
    fn from(error: serde_json::Error) -> Self {
        ScoreError::Parse(error.to_string())
    }
}

// Fields the model must return; article metadata is attached afterwards
#[derive(Debug, Deserialize)]
struct ModelReply {
    sentiment: Sentiment,
    score: f64,
    confidence: f64,
    reason: String,
}

/// Substitute `{name}` placeholders in a single pass.
///
/// Unknown names and unmatched braces are copied through, and substituted
/// values are never scanned again.
fn fill_template(template: &str, fields: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];

        let field = tail.find('}').and_then(|end| {
            let name = &tail[..end];
            fields
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, end))
        });

        match field {
            Some((value, end)) => {
                out.push_str(value);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Fill the prompt template with one article's fields
pub fn build_prompt(article: &Article) -> String {
    let ticker = if article.ticker.trim().is_empty() {
        "Unknown"
    } else {
        article.ticker.as_str()
    };

    fill_template(
        SENTIMENT_PROMPT,
        &[
            ("ticker", ticker),
            ("title", &article.title),
            ("description", &article.description),
            ("published_date", &article.published_utc),
        ],
    )
}

/// Drop markdown code fences the model sometimes wraps its JSON in.
///
/// A ```` ```json ```` fence wins over a bare one; text between the opening
/// fence and the next fence (or the end) is kept.
pub fn strip_code_fence(text: &str) -> &str {
    if let Some((_, rest)) = text.split_once("```json") {
        rest.split("```").next().unwrap_or(rest).trim()
    } else if text.contains("```") {
        text.split("```").nth(1).unwrap_or_default().trim()
    } else {
        text.trim()
    }
}

/// Parse a model reply into a judgment for `article`
pub fn parse_reply(reply: &str, article: &Article) -> Result<Judgment, ScoreError> {
    let parsed: ModelReply = serde_json::from_str(strip_code_fence(reply))?;

    for (field, value) in [("score", parsed.score), ("confidence", parsed.confidence)] {
        if !(0.0..=100.0).contains(&value) {
            return Err(ScoreError::Parse(format!("{field} out of range: {value}")));
        }
    }

    Ok(Judgment {
        sentiment: parsed.sentiment,
        score: parsed.score,
        confidence: parsed.confidence,
        reason: parsed.reason,
        title: article.title.clone(),
        source: article.source.clone(),
        published_utc: article.published_utc.clone(),
    })
}

/// Scores one article at a time through an AI backend
pub struct Scorer {
    backend: Arc<dyn AiBackend>,
}

impl Scorer {
    pub fn new(backend: Arc<dyn AiBackend>) -> Self {
        Self { backend }
    }

    /// Score an article, reporting backend and parse failures as values
    pub async fn try_score(&self, article: &Article) -> Result<Judgment, ScoreError> {
        let prompt = build_prompt(article);
        let reply = self.backend.complete(&prompt).await?;
        parse_reply(&reply, article)
    }

    /// Score an article; any failure yields the neutral fallback judgment
    pub async fn score(&self, article: &Article) -> Judgment {
        match self.try_score(article).await {
            Ok(judgment) => judgment,
            Err(e) => {
                warn!("  [{}] Analysis failed: {e}", article.ticker);
                Judgment::fallback(article)
            }
        }
    }
}
