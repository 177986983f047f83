use chrono::{DateTime, Utc};
use std::fmt::Write;

use crate::sentiment::Sentiment;
use crate::stock::{StockAnalysis, SummaryRow};

const TITLE_WIDTH: usize = 60;

fn or_na(value: &str) -> &str {
    if value.is_empty() { "N/A" } else { value }
}

fn truncate(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}

/// Format one stock's analysis, article by article
pub fn format_analysis(analysis: &StockAnalysis) -> String {
    let verdict = &analysis.verdict;
    let rule = "=".repeat(60);

    let mut out = format!(
        "{rule}\nResult: {}\n{rule}\nFinal Score:    {:.1} / 100\nSentiment:      {}\nArticles:       {}\nLookback:       {} days\nAvg Confidence: {:.1}%\nBullish/Neutral/Bearish: {}/{}/{}\n",
        analysis.ticker,
        verdict.final_score,
        verdict.sentiment.as_str().to_uppercase(),
        verdict.news_count,
        analysis.lookback_days,
        verdict.avg_confidence,
        verdict.bullish_count,
        verdict.neutral_count,
        verdict.bearish_count,
    );

    if let Some(message) = &analysis.message {
        let _ = writeln!(out, "Note:           {message}");
    }

    if !verdict.details.is_empty() {
        out.push_str("\n--- Article Details ---\n");
        for (i, detail) in verdict.details.iter().enumerate() {
            let _ = write!(
                out,
                "\n{}. {} [Score:{}] {}\n   Source: {} | {}\n   Reason: {}\n",
                i + 1,
                detail.sentiment.tag(),
                detail.score,
                truncate(or_na(&detail.title), TITLE_WIDTH),
                or_na(&detail.source),
                truncate(or_na(&detail.published_utc), 10),
                or_na(&detail.reason),
            );
        }
    }

    out
}

/// Format the ranked multi-stock table
pub fn format_summary(rows: &[SummaryRow], lookback_days: u32, now: DateTime<Utc>) -> String {
    let rule = "=".repeat(70);
    let line = "-".repeat(70);

    let mut out = format!(
        "{rule}\nStock Sentiment Analysis Summary\n{rule}\nTime: {}\nLookback: {lookback_days} days\nStocks Analyzed: {}\n\n{rule}\n",
        now.format("%Y-%m-%d %H:%M:%S UTC"),
        rows.len(),
    );

    let _ = writeln!(
        out,
        "{:<6} {:<8} {:<8} {:<12} {:<10} {:<10}",
        "Rank", "Ticker", "Score", "Sentiment", "Articles", "Confidence"
    );
    let _ = writeln!(out, "{line}");

    for (i, row) in rows.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:<6} {:<8} {:<8.1} {:<12} {:<10} {:<10.1}",
            i + 1,
            row.ticker,
            row.score,
            row.sentiment.as_str().to_uppercase(),
            row.news_count,
            row.avg_confidence,
        );
    }
    let _ = writeln!(out, "{line}");

    let tickers_with = |sentiment: Sentiment| {
        rows.iter()
            .filter(|r| r.sentiment == sentiment)
            .map(|r| r.ticker.as_str())
            .collect::<Vec<_>>()
    };

    let bullish = tickers_with(Sentiment::Bullish);
    if !bullish.is_empty() {
        let _ = writeln!(out, "\nBullish: {}", bullish.join(", "));
    }
    let bearish = tickers_with(Sentiment::Bearish);
    if !bearish.is_empty() {
        let _ = writeln!(out, "Bearish: {}", bearish.join(", "));
    }

    if !rows.is_empty() {
        let average = rows.iter().map(|r| r.score).sum::<f64>() / rows.len() as f64;
        let _ = writeln!(out, "\nAverage Score: {average:.1}");
    }

    out
}
