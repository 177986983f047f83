/// Stock news sources and the per-stock sentiment pipeline
pub mod provider;
pub mod service;

// Re-export commonly used types
pub use provider::{Article, JsonFileNewsSource};
pub use service::{SentimentService, StockAnalysis, SummaryRow, summarize};
