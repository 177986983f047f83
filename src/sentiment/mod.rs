/// News sentiment scoring and aggregation
pub mod aggregate;
pub mod batch;
pub mod scorer;
pub mod types;

// Re-export commonly used types
pub use aggregate::aggregate;
pub use batch::analyze_batch;
pub use scorer::Scorer;
pub use types::{Sentiment, Verdict};
