use log::{info, warn};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use super::scorer::Scorer;
use super::types::Judgment;
use crate::stock::Article;

/// Score every article concurrently, at most `max_workers` at a time.
///
/// `result[i]` always belongs to `articles[i]`. Each spawned task owns one slot
/// (its join handle sits at the article's index) and every handle is awaited
/// before returning, so no task outlives the call. A task that dies outside the
/// scorer's own fallback gets the fallback judgment for its slot.
pub async fn analyze_batch(
    scorer: Arc<Scorer>,
    articles: &[Article],
    max_workers: usize,
) -> Vec<Judgment> {
    let total = articles.len();
    let max_workers = max_workers.max(1);
    info!("  🚀 Launching {total} analyses with {max_workers} concurrent workers...");

    let permits = Arc::new(Semaphore::new(max_workers));

    let slots: Vec<JoinHandle<Option<Judgment>>> = articles
        .iter()
        .enumerate()
        .map(|(i, article)| {
            let scorer = Arc::clone(&scorer);
            let permits = Arc::clone(&permits);
            let article = article.clone();

            tokio::spawn(async move {
                let _permit = permits.acquire_owned().await.ok()?;
                let judgment = scorer.score(&article).await;
                info!("  [{}/{total}] Done - {} ({})", i + 1, judgment.sentiment, judgment.score);
                Some(judgment)
            })
        })
        .collect();

    let mut results = Vec::with_capacity(total);
    for (i, (slot, article)) in slots.into_iter().zip(articles).enumerate() {
        let judgment = match slot.await {
            Ok(Some(judgment)) => judgment,
            Ok(None) => {
                warn!("  [{}/{total}] Worker error: no worker permit available", i + 1);
                Judgment::fallback(article)
            }
            Err(e) => {
                warn!("  [{}/{total}] Worker error: {e}", i + 1);
                Judgment::fallback(article)
            }
        };
        results.push(judgment);
    }

    results
}
