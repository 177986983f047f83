use super::types::{Judgment, Sentiment, Verdict};

/// Weight given to a judgment that reports zero confidence.
///
/// Fallback judgments also carry zero confidence, so failed articles still
/// pull the stock score towards 50 with this weight.
const ZERO_CONFIDENCE_WEIGHT: f64 = 0.5;

// Ties go to the even digit: 40.125 -> 40.12
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

fn weight(judgment: &Judgment) -> f64 {
    if judgment.confidence > 0.0 {
        judgment.confidence / 100.0
    } else {
        ZERO_CONFIDENCE_WEIGHT
    }
}

/// Reduce per-article judgments into a stock verdict using a confidence-weighted average
pub fn aggregate(judgments: &[Judgment]) -> Verdict {
    if judgments.is_empty() {
        return Verdict::default();
    }

    let count = |sentiment: Sentiment| judgments.iter().filter(|j| j.sentiment == sentiment).count();

    let (weighted_score, total_weight) = judgments.iter().fold((0.0, 0.0), |(sum, total), j| {
        let w = weight(j);
        (sum + j.score * w, total + w)
    });

    let final_score = if total_weight > 0.0 {
        weighted_score / total_weight
    } else {
        50.0
    };

    let avg_confidence =
        judgments.iter().map(|j| j.confidence).sum::<f64>() / judgments.len() as f64;

    Verdict {
        final_score: round2(final_score),
        sentiment: Sentiment::from_score(final_score),
        news_count: judgments.len(),
        avg_confidence: round2(avg_confidence),
        bullish_count: count(Sentiment::Bullish),
        neutral_count: count(Sentiment::Neutral),
        bearish_count: count(Sentiment::Bearish),
        details: judgments.to_vec(),
    }
}
