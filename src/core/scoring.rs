use chrono::{Duration, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;

use crate::models::{ConfidenceLevel, Mention};

// Weights are percentage points summing to 100

/// Weight of the share of mentions naming the product
pub const PRODUCT_WEIGHT: f64 = 50.0;
/// Weight of the share of mentions naming the store
pub const STORE_WEIGHT: f64 = 20.0;
/// Weight of the share of mentions published within the recency window
pub const RECENCY_WEIGHT: f64 = 20.0;
/// Weight of the raw mention volume
pub const VOLUME_WEIGHT: f64 = 10.0;

/// Mentions newer than this many days count as recent
pub const RECENCY_WINDOW_DAYS: i64 = 365;
/// Mention count at which the volume component saturates
pub const VOLUME_SATURATION: f64 = 10.0;

/// Output of the confidence scorer
#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceScore {
    pub confidence: f64,
    pub level: ConfidenceLevel,
    pub status_label: String,
}

fn markup_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<.*?>").expect("markup regex must compile"))
}

/// Remove markup tags such as `<b>` from a snippet
pub fn strip_markup(text: &str) -> String {
    markup_re().replace_all(text, "").into_owned()
}

/// Estimate how likely a store is to sell a product from its blog mentions
///
/// Scoring formula:
/// confidence = (
///     product_rate * 0.50 +     # Mentions naming the product
///     store_rate * 0.20 +       # Mentions naming the store
///     recency_rate * 0.20 +     # Mentions from the last 365 days
///     volume_rate * 0.10        # min(total / 10, 1)
/// )
///
/// All text matching is case-insensitive and done on markup-stripped text.
/// A mention without a publish date is never recent.
pub fn calculate_confidence(
    mentions: &[Mention],
    store_name: &str,
    product_name: &str,
    today: NaiveDate,
) -> ConfidenceScore {
    if mentions.is_empty() {
        let level = ConfidenceLevel::NoInformation;
        return ConfidenceScore {
            confidence: 0.0,
            level,
            status_label: level.label(product_name),
        };
    }

    let store = store_name.to_lowercase();
    let product = product_name.to_lowercase();
    let cutoff = today - Duration::days(RECENCY_WINDOW_DAYS);

    let mut product_mentions = 0usize;
    let mut store_mentions = 0usize;
    let mut recent_mentions = 0usize;

    for mention in mentions {
        let title = strip_markup(&mention.title).to_lowercase();
        let description = strip_markup(&mention.description).to_lowercase();

        if title.contains(&product) || description.contains(&product) {
            product_mentions += 1;
        }

        if title.contains(&store) || description.contains(&store) {
            store_mentions += 1;
        }

        if mention.publish_date.is_some_and(|date| date > cutoff) {
            recent_mentions += 1;
        }
    }

    let total = mentions.len() as f64;
    let product_rate = rate(product_mentions as f64, total);
    let store_rate = rate(store_mentions as f64, total);
    let recency_rate = rate(recent_mentions as f64, total);
    let volume_rate = rate(total, VOLUME_SATURATION);

    let confidence = ((product_rate * PRODUCT_WEIGHT
        + store_rate * STORE_WEIGHT
        + recency_rate * RECENCY_WEIGHT
        + volume_rate * VOLUME_WEIGHT)
        / 100.0)
        .clamp(0.0, 1.0);

    let level = ConfidenceLevel::from_confidence(confidence);

    ConfidenceScore {
        confidence,
        level,
        status_label: level.label(product_name),
    }
}

#[inline]
fn rate(count: f64, total: f64) -> f64 {
    (count / total).min(1.0)
}
