use chrono::NaiveDate;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use crate::core::scoring::calculate_confidence;
use crate::models::{Mention, Place, ScoredPlace};

/// Default pause between consecutive mention searches
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(100);

/// Scores every candidate place and ranks them by confidence
///
/// # Pipeline Stages
/// 1. Mention fetch for each place, one at a time
/// 2. Confidence scoring
/// 3. Stable ranking by confidence, descending
#[derive(Debug, Clone)]
pub struct ResultAggregator {
    request_delay: Duration,
}

impl ResultAggregator {
    pub fn new(request_delay: Duration) -> Self {
        Self { request_delay }
    }

    /// Score and rank candidate places
    ///
    /// # Arguments
    /// * `places` - Candidates in fetch order
    /// * `product_name` - Product the user is looking for
    /// * `today` - Reference date for the recency component
    /// * `fetch_mentions` - Called with `(store_name, product_name)` once per place
    ///
    /// A failed fetch is logged and scored as an empty mention list, so one
    /// bad place never drops the others.
    pub async fn aggregate<F, Fut, E>(
        &self,
        places: Vec<Place>,
        product_name: &str,
        today: NaiveDate,
        mut fetch_mentions: F,
    ) -> Vec<ScoredPlace>
    where
        F: FnMut(String, String) -> Fut,
        Fut: Future<Output = Result<Vec<Mention>, E>>,
        E: Display,
    {
        let total = places.len();
        let mut scored_places = Vec::with_capacity(total);

        for (idx, place) in places.into_iter().enumerate() {
            if idx > 0 && !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }

            tracing::debug!(
                "Checking {} for {} ({}/{})",
                place.name,
                product_name,
                idx + 1,
                total
            );

            let mentions = match fetch_mentions(place.name.clone(), product_name.to_string()).await {
                Ok(mentions) => mentions,
                Err(e) => {
                    tracing::warn!("Mention search failed for {}, scoring as empty: {}", place.name, e);
                    Vec::new()
                }
            };

            let score = calculate_confidence(&mentions, &place.name, product_name, today);

            scored_places.push(ScoredPlace {
                place,
                confidence: score.confidence,
                level: score.level,
                status_label: score.status_label,
                mention_count: mentions.len(),
            });
        }

        rank_by_confidence(&mut scored_places);
        scored_places
    }
}

impl Default for ResultAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_REQUEST_DELAY)
    }
}

/// Sort by confidence, descending. Stable, so ties keep fetch order.
pub fn rank_by_confidence(places: &mut [ScoredPlace]) {
    places.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}
