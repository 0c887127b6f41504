use serde::{Deserialize, Serialize};

use crate::models::{ConfidenceLevel, ScoredPlace};

/// Confidence band a result list can be narrowed to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceFilter {
    #[default]
    All,
    /// 70% and above
    High,
    /// 40% and above, high included
    Moderate,
    /// Below 40%
    Low,
}

impl ConfidenceFilter {
    #[inline]
    pub fn matches(&self, place: &ScoredPlace) -> bool {
        let confidence = place.confidence;
        match self {
            ConfidenceFilter::All => true,
            ConfidenceFilter::High => confidence >= ConfidenceLevel::HIGH_THRESHOLD,
            ConfidenceFilter::Moderate => confidence >= ConfidenceLevel::MODERATE_THRESHOLD,
            ConfidenceFilter::Low => confidence < ConfidenceLevel::MODERATE_THRESHOLD,
        }
    }
}

/// Keep the places matching `filter`, preserving rank order
pub fn apply_filter<'a>(
    places: &'a [ScoredPlace],
    filter: ConfidenceFilter,
) -> impl Iterator<Item = (usize, &'a ScoredPlace)> + 'a {
    places
        .iter()
        .enumerate()
        .filter(move |(_, place)| filter.matches(place))
        .map(|(idx, place)| (idx + 1, place))
}

/// Headline counts shown above a result list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSummary {
    pub total: usize,
    pub high: usize,
    #[serde(rename = "moderateOrBetter")]
    pub moderate_or_better: usize,
}

pub fn summarize(places: &[ScoredPlace]) -> SearchSummary {
    SearchSummary {
        total: places.len(),
        high: places.iter().filter(|p| ConfidenceFilter::High.matches(p)).count(),
        moderate_or_better: places
            .iter()
            .filter(|p| ConfidenceFilter::Moderate.matches(p))
            .count(),
    }
}
