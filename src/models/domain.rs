use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Candidate shop returned by the place search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub address: String,
    #[serde(rename = "roadAddress", default)]
    pub road_address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub category: Option<String>,
    /// Distance from the search centre in metres, when the API reports one
    #[serde(rename = "distanceM", default)]
    pub distance: Option<u32>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Blog snippet that may mention a shop and/or a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mention {
    pub title: String,
    pub description: String,
    #[serde(rename = "publishDate", default)]
    pub publish_date: Option<NaiveDate>,
    #[serde(default)]
    pub link: Option<String>,
}

/// Categorical reading of a confidence score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    /// No mentions were found at all
    NoInformation,
    Insufficient,
    Moderate,
    High,
}

impl ConfidenceLevel {
    pub const HIGH_THRESHOLD: f64 = 0.70;
    pub const MODERATE_THRESHOLD: f64 = 0.40;

    /// Map a confidence to its level. Lower bounds are inclusive.
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= Self::HIGH_THRESHOLD {
            ConfidenceLevel::High
        } else if confidence >= Self::MODERATE_THRESHOLD {
            ConfidenceLevel::Moderate
        } else {
            ConfidenceLevel::Insufficient
        }
    }

    /// Human readable status for this level and product
    pub fn label(&self, product: &str) -> String {
        match self {
            ConfidenceLevel::High => format!("high likelihood of selling {}", product),
            ConfidenceLevel::Moderate => format!("moderate likelihood of selling {}", product),
            ConfidenceLevel::Insufficient => format!("insufficient information about {}", product),
            ConfidenceLevel::NoInformation => format!("no information found about {}", product),
        }
    }
}

/// A place annotated with its confidence score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredPlace {
    #[serde(flatten)]
    pub place: Place,
    pub confidence: f64,
    pub level: ConfidenceLevel,
    #[serde(rename = "statusLabel")]
    pub status_label: String,
    #[serde(rename = "mentionCount")]
    pub mention_count: usize,
}

/// Parameters identifying one search; also the cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchParams {
    pub location: String,
    pub category: String,
    pub product: String,
}

impl SearchParams {
    pub fn new(
        location: impl Into<String>,
        category: impl Into<String>,
        product: impl Into<String>,
    ) -> Self {
        Self {
            location: location.into(),
            category: category.into(),
            product: product.into(),
        }
    }

    /// Trimmed copy, so " Gangnam" and "Gangnam" share a cache entry
    pub fn normalized(&self) -> Self {
        Self::new(
            self.location.trim(),
            self.category.trim(),
            self.product.trim(),
        )
    }
}

/// Geographic bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_thresholds_are_inclusive() {
        assert_eq!(ConfidenceLevel::from_confidence(0.70), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_confidence(0.40), ConfidenceLevel::Moderate);
        assert_eq!(ConfidenceLevel::from_confidence(0.6999), ConfidenceLevel::Moderate);
        assert_eq!(ConfidenceLevel::from_confidence(0.3999), ConfidenceLevel::Insufficient);
        assert_eq!(ConfidenceLevel::from_confidence(0.0), ConfidenceLevel::Insufficient);
    }

    #[test]
    fn test_labels_name_the_product() {
        assert_eq!(
            ConfidenceLevel::High.label("kimchi"),
            "high likelihood of selling kimchi"
        );
        assert!(ConfidenceLevel::NoInformation.label("kimchi").starts_with("no information"));
    }

    #[test]
    fn test_search_params_normalized() {
        let params = SearchParams::new(" Gangnam ", "bakery", "bread\n");
        assert_eq!(params.normalized(), SearchParams::new("Gangnam", "bakery", "bread"));
    }

    #[test]
    fn test_scored_place_serializes_flat() {
        let scored = ScoredPlace {
            place: Place {
                name: "Shop".to_string(),
                address: "Seoul".to_string(),
                road_address: None,
                phone: None,
                latitude: 37.5,
                longitude: 127.0,
                category: None,
                distance: None,
                url: None,
            },
            confidence: 0.5,
            level: ConfidenceLevel::Moderate,
            status_label: "moderate likelihood of selling bread".to_string(),
            mention_count: 3,
        };

        let json = serde_json::to_value(&scored).unwrap();
        assert_eq!(json["name"], "Shop");
        assert_eq!(json["mentionCount"], 3);
        assert_eq!(json["level"], "moderate");
    }
}
