use serde::{Deserialize, Serialize};

use crate::core::filters::{ConfidenceFilter, SearchSummary};
use crate::models::{ScoredPlace, SearchParams};

/// One ranked row of a result list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedPlace {
    pub rank: usize,
    #[serde(flatten)]
    pub place: ScoredPlace,
}

/// Response for the search and results endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: SearchParams,
    pub summary: SearchSummary,
    pub filter: ConfidenceFilter,
    pub results: Vec<RankedPlace>,
    #[serde(rename = "fromCache")]
    pub from_cache: bool,
}

/// Configured shop categories
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "credentialsConfigured")]
    pub credentials_configured: bool,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
