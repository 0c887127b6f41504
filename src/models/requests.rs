use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::filters::ConfidenceFilter;
use crate::models::SearchParams;

/// Request to run a product search
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchRequest {
    #[validate(length(min = 1, max = 100))]
    pub location: String,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[validate(length(min = 1, max = 100))]
    pub product: String,
}

impl SearchRequest {
    pub fn params(&self) -> SearchParams {
        SearchParams::new(&self.location, &self.category, &self.product).normalized()
    }
}

/// Query string identifying a previous search, with an optional filter
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResultsQuery {
    #[validate(length(min = 1))]
    pub location: String,
    #[validate(length(min = 1))]
    pub category: String,
    #[validate(length(min = 1))]
    pub product: String,
    #[serde(default)]
    pub filter: ConfidenceFilter,
}

impl ResultsQuery {
    pub fn params(&self) -> SearchParams {
        SearchParams::new(&self.location, &self.category, &self.product).normalized()
    }
}
