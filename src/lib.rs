//! Product Finder - find local shops that plausibly sell a given product
//!
//! Candidate shops come from the Kakao Local keyword search. Each shop is then
//! checked against recent Naver blog posts, and a weighted confidence score
//! estimates how likely it is to sell the requested product.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{calculate_confidence, ResultAggregator};
pub use models::{ConfidenceLevel, Mention, Place, ScoredPlace, SearchParams};
pub use services::ProductFinder;
