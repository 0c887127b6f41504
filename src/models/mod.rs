// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{BoundingBox, ConfidenceLevel, Mention, Place, ScoredPlace, SearchParams};
pub use requests::{ResultsQuery, SearchRequest};
pub use responses::{CategoriesResponse, ErrorResponse, HealthResponse, RankedPlace, SearchResponse};
