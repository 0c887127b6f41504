// Service exports
pub mod cache;
pub mod finder;
pub mod kakao;
pub mod naver;

pub use cache::SearchCache;
pub use finder::{FinderError, ProductFinder, SearchOutcome};
pub use kakao::{PlaceSearchClient, PlaceSearchError};
pub use naver::{MentionSearchClient, MentionSearchError};
