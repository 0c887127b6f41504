// Core algorithm exports
pub mod aggregator;
pub mod export;
pub mod filters;
pub mod map;
pub mod scoring;

pub use aggregator::{rank_by_confidence, ResultAggregator};
pub use export::{export_csv, export_filename};
pub use filters::{apply_filter, summarize, ConfidenceFilter, SearchSummary};
pub use map::{build_map, MapView};
pub use scoring::{calculate_confidence, strip_markup, ConfidenceScore};
