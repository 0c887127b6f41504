use crate::config::Settings;
use crate::core::ResultAggregator;
use crate::models::{ScoredPlace, SearchParams};
use crate::services::cache::SearchCache;
use crate::services::kakao::{PlaceSearchClient, PlaceSearchError};
use crate::services::naver::{MentionSearchClient, MentionSearchError};
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that can end a product search
#[derive(Debug, Error)]
pub enum FinderError {
    #[error("Search API credentials are not configured")]
    MissingCredentials,

    #[error("Place search failed: {0}")]
    PlaceSearch(#[from] PlaceSearchError),

    #[error("Mention search client error: {0}")]
    MentionSearch(#[from] MentionSearchError),

    #[error("No {category} found near {location}")]
    NoCandidates { location: String, category: String },
}

/// Result of a search, possibly served from the cache
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub params: SearchParams,
    pub results: Arc<Vec<ScoredPlace>>,
    pub from_cache: bool,
}

/// Both search API clients, present only when every credential is set
#[derive(Clone)]
struct SearchClients {
    places: PlaceSearchClient,
    mentions: MentionSearchClient,
}

/// Request-handling flow for product searches
///
/// Built once at startup and shared through the application state.
#[derive(Clone)]
pub struct ProductFinder {
    clients: Option<SearchClients>,
    aggregator: ResultAggregator,
    cache: SearchCache,
}

impl ProductFinder {
    pub fn new(
        places: PlaceSearchClient,
        mentions: MentionSearchClient,
        aggregator: ResultAggregator,
        cache: SearchCache,
    ) -> Self {
        Self {
            clients: Some(SearchClients { places, mentions }),
            aggregator,
            cache,
        }
    }

    /// A finder that refuses every search for lack of credentials
    pub fn without_credentials(aggregator: ResultAggregator, cache: SearchCache) -> Self {
        Self {
            clients: None,
            aggregator,
            cache,
        }
    }

    /// Build clients, aggregator and cache from configuration
    pub fn from_settings(settings: &Settings) -> Result<Self, FinderError> {
        let aggregator =
            ResultAggregator::new(Duration::from_millis(settings.search.request_delay_ms));
        let cache = SearchCache::new(settings.cache.ttl_secs);

        let Some(credentials) = settings.credentials() else {
            tracing::warn!("Kakao/Naver credentials missing; searches will be refused");
            return Ok(Self::without_credentials(aggregator, cache));
        };

        let places = PlaceSearchClient::new(
            settings.kakao.base_url.clone(),
            credentials.kakao_rest_api_key,
            settings.search.place_page_size,
            Duration::from_secs(settings.kakao.timeout_secs),
        )?;

        let mentions = MentionSearchClient::new(
            settings.naver.base_url.clone(),
            credentials.naver_client_id,
            credentials.naver_client_secret,
            settings.search.mention_display,
            Duration::from_secs(settings.naver.timeout_secs),
        )?;

        Ok(Self::new(places, mentions, aggregator, cache))
    }

    pub fn has_credentials(&self) -> bool {
        self.clients.is_some()
    }

    /// Results of the last search, if it used these parameters
    pub async fn cached(&self, params: &SearchParams) -> Option<Arc<Vec<ScoredPlace>>> {
        self.cache.get(params).await
    }

    /// Run a search using the local calendar date for recency
    pub async fn search(&self, params: &SearchParams) -> Result<SearchOutcome, FinderError> {
        self.search_on(params, chrono::Local::now().date_naive()).await
    }

    /// Run a search with an explicit reference date
    pub async fn search_on(
        &self,
        params: &SearchParams,
        today: NaiveDate,
    ) -> Result<SearchOutcome, FinderError> {
        let clients = self.clients.as_ref().ok_or(FinderError::MissingCredentials)?;

        if let Some(results) = self.cache.get(params).await {
            return Ok(SearchOutcome {
                params: params.clone(),
                results,
                from_cache: true,
            });
        }

        let places = clients.places.search(&params.location, &params.category).await?;

        if places.is_empty() {
            return Err(FinderError::NoCandidates {
                location: params.location.clone(),
                category: params.category.clone(),
            });
        }

        tracing::info!(
            "Found {} {} near {}, checking for {}",
            places.len(),
            params.category,
            params.location,
            params.product
        );

        let mentions = &clients.mentions;
        let scored = self
            .aggregator
            .aggregate(places, &params.product, today, |store, product| async move {
                mentions.search(&store, &product).await
            })
            .await;

        let results = Arc::new(scored);
        self.cache.store(params.clone(), Arc::clone(&results)).await;

        tracing::info!(
            "Scored {} places for {} ({} with moderate or better confidence)",
            results.len(),
            params.product,
            crate::core::summarize(&results).moderate_or_better
        );

        Ok(SearchOutcome {
            params: params.clone(),
            results,
            from_cache: false,
        })
    }
}
