use actix_web::{http::header, web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{apply_filter, build_map, export_csv, export_filename, summarize, ConfidenceFilter};
use crate::models::{
    CategoriesResponse, ErrorResponse, HealthResponse, RankedPlace, ResultsQuery, ScoredPlace,
    SearchParams, SearchRequest, SearchResponse,
};
use crate::services::{FinderError, ProductFinder};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub finder: ProductFinder,
    pub categories: Vec<String>,
}

/// Configure all search-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/categories", web::get().to(list_categories))
        .route("/search", web::post().to(search))
        .route("/search/results", web::get().to(get_results))
        .route("/search/map", web::get().to(get_map))
        .route("/search/export", web::get().to(export_results));
}

fn error_response(status: actix_web::http::StatusCode, error: &str, message: String) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: status.as_u16(),
    })
}

fn finder_error_response(err: &FinderError) -> HttpResponse {
    use actix_web::http::StatusCode;

    match err {
        FinderError::MissingCredentials => error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "missing_credentials",
            "Kakao and Naver API credentials must be configured before searching".to_string(),
        ),
        FinderError::NoCandidates { .. } => {
            error_response(StatusCode::NOT_FOUND, "no_candidates", err.to_string())
        }
        FinderError::PlaceSearch(_) => {
            error_response(StatusCode::BAD_GATEWAY, "place_search_failed", err.to_string())
        }
        FinderError::MentionSearch(_) => {
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "mention_search_failed", err.to_string())
        }
    }
}

fn validation_error_response(errors: &validator::ValidationErrors) -> HttpResponse {
    error_response(
        actix_web::http::StatusCode::BAD_REQUEST,
        "Validation failed",
        errors.to_string(),
    )
}

fn no_results_response(params: &SearchParams) -> HttpResponse {
    error_response(
        actix_web::http::StatusCode::NOT_FOUND,
        "no_results",
        format!(
            "No search results for {} / {} / {}; run a search first",
            params.location, params.category, params.product
        ),
    )
}

fn build_response(
    params: SearchParams,
    places: &[ScoredPlace],
    filter: ConfidenceFilter,
    from_cache: bool,
) -> SearchResponse {
    let results = apply_filter(places, filter)
        .map(|(rank, place)| RankedPlace {
            rank,
            place: place.clone(),
        })
        .collect();

    SearchResponse {
        query: params,
        summary: summarize(places),
        filter,
        results,
        from_cache,
    }
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let credentials_configured = state.finder.has_credentials();
    let status = if credentials_configured { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        credentials_configured,
    })
}

/// Shop categories offered to the user
async fn list_categories(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(CategoriesResponse {
        categories: state.categories.clone(),
    })
}

/// Search endpoint
///
/// POST /api/v1/search
///
/// Request body:
/// ```json
/// {
///   "location": "강남구",
///   "category": "떡집",
///   "product": "시루떡"
/// }
/// ```
async fn search(state: web::Data<AppState>, req: web::Json<SearchRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for search request: field_errors={:?}", errors);
        return validation_error_response(&errors);
    }

    let params = req.params();
    tracing::info!(
        "Searching {} near {} for {}",
        params.category,
        params.location,
        params.product
    );

    match state.finder.search(&params).await {
        Ok(outcome) => HttpResponse::Ok().json(build_response(
            outcome.params,
            &outcome.results,
            ConfidenceFilter::All,
            outcome.from_cache,
        )),
        Err(e) => {
            match &e {
                FinderError::NoCandidates { .. } => tracing::info!("{}", e),
                _ => tracing::error!("Search for {:?} failed: {}", params, e),
            }
            finder_error_response(&e)
        }
    }
}

/// Filtered view of the last search
///
/// GET /api/v1/search/results?location=..&category=..&product=..&filter=high|moderate|low|all
async fn get_results(state: web::Data<AppState>, query: web::Query<ResultsQuery>) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_error_response(&errors);
    }

    let params = query.params();
    match state.finder.cached(&params).await {
        Some(places) => HttpResponse::Ok().json(build_response(params, &places, query.filter, true)),
        None => no_results_response(&params),
    }
}

/// Map markers for the last search
///
/// GET /api/v1/search/map?location=..&category=..&product=..
async fn get_map(state: web::Data<AppState>, query: web::Query<ResultsQuery>) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_error_response(&errors);
    }

    let params = query.params();
    match state.finder.cached(&params).await {
        Some(places) => HttpResponse::Ok().json(build_map(&places)),
        None => no_results_response(&params),
    }
}

/// CSV download of the last search
///
/// GET /api/v1/search/export?location=..&category=..&product=..
async fn export_results(state: web::Data<AppState>, query: web::Query<ResultsQuery>) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_error_response(&errors);
    }

    let params = query.params();
    let Some(places) = state.finder.cached(&params).await else {
        return no_results_response(&params);
    };

    let filename = export_filename(&params, chrono::Local::now().naive_local());
    let disposition = format!(
        "attachment; filename=\"results.csv\"; filename*=UTF-8''{}",
        urlencoding::encode(&filename)
    );

    tracing::debug!("Exporting {} results as {}", places.len(), filename);

    HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((header::CONTENT_DISPOSITION, disposition))
        .body(export_csv(&places))
}
