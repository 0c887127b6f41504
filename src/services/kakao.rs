use crate::models::Place;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Kakao caps keyword search pages at 15 documents
pub const MAX_PAGE_SIZE: u8 = 15;

const KEYWORD_SEARCH_PATH: &str = "/v2/local/search/keyword.json";

/// Errors that can occur when searching places
#[derive(Debug, Error)]
pub enum PlaceSearchError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: invalid Kakao REST API key")]
    Unauthorized,

    #[error("Invalid place record: {0}")]
    InvalidRecord(String),
}

/// Raw document from the keyword search response
#[derive(Debug, Clone, Deserialize)]
pub struct KakaoDocument {
    pub place_name: Option<String>,
    pub address_name: Option<String>,
    pub road_address_name: Option<String>,
    pub phone: Option<String>,
    pub category_name: Option<String>,
    pub distance: Option<String>,
    pub place_url: Option<String>,
    /// Longitude as a decimal string
    pub x: Option<String>,
    /// Latitude as a decimal string
    pub y: Option<String>,
}

#[derive(Debug, Deserialize)]
struct KeywordSearchResponse {
    #[serde(default)]
    documents: Vec<KakaoDocument>,
}

/// Kakao returns "" for absent optional fields
fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_coordinate(value: Option<String>, field: &str) -> Result<f64, PlaceSearchError> {
    let raw = non_empty(value)
        .ok_or_else(|| PlaceSearchError::InvalidRecord(format!("missing {}", field)))?;

    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| PlaceSearchError::InvalidRecord(format!("non-numeric {}: {:?}", field, raw)))
}

impl TryFrom<KakaoDocument> for Place {
    type Error = PlaceSearchError;

    fn try_from(doc: KakaoDocument) -> Result<Self, Self::Error> {
        let name = non_empty(doc.place_name)
            .ok_or_else(|| PlaceSearchError::InvalidRecord("missing place_name".into()))?;
        let longitude = parse_coordinate(doc.x, "x")?;
        let latitude = parse_coordinate(doc.y, "y")?;

        Ok(Place {
            name,
            address: non_empty(doc.address_name).unwrap_or_default(),
            road_address: non_empty(doc.road_address_name),
            phone: non_empty(doc.phone),
            latitude,
            longitude,
            category: non_empty(doc.category_name),
            distance: non_empty(doc.distance).and_then(|d| d.parse().ok()),
            url: non_empty(doc.place_url),
        })
    }
}

/// Kakao Local keyword search client
///
/// Looks up candidate shops for a "location category" query.
#[derive(Clone)]
pub struct PlaceSearchClient {
    base_url: String,
    api_key: String,
    page_size: u8,
    client: Client,
}

impl PlaceSearchClient {
    /// Create a new place search client
    pub fn new(
        base_url: String,
        api_key: String,
        page_size: u8,
        timeout: Duration,
    ) -> Result<Self, PlaceSearchError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            api_key,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
            client,
        })
    }

    pub fn page_size(&self) -> u8 {
        self.page_size
    }

    /// Search places matching `"{location} {category}"`
    ///
    /// Records that fail validation are skipped with a warning; the rest of
    /// the page is still returned.
    pub async fn search(&self, location: &str, category: &str) -> Result<Vec<Place>, PlaceSearchError> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), KEYWORD_SEARCH_PATH);
        let query = format!("{} {}", location, category);
        let size = self.page_size.to_string();

        tracing::debug!("Searching places: {}", query);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("KakaoAK {}", self.api_key))
            .query(&[("query", query.as_str()), ("size", size.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(PlaceSearchError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Place search for {:?} failed: {} - {}", query, status, body);
            return Err(PlaceSearchError::ApiError(format!("Place search failed: {}", status)));
        }

        let body: KeywordSearchResponse = response.json().await?;
        let total = body.documents.len();

        let places: Vec<Place> = body
            .documents
            .into_iter()
            .filter_map(|doc| match Place::try_from(doc) {
                Ok(place) => Some(place),
                Err(e) => {
                    tracing::warn!("Skipping place record: {}", e);
                    None
                }
            })
            .collect();

        tracing::debug!("Found {} places for {:?} ({} documents)", places.len(), query, total);

        Ok(places)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> KakaoDocument {
        KakaoDocument {
            place_name: Some("Gangnam Rice Cake".to_string()),
            address_name: Some("Seoul Gangnam-gu 1".to_string()),
            road_address_name: Some(String::new()),
            phone: Some("02-111-2222".to_string()),
            category_name: Some("Food > Rice cake".to_string()),
            distance: Some("350".to_string()),
            place_url: Some("http://place.map.kakao.com/1".to_string()),
            x: Some("127.0276".to_string()),
            y: Some("37.4979".to_string()),
        }
    }

    #[test]
    fn test_document_into_place() {
        let place = Place::try_from(document()).unwrap();

        assert_eq!(place.name, "Gangnam Rice Cake");
        assert_eq!(place.latitude, 37.4979);
        assert_eq!(place.longitude, 127.0276);
        assert_eq!(place.road_address, None);
        assert_eq!(place.distance, Some(350));
    }

    #[test]
    fn test_missing_name_rejected() {
        let mut doc = document();
        doc.place_name = Some("  ".to_string());
        assert!(matches!(Place::try_from(doc), Err(PlaceSearchError::InvalidRecord(_))));
    }

    #[test]
    fn test_bad_coordinates_rejected() {
        let mut doc = document();
        doc.x = Some("east".to_string());
        assert!(matches!(Place::try_from(doc), Err(PlaceSearchError::InvalidRecord(_))));

        let mut doc = document();
        doc.y = None;
        assert!(matches!(Place::try_from(doc), Err(PlaceSearchError::InvalidRecord(_))));
    }

    #[test]
    fn test_page_size_clamped() {
        let client = PlaceSearchClient::new(
            "https://dapi.kakao.test".to_string(),
            "key".to_string(),
            40,
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(client.page_size(), MAX_PAGE_SIZE);
    }
}
