use crate::models::Mention;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Naver blog search accepts at most 100 items per page
pub const MAX_DISPLAY: u8 = 100;

const BLOG_SEARCH_PATH: &str = "/v1/search/blog.json";

/// Errors that can occur when searching mentions
#[derive(Debug, Error)]
pub enum MentionSearchError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: invalid Naver client id or secret")]
    Unauthorized,
}

#[derive(Debug, Clone, Deserialize)]
struct BlogItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    link: Option<String>,
    postdate: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BlogSearchResponse {
    #[serde(default)]
    items: Vec<BlogItem>,
}

/// Parse a compact `YYYYMMDD` post date
pub fn parse_post_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y%m%d").ok()
}

impl From<BlogItem> for Mention {
    fn from(item: BlogItem) -> Self {
        Mention {
            title: item.title,
            description: item.description,
            publish_date: item.postdate.as_deref().and_then(parse_post_date),
            link: item.link.filter(|l| !l.is_empty()),
        }
    }
}

/// Naver blog search client
#[derive(Clone)]
pub struct MentionSearchClient {
    base_url: String,
    client_id: String,
    client_secret: String,
    display: u8,
    client: Client,
}

impl MentionSearchClient {
    /// Create a new mention search client
    pub fn new(
        base_url: String,
        client_id: String,
        client_secret: String,
        display: u8,
        timeout: Duration,
    ) -> Result<Self, MentionSearchError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            client_id,
            client_secret,
            display: display.clamp(1, MAX_DISPLAY),
            client,
        })
    }

    /// Most recent blog posts for `"{store_name} {product_name}"`
    pub async fn search(
        &self,
        store_name: &str,
        product_name: &str,
    ) -> Result<Vec<Mention>, MentionSearchError> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), BLOG_SEARCH_PATH);
        let query = format!("{} {}", store_name, product_name);
        let display = self.display.to_string();

        let response = self
            .client
            .get(&url)
            .header("X-Naver-Client-Id", &self.client_id)
            .header("X-Naver-Client-Secret", &self.client_secret)
            .query(&[
                ("query", query.as_str()),
                ("display", display.as_str()),
                ("sort", "date"),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(MentionSearchError::Unauthorized);
        }
        if !status.is_success() {
            return Err(MentionSearchError::ApiError(format!(
                "Blog search failed: {}",
                status
            )));
        }

        let body: BlogSearchResponse = response.json().await?;
        let mentions: Vec<Mention> = body.items.into_iter().map(Mention::from).collect();

        tracing::trace!("{} mentions for {:?}", mentions.len(), query);

        Ok(mentions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_post_date() {
        assert_eq!(parse_post_date("20240131"), NaiveDate::from_ymd_opt(2024, 1, 31));
        assert_eq!(parse_post_date("20241341"), None);
        assert_eq!(parse_post_date(""), None);
        assert_eq!(parse_post_date("2024-01-31"), None);
    }

    #[test]
    fn test_item_into_mention() {
        let item = BlogItem {
            title: "<b>Siru</b> rice cake".to_string(),
            description: "fresh".to_string(),
            link: Some(String::new()),
            postdate: Some("not a date".to_string()),
        };

        let mention = Mention::from(item);
        assert_eq!(mention.title, "<b>Siru</b> rice cake");
        assert_eq!(mention.publish_date, None);
        assert_eq!(mention.link, None);
    }
}
