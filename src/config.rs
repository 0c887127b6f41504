use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub kakao: KakaoSettings,
    #[serde(default)]
    pub naver: NaverSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KakaoSettings {
    #[serde(default = "default_kakao_base_url")]
    pub base_url: String,
    /// REST API key; searches are refused while this is unset
    pub rest_api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for KakaoSettings {
    fn default() -> Self {
        Self {
            base_url: default_kakao_base_url(),
            rest_api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NaverSettings {
    #[serde(default = "default_naver_base_url")]
    pub base_url: String,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for NaverSettings {
    fn default() -> Self {
        Self {
            base_url: default_naver_base_url(),
            client_id: None,
            client_secret: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_place_page_size")]
    pub place_page_size: u8,
    #[serde(default = "default_mention_display")]
    pub mention_display: u8,
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            place_page_size: default_place_page_size(),
            mention_display: default_mention_display(),
            request_delay_ms: default_request_delay_ms(),
            categories: default_categories(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self { ttl_secs: default_cache_ttl_secs() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_kakao_base_url() -> String { "https://dapi.kakao.com".to_string() }
fn default_naver_base_url() -> String { "https://openapi.naver.com".to_string() }
fn default_timeout_secs() -> u64 { 10 }
fn default_place_page_size() -> u8 { 15 }
fn default_mention_display() -> u8 { 10 }
fn default_request_delay_ms() -> u64 { 100 }
fn default_cache_ttl_secs() -> u64 { 1800 }
fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

fn default_categories() -> Vec<String> {
    ["떡집", "과일가게", "김치가게", "빵집", "한과집", "전통시장"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with PRODUCT_FINDER)
    /// 5. Well-known credential variables (KAKAO_REST_API_KEY, NAVER_CLIENT_ID, NAVER_CLIENT_SECRET)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., PRODUCT_FINDER__SERVER__PORT -> server.port
            .add_source(env_source())
            .build()?;

        apply_credential_overrides(settings)?.try_deserialize()
    }

    /// Credentials for both search APIs, if all of them are set
    pub fn credentials(&self) -> Option<ApiCredentials> {
        fn present(value: &Option<String>) -> Option<String> {
            value.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
        }

        Some(ApiCredentials {
            kakao_rest_api_key: present(&self.kakao.rest_api_key)?,
            naver_client_id: present(&self.naver.client_id)?,
            naver_client_secret: present(&self.naver.client_secret)?,
        })
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials().is_some()
    }
}

/// Resolved API credentials
#[derive(Clone)]
pub struct ApiCredentials {
    pub kakao_rest_api_key: String,
    pub naver_client_id: String,
    pub naver_client_secret: String,
}

impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("kakao_rest_api_key", &"<redacted>")
            .field("naver_client_id", &self.naver_client_id)
            .field("naver_client_secret", &"<redacted>")
            .finish()
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("PRODUCT_FINDER")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Pick up API credentials from their conventional variable names
fn apply_credential_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let overrides = [
        ("KAKAO_REST_API_KEY", "kakao.rest_api_key"),
        ("NAVER_CLIENT_ID", "naver.client_id"),
        ("NAVER_CLIENT_SECRET", "naver.client_secret"),
    ];

    let mut builder = Config::builder().add_source(settings);

    for (var, key) in overrides {
        if let Ok(value) = env::var(var) {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_from_toml(toml: &str) -> Settings {
        Config::builder()
            .add_source(File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults_fill_missing_sections() {
        let settings = settings_from_toml(
            r#"
            [server]
            host = "127.0.0.1"
            port = 8080
            "#,
        );

        assert_eq!(settings.kakao.base_url, "https://dapi.kakao.com");
        assert_eq!(settings.naver.base_url, "https://openapi.naver.com");
        assert_eq!(settings.search.place_page_size, 15);
        assert_eq!(settings.search.mention_display, 10);
        assert_eq!(settings.search.request_delay_ms, 100);
        assert_eq!(settings.search.categories.len(), 6);
        assert!(!settings.has_credentials());
    }

    #[test]
    fn test_has_credentials_requires_all_three() {
        let mut settings = settings_from_toml(
            r#"
            [server]
            host = "127.0.0.1"
            port = 8080

            [kakao]
            rest_api_key = "kakao"

            [naver]
            client_id = "id"
            client_secret = "  "
            "#,
        );
        assert!(!settings.has_credentials());

        settings.naver.client_secret = Some("secret".to_string());
        assert!(settings.has_credentials());
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }
}
