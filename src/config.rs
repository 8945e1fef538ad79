// Global configuration constants - single source of truth

use serde::{Deserialize, Serialize};
use url::Url;

pub struct Config;

impl Config {
    // HTTP/Network config
    pub const USER_AGENT: &'static str =
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:128.0) Gecko/20100101 Firefox/128.0";
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;
    pub const MAX_CONTENT_SIZE: usize = 10 * 1024 * 1024; // 10MB
    pub const POOL_IDLE_PER_HOST: usize = 16;
    pub const POOL_IDLE_TIMEOUT_SECS: u64 = 30;

    // Catalog layout
    pub const EXCHANGE_RATE: i64 = 16_000;
    pub const DETAIL_SLOTS: usize = 4;
    pub const MAX_PAGES: u32 = 10_000;
}

/// Errors raised while assembling scraper configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid base URL '{0}': {1}")]
    InvalidBaseUrl(String, String),

    #[error("Invalid page range {first}..={last}")]
    InvalidPageRange { first: u32, last: u32 },

    #[error("Page range covers {requested} pages, limit is {max}")]
    TooManyPages { requested: u32, max: u32 },

    #[error("Failed to read dirty pattern file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid dirty pattern table: {0}")]
    Json(#[from] serde_json::Error),
}

/// CSS selectors and conversion constants describing one catalog site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogLayout {
    pub container: String,
    pub card: String,
    pub title: String,
    pub price: String,
    pub detail: String,
    /// Multiplier applied to the listed price to get the local-currency amount
    pub exchange_rate: i64,
}

impl Default for CatalogLayout {
    fn default() -> Self {
        Self {
            container: "div#collectionList".to_string(),
            card: "div.collection-card".to_string(),
            title: "h3.product-title".to_string(),
            price: "div.price-container".to_string(),
            detail: "p".to_string(),
            exchange_rate: Config::EXCHANGE_RATE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Upper bound on in-flight page requests; `None` fans out every URL at once
    pub max_concurrency: Option<usize>,
    pub layout: CatalogLayout,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            user_agent: Config::USER_AGENT.to_string(),
            timeout_secs: Config::REQUEST_TIMEOUT_SECS,
            max_concurrency: None,
            layout: CatalogLayout::default(),
        }
    }
}

/// Build catalog page URLs for an inclusive page range.
///
/// Page 1 is the base URL itself; every later page lives at `{base}/page{n}`.
/// A query string on the base URL is carried onto every page; a fragment is
/// dropped.
pub fn page_urls(base: &str, first: u32, last: u32) -> Result<Vec<String>, ConfigError> {
    if first == 0 || first > last {
        return Err(ConfigError::InvalidPageRange { first, last });
    }
    let requested = last - first + 1;
    if requested > Config::MAX_PAGES {
        return Err(ConfigError::TooManyPages {
            requested,
            max: Config::MAX_PAGES,
        });
    }

    let mut base_url =
        Url::parse(base).map_err(|e| ConfigError::InvalidBaseUrl(base.to_string(), e.to_string()))?;
    if !matches!(base_url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl(
            base.to_string(),
            "scheme must be http or https".to_string(),
        ));
    }
    if !base_url.path().ends_with('/') {
        let path = format!("{}/", base_url.path());
        base_url.set_path(&path);
    }
    base_url.set_fragment(None);
    // join() replaces the query, so it is reapplied per page
    let query = base_url.query().map(str::to_string);

    (first..=last)
        .map(|page| {
            if page == 1 {
                return Ok(base_url.to_string());
            }
            let mut url = base_url
                .join(&format!("page{}", page))
                .map_err(|e| ConfigError::InvalidBaseUrl(base.to_string(), e.to_string()))?;
            url.set_query(query.as_deref());
            Ok(url.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_urls_first_page_is_base() {
        let urls = page_urls("https://fashion-studio.dicoding.dev", 1, 3).unwrap();
        assert_eq!(
            urls,
            vec![
                "https://fashion-studio.dicoding.dev/".to_string(),
                "https://fashion-studio.dicoding.dev/page2".to_string(),
                "https://fashion-studio.dicoding.dev/page3".to_string(),
            ]
        );
    }

    #[test]
    fn test_page_urls_nested_base() {
        let urls = page_urls("https://example.com/shop/", 4, 5).unwrap();
        assert_eq!(
            urls,
            vec![
                "https://example.com/shop/page4".to_string(),
                "https://example.com/shop/page5".to_string(),
            ]
        );
    }

    #[test]
    fn test_page_urls_rejects_bad_range() {
        assert!(matches!(
            page_urls("https://example.com", 5, 2),
            Err(ConfigError::InvalidPageRange { first: 5, last: 2 })
        ));
        assert!(page_urls("https://example.com", 0, 2).is_err());
    }

    #[test]
    fn test_page_urls_keeps_query() {
        let urls = page_urls("https://example.com/shop?sort=price#top", 1, 2).unwrap();
        assert_eq!(
            urls,
            vec![
                "https://example.com/shop/?sort=price".to_string(),
                "https://example.com/shop/page2?sort=price".to_string(),
            ]
        );
    }

    #[test]
    fn test_page_urls_caps_range() {
        assert!(matches!(
            page_urls("https://example.com", 1, u32::MAX),
            Err(ConfigError::TooManyPages { max: Config::MAX_PAGES, .. })
        ));
        let urls = page_urls("https://example.com", 1, Config::MAX_PAGES).unwrap();
        assert_eq!(urls.len(), Config::MAX_PAGES as usize);
    }

    #[test]
    fn test_page_urls_rejects_bad_base() {
        assert!(page_urls("not a url", 1, 2).is_err());
        assert!(page_urls("ftp://example.com", 1, 2).is_err());
    }

    #[test]
    fn test_layout_defaults_from_partial_json() {
        let layout: CatalogLayout = serde_json::from_str(r#"{"exchange_rate": 15000}"#).unwrap();
        assert_eq!(layout.exchange_rate, 15000);
        assert_eq!(layout.container, "div#collectionList");
    }
}
