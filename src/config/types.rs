use serde::Deserialize;

/// Main configuration structure for Shelf-Scout
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub politeness: PolitenessConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// The storefront being scraped
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Crawler name; written to the Website column and used as the cache key
    pub name: String,

    /// Site root, e.g. "https://www.noon.com"
    pub root: String,

    /// Path and query of the listing, appended to the root
    #[serde(rename = "listing-path")]
    pub listing_path: String,

    /// Query parameter carrying the page number
    #[serde(rename = "page-param", default = "default_page_param")]
    pub page_param: String,

    /// Number of listing pages to walk
    #[serde(default = "default_pages")]
    pub pages: u32,

    /// Currency code prices are quoted in
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Host glob the politeness rules apply to (defaults to `*<name>.*`)
    #[serde(rename = "host-pattern", default)]
    pub host_pattern: Option<String>,
}

impl SiteConfig {
    /// Returns the host glob, falling back to one derived from the site name
    pub fn host_pattern(&self) -> String {
        self.host_pattern
            .clone()
            .unwrap_or_else(|| format!("*{}.*", self.name))
    }
}

/// Rate limiting and retry rules for outbound fetches
#[derive(Debug, Clone, Deserialize)]
pub struct PolitenessConfig {
    /// Maximum simultaneous fetches per matched host
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,

    /// Fixed delay before each fetch (milliseconds)
    #[serde(rename = "delay-ms", default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Upper bound of the random jitter added to the delay (milliseconds)
    #[serde(rename = "random-delay-ms", default = "default_random_delay_ms")]
    pub random_delay_ms: u64,

    /// Retries allowed after the first failed attempt
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// Sleep between retries (milliseconds)
    #[serde(rename = "retry-backoff-ms", default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Wall-clock limit for a single fetch attempt (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for PolitenessConfig {
    fn default() -> Self {
        Self {
            parallelism: default_parallelism(),
            delay_ms: default_delay_ms(),
            random_delay_ms: default_random_delay_ms(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Directory holding cached responses; `None` disables the cache
    #[serde(rename = "cache-dir", default = "default_cache_dir")]
    pub cache_dir: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            cache_dir: default_cache_dir(),
        }
    }
}

/// Notability filter settings
#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    /// Products with more ratings than this are kept
    #[serde(rename = "min-rating-count", default = "default_min_rating_count")]
    pub min_rating_count: u32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_rating_count: default_min_rating_count(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the CSV file rows are appended to
    #[serde(rename = "csv-path", default = "default_csv_path")]
    pub csv_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
        }
    }
}

fn default_page_param() -> String {
    "page".to_string()
}

fn default_pages() -> u32 {
    5
}

fn default_currency() -> String {
    "AED".to_string()
}

fn default_parallelism() -> u32 {
    3
}

fn default_delay_ms() -> u64 {
    1000
}

fn default_random_delay_ms() -> u64 {
    15_000
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    5000
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36".to_string()
}

fn default_cache_dir() -> Option<String> {
    Some("./cache".to_string())
}

fn default_min_rating_count() -> u32 {
    100
}

fn default_csv_path() -> String {
    "products.csv".to_string()
}
