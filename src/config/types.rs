use crate::ConfigError;
use serde::Deserialize;
use std::collections::BTreeMap;
use url::Url;

/// Placeholder replaced by the article ID in `url-template`
pub const ID_PLACEHOLDER: &str = "{id}";

/// Main configuration structure for Archive-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub http: HttpConfig,
    pub output: OutputConfig,
}

/// ID range and cadence configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Last article ID to process (inclusive)
    #[serde(rename = "end-id")]
    pub end_id: u64,

    /// First article ID to process when no checkpoint exists
    #[serde(rename = "start-id", default)]
    pub start_id: Option<u64>,

    /// Number of buffered records that triggers a flush
    #[serde(rename = "batch-size")]
    pub batch_size: usize,

    /// Number of processed IDs between checkpoint writes and progress reports
    #[serde(rename = "checkpoint-interval")]
    pub checkpoint_interval: u64,

    /// Lower bound of the randomized delay between requests (milliseconds)
    #[serde(rename = "pacing-min-ms", default)]
    pub pacing_min_ms: u64,

    /// Upper bound of the randomized delay between requests (milliseconds)
    #[serde(rename = "pacing-max-ms", default)]
    pub pacing_max_ms: u64,
}

/// Source site configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Human-readable site name, used in logs
    pub name: String,

    /// Article URL with an `{id}` placeholder; without one the ID is appended
    #[serde(rename = "url-template")]
    pub url_template: String,

    /// Field selector profile for this site
    pub profile: ProfileConfig,
}

impl SourceConfig {
    /// Builds the article URL for the given ID
    ///
    /// Substitutes every `{id}` in the template, or appends the ID when the
    /// template has no placeholder.
    pub fn article_url(&self, id: u64) -> Result<Url, ConfigError> {
        let raw = if self.url_template.contains(ID_PLACEHOLDER) {
            self.url_template.replace(ID_PLACEHOLDER, &id.to_string())
        } else {
            format!("{}{}", self.url_template, id)
        };

        Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(format!("'{}': {}", raw, e)))
    }
}

/// Selector profile declaration: a built-in preset or custom field rules
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileConfig {
    /// Name of a built-in preset (`cnyes`, `cmoney`)
    #[serde(default)]
    pub preset: Option<String>,

    /// Custom per-field rules, keyed by field name
    #[serde(default)]
    pub fields: Option<BTreeMap<String, FieldConfig>>,

    /// Whether the last matched content node is dropped as page boilerplate
    #[serde(rename = "drop-trailing-content", default)]
    pub drop_trailing_content: Option<bool>,

    /// Value written when an optional tags field matches nothing
    #[serde(rename = "tags-placeholder", default)]
    pub tags_placeholder: Option<String>,
}

/// Rule for a single output field
#[derive(Debug, Clone, Deserialize)]
pub struct FieldConfig {
    /// CSS selectors tried in order; the first one with matches wins
    pub selectors: Vec<String>,

    /// Whether a missing match rejects the whole page
    #[serde(default = "default_required")]
    pub required: bool,

    /// Attribute to read instead of the element text
    #[serde(default)]
    pub attribute: Option<String>,
}

fn default_required() -> bool {
    true
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Total request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// User-agent pool; one is picked at random per request
    #[serde(rename = "user-agents", default)]
    pub user_agents: Vec<String>,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agents: Vec::new(),
        }
    }
}

/// Output table format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Sqlite,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Table format
    #[serde(default)]
    pub format: OutputFormat,

    /// Path to the output table (CSV file or SQLite database)
    pub path: String,

    /// Path to the checkpoint file
    #[serde(rename = "checkpoint-path")]
    pub checkpoint_path: String,

    /// Write a UTF-8 byte-order mark at the start of a new CSV file
    #[serde(rename = "byte-order-mark", default)]
    pub byte_order_mark: bool,
}
