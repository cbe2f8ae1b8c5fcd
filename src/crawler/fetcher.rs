//! HTTP fetcher implementation
//!
//! One GET per article ID. Every way a request can go wrong collapses into a
//! `FetchFailure`; nothing here retries, and nothing here returns an error to
//! the caller.

use crate::config::HttpConfig;
use rand::seq::IndexedRandom;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use std::fmt;
use std::time::Duration;

/// Browser user agents rotated when the config provides none
pub const DEFAULT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36 Edg/124.0.0.0",
];

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchOutcome {
    /// Successfully fetched the page
    Fetched {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// No usable response
    Failed(FetchFailure),
}

/// Why a fetch produced no body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// Non-2xx status code
    Status(u16),

    /// Request or body read timed out
    Timeout,

    /// Connection, DNS, TLS or redirect error
    Network(String),

    /// Response body could not be read or decoded
    Body(String),
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "HTTP {}", code),
            Self::Timeout => f.write_str("request timeout"),
            Self::Network(error) => write!(f, "network error: {}", error),
            Self::Body(error) => write!(f, "body error: {}", error),
        }
    }
}

/// Builds the HTTP client shared by every request of a run
///
/// The user agent is set per request, not on the client.
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Picks a user agent uniformly at random from the pool
///
/// Falls back to [`DEFAULT_USER_AGENTS`] when the pool is empty.
pub fn pick_user_agent(pool: &[String]) -> &str {
    let mut rng = rand::rng();
    if let Some(agent) = pool.choose(&mut rng) {
        return agent;
    }
    DEFAULT_USER_AGENTS
        .choose(&mut rng)
        .copied()
        .unwrap_or(DEFAULT_USER_AGENTS[0])
}

/// Fetches one article page
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The article URL
/// * `user_agents` - Pool to draw the `User-Agent` header from
///
/// # Returns
///
/// `FetchOutcome::Fetched` with the body for a 2xx response, otherwise the
/// failure that stopped the request.
pub async fn fetch_page(client: &Client, url: &str, user_agents: &[String]) -> FetchOutcome {
    let response = match client
        .get(url)
        .header(USER_AGENT, pick_user_agent(user_agents))
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => return FetchOutcome::Failed(classify_error(&e)),
    };

    let status = response.status();
    if !status.is_success() {
        return FetchOutcome::Failed(FetchFailure::Status(status.as_u16()));
    }

    let final_url = response.url().to_string();

    match response.text().await {
        Ok(body) => FetchOutcome::Fetched {
            final_url,
            status_code: status.as_u16(),
            body,
        },
        Err(e) if e.is_timeout() => FetchOutcome::Failed(FetchFailure::Timeout),
        Err(e) => FetchOutcome::Failed(FetchFailure::Body(e.to_string())),
    }
}

/// Maps a transport error to a failure
fn classify_error(error: &reqwest::Error) -> FetchFailure {
    if error.is_timeout() {
        FetchFailure::Timeout
    } else if error.is_connect() {
        FetchFailure::Network(format!("connection failed: {}", error))
    } else {
        FetchFailure::Network(error.to_string())
    }
}
