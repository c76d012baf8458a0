//! Page fetching and HTML text extraction
//!
//! The engine only sees plain text. This module turns a URL into that text:
//! fetch with a browser user agent, drop scripts, styles and markup, decode
//! entities and collapse whitespace.

use std::time::Duration;

use compliance_engine::SourceError;
use html_escape::decode_html_entities;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::{Client, Url};
use tracing::{debug, info};

/// Browser user agent; some hosts refuse unknown clients
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

lazy_static! {
    static ref HIDDEN_BLOCK: Regex =
        Regex::new(r"(?is)<(script|style|noscript)\b[^>]*>.*?</(script|style|noscript)\s*>").unwrap();
    static ref COMMENT: Regex = Regex::new(r"(?s)<!--.*?-->").unwrap();
    // A bare `<` followed by a digit or space is text, not markup
    static ref TAG: Regex = Regex::new(r"<[A-Za-z!/?][^>]*>").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref TITLE: Regex = Regex::new(r"(?is)<title\b[^>]*>(.*?)</title\s*>").unwrap();
}

/// Plain text of a fetched page
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPage {
    pub url: String,
    pub title: Option<String>,
    pub text: String,
}

/// HTTP client for advertising pages
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    timeout: Duration,
}

impl PageFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .gzip(true)
            .build()?;
        Ok(Self { client, timeout })
    }

    /// Fetcher that ignores proxy settings, for loopback test servers
    #[cfg(test)]
    pub fn direct() -> Self {
        let timeout = Duration::from_secs(5);
        let client = Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()
            .expect("Failed to build test client");
        Self { client, timeout }
    }

    /// Fetch `url` and extract its visible text
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, SourceError> {
        let parsed = parse_url(url)?;
        info!("Fetching {}", parsed);

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| self.map_error(url, e))?
            .error_for_status()
            .map_err(|e| self.map_error(url, e))?;

        let html = response.text().await.map_err(|e| self.map_error(url, e))?;
        debug!("Fetched {} bytes from {}", html.len(), url);

        let text = extract_text(&html);
        if text.is_empty() {
            return Err(SourceError::EmptyDocument {
                url: url.to_string(),
            });
        }

        Ok(FetchedPage {
            url: url.to_string(),
            title: extract_title(&html),
            text,
        })
    }

    fn map_error(&self, url: &str, err: reqwest::Error) -> SourceError {
        if err.is_timeout() {
            SourceError::Timeout {
                url: url.to_string(),
                seconds: self.timeout.as_secs(),
            }
        } else if let Some(status) = err.status() {
            SourceError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            }
        } else {
            SourceError::Transport {
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }
}

impl Default for PageFetcher {
    fn default() -> Self {
        Self {
            client: Client::new(),
            timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }
}

/// Accept absolute http(s) URLs only
pub fn parse_url(url: &str) -> Result<Url, SourceError> {
    let invalid = || SourceError::InvalidUrl(url.to_string());
    let parsed = Url::parse(url.trim()).map_err(|_| invalid())?;
    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(parsed),
        _ => Err(invalid()),
    }
}

/// Visible text of an HTML document, whitespace-normalized
pub fn extract_text(html: &str) -> String {
    let text = HIDDEN_BLOCK.replace_all(html, " ");
    let text = COMMENT.replace_all(&text, " ");
    let text = TAG.replace_all(&text, " ");
    normalize(&decode_html_entities(&text))
}

/// Contents of `<title>`, if any
pub fn extract_title(html: &str) -> Option<String> {
    TITLE
        .captures(html)
        .map(|caps| normalize(&decode_html_entities(&caps[1])))
        .filter(|title| !title.is_empty())
}

fn normalize(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}
