// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Web page fetching and text extraction for URL learning.
//!
//! Fetches a page over http/https, verifies the response is HTML,
//! renders it to plain text, and appends a `Source:` footer so learned
//! content keeps its provenance.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use tracing::debug;

use mnemo_config::model::ScraperConfig;
use mnemo_core::MnemoError;

/// Render width passed to the HTML-to-text conversion.
const RENDER_WIDTH: usize = 80;

/// Three or more consecutive newlines collapse to a paragraph break.
static EXCESS_BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("static regex"));

/// Fetches web pages and extracts their readable text.
pub struct Scraper {
    client: reqwest::Client,
    timeout: Duration,
}

impl Scraper {
    /// Creates a new scraper from configuration.
    pub fn new(config: &ScraperConfig) -> Result<Self, MnemoError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| MnemoError::Fetch {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            client,
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    /// Fetch `url` and return its readable text with a source footer.
    ///
    /// Fails on malformed URLs, non-http(s) schemes, HTTP errors, and
    /// responses that are not HTML.
    pub async fn fetch_text(&self, url: &str) -> Result<String, MnemoError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| MnemoError::Fetch {
            message: format!("invalid URL `{url}`: {e}"),
            source: Some(Box::new(e)),
        })?;

        let scheme = parsed.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(MnemoError::Fetch {
                message: format!("unsupported URL scheme `{scheme}`; only http and https work"),
                source: None,
            });
        }

        let response = self
            .client
            .get(parsed)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MnemoError::Timeout {
                        duration: self.timeout,
                    }
                } else {
                    MnemoError::Fetch {
                        message: format!("request to {url} failed: {e}"),
                        source: Some(Box::new(e)),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(MnemoError::Fetch {
                message: format!("{url} returned {status}"),
                source: None,
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !content_type.contains("text/html") {
            return Err(MnemoError::Fetch {
                message: format!("{url} is not an HTML page (content-type: {content_type})"),
                source: None,
            });
        }

        let html = response.text().await.map_err(|e| MnemoError::Fetch {
            message: format!("failed to read body of {url}: {e}"),
            source: Some(Box::new(e)),
        })?;

        let text = html2text::from_read(html.as_bytes(), RENDER_WIDTH).map_err(|e| {
            MnemoError::Fetch {
                message: format!("failed to extract text from {url}: {e}"),
                source: Some(Box::new(e)),
            }
        })?;
        let text = clean_text(&text);
        if text.is_empty() {
            return Err(MnemoError::Fetch {
                message: format!("{url} contained no readable text"),
                source: None,
            });
        }

        debug!(url, chars = text.len(), "page scraped");
        Ok(format!("{text}\n\nSource: {url}"))
    }
}

/// Collapse excessive blank lines and trim the edges.
fn clean_text(text: &str) -> String {
    EXCESS_BLANK_LINES
        .replace_all(text, "\n\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_scraper() -> Scraper {
        Scraper::new(&ScraperConfig::default()).unwrap()
    }

    #[test]
    fn clean_text_collapses_blank_runs() {
        let cleaned = clean_text("a\n\n\n\n\nb\n\nc\n");
        assert_eq!(cleaned, "a\n\nb\n\nc");
    }

    #[tokio::test]
    async fn malformed_url_is_rejected() {
        let err = test_scraper().fetch_text("not a url").await.unwrap_err();
        assert!(err.to_string().contains("invalid URL"), "got: {err}");
    }

    #[tokio::test]
    async fn non_http_scheme_is_rejected() {
        let err = test_scraper()
            .fetch_text("ftp://example.com/doc")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("scheme"), "got: {err}");
    }

    #[tokio::test]
    async fn html_page_is_converted_with_source_footer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(
                    "<html><body><h1>Title</h1><p>Body text.</p></body></html>",
                    "text/html; charset=utf-8",
                ),
            )
            .mount(&server)
            .await;

        let url = format!("{}/page", server.uri());
        let text = test_scraper().fetch_text(&url).await.unwrap();
        assert!(text.contains("Title"));
        assert!(text.contains("Body text."));
        assert!(text.ends_with(&format!("Source: {url}")));
    }

    #[tokio::test]
    async fn non_html_content_type_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(r#"{"not": "html"}"#, "application/json"),
            )
            .mount(&server)
            .await;

        let url = format!("{}/data.json", server.uri());
        let err = test_scraper().fetch_text(&url).await.unwrap_err();
        assert!(err.to_string().contains("not an HTML page"), "got: {err}");
    }

    #[tokio::test]
    async fn http_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let url = format!("{}/missing", server.uri());
        let err = test_scraper().fetch_text(&url).await.unwrap_err();
        assert!(err.to_string().contains("404"), "got: {err}");
    }

    #[tokio::test]
    async fn empty_page_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/empty"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("<html><body></body></html>", "text/html"),
            )
            .mount(&server)
            .await;

        let url = format!("{}/empty", server.uri());
        let err = test_scraper().fetch_text(&url).await.unwrap_err();
        assert!(err.to_string().contains("no readable text"), "got: {err}");
    }
}
