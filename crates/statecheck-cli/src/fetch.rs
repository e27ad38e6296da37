//! Single-shot HTTP fetcher wrapping reqwest.
//!
//! Not a browser and not a crawler: one GET, no redirects followed, no
//! retries. The response is drained fully into memory and handed to the
//! classification engine as one text blob.

use std::time::Duration;

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

const USER_AGENT: &str = concat!("statecheck/", env!("CARGO_PKG_VERSION"));

/// Errors from the fetch stage. All of them are terminal.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Error while making request to {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// A fetched page: status, every response header, and the full body.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Requested URL.
    pub url: String,
    /// HTTP status code.
    pub status: u16,
    /// Response headers in arrival order, names lowercased.
    pub headers: Vec<(String, String)>,
    /// Response body as text.
    pub body: String,
}

impl FetchedPage {
    /// Build the text the engine classifies.
    ///
    /// With `include_cookies`, each `Set-Cookie` response header is rendered
    /// verbatim as a `Set-Cookie: value` line ahead of the body, separated by
    /// a blank line. No other header is included: values such as
    /// `Content-Type: text/html` would otherwise read as resource paths.
    pub fn document(&self, include_cookies: bool) -> String {
        let cookies: Vec<&str> = if include_cookies {
            self.set_cookies().collect()
        } else {
            Vec::new()
        };
        if cookies.is_empty() {
            return self.body.clone();
        }

        let mut doc = String::with_capacity(self.body.len() + cookies.len() * 64);
        for value in cookies {
            doc.push_str("Set-Cookie: ");
            doc.push_str(value);
            doc.push('\n');
        }
        doc.push('\n');
        doc.push_str(&self.body);
        doc
    }

    /// Values of every `Set-Cookie` header, in arrival order.
    pub fn set_cookies(&self) -> impl Iterator<Item = &str> {
        self.headers
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case("set-cookie"))
            .map(|(_, value)| value.as_str())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Check that `raw` is an absolute http(s) URL.
pub fn parse_target(raw: &str) -> Result<url::Url, FetchError> {
    let parsed = url::Url::parse(raw.trim()).map_err(|e| FetchError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(FetchError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

/// HTTP client for the single page fetch.
#[derive(Clone)]
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    /// Create a fetcher that never follows redirects.
    pub fn new(timeout_ms: u64) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(USER_AGENT)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { client })
    }

    /// Perform one GET and drain the body.
    ///
    /// Non-2xx responses are returned, not treated as errors; their bodies are
    /// still classifiable.
    pub async fn fetch(&self, raw_url: &str) -> Result<FetchedPage, FetchError> {
        let url = parse_target(raw_url)?;
        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        tracing::info!("GET {url}");
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(transport)?;

        let status = resp.status().as_u16();
        let headers: Vec<(String, String)> = resp
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), String::from_utf8_lossy(v.as_bytes()).into_owned()))
            .collect();

        let body = resp.text().await.map_err(transport)?;

        let page = FetchedPage {
            url: raw_url.to_string(),
            status,
            headers,
            body,
        };

        if !page.is_success() {
            tracing::warn!("{} answered with status {}", page.url, page.status);
        }
        tracing::debug!(
            "fetched {} bytes and {} headers from {}",
            page.body.len(),
            page.headers.len(),
            page.url
        );

        Ok(page)
    }
}
