//! Resource fetching client
//!
//! Dispatches on URL scheme: http/https through reqwest, `file:` reads from
//! disk, `about:` pages from the built-in table. Redirects are not followed
//! at this layer; the `Location` header is surfaced to the caller.

use std::time::Duration;

use log::{debug, info};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use url::Url;

use crate::error::{NetError, NetResult};
use crate::resources;
use crate::response::{Headers, Response};

/// Default user agent string
const DEFAULT_USER_AGENT: &str = concat!("Lammasu/", env!("CARGO_PKG_VERSION"));

/// Default timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client for fetching resources
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    /// Create a new client with default settings
    pub fn new() -> NetResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> NetResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| NetError::RequestFailed(e.to_string()))?;

        Ok(Self { client })
    }

    /// Fetch a URL, dispatching on its scheme
    pub async fn fetch(&self, url: &Url) -> NetResult<Response> {
        match url.scheme() {
            "http" | "https" => self.fetch_http(url).await,
            "file" => fetch_file(url).await,
            "about" => resources::builtin(url),
            other => Err(NetError::UnsupportedScheme(other.to_string())),
        }
    }

    async fn fetch_http(&self, url: &Url) -> NetResult<Response> {
        info!("Fetching: {}", url);

        let response = self.client.get(url.clone()).send().await?;

        let final_url = response.url().clone();
        let status = response.status().as_u16();

        debug!("Response status: {}", status);

        let headers: Headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let body = response.bytes().await?.to_vec();

        debug!("Received {} bytes", body.len());

        Ok(Response::new(final_url, status, headers, body))
    }
}

async fn fetch_file(url: &Url) -> NetResult<Response> {
    let path = url
        .to_file_path()
        .map_err(|_| NetError::InvalidUrl(format!("not a file path: {}", url)))?;

    debug!("Reading file: {}", path.display());

    let body = tokio::fs::read(&path).await?;
    Ok(Response::new(url.clone(), 200, Headers::new(), body))
}

/// Client configuration
pub struct ClientConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}
