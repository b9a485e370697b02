use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use super::models::{Thread, ThreadsPage};
use crate::config::{ApiMode, Config};

const PROVIDER_HEADER: &str = "x-nylas-provider-gma";
const EMAIL_HEADER: &str = "x-nylas-email-address";
const GRANT_HEADER: &str = "x-nylas-grant-id";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid threads URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("base URL cannot carry a path: {0}")]
    CannotBeABase(String),
    #[error("invalid value for header {name}")]
    InvalidHeader {
        name: &'static str,
        #[source]
        source: reqwest::header::InvalidHeaderValue,
    },
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("threads request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("failed to decode threads page: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Every thread collected by [`ThreadFetcher::fetch_all`], in fetch order.
#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    pub threads: Vec<Thread>,
    pub pages_fetched: usize,
    /// The page cap was hit while the server still offered another page.
    pub truncated: bool,
}

/// Walks the cursor-paginated threads listing of a single grant.
#[derive(Debug, Clone)]
pub struct ThreadFetcher {
    http: reqwest::Client,
    endpoint: Url,
    max_pages: usize,
}

impl ThreadFetcher {
    /// Build a fetcher for the endpoint and credentials described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint URL cannot be built, a credential is
    /// not a valid header value, or the HTTP client cannot be created.
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let endpoint = threads_endpoint(config)?;

        let mut builder = reqwest::Client::builder().default_headers(auth_headers(config)?);
        if let Some(timeout) = config.http_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(FetchError::Client)?;

        Ok(Self {
            http,
            endpoint,
            max_pages: config.max_pages.max(1),
        })
    }

    /// The listing URL of the first page, without a page token.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetch pages until the cursor runs out or the page cap is reached.
    ///
    /// # Errors
    ///
    /// Any failed request, non-success status or undecodable page aborts the
    /// whole walk; threads from earlier pages are discarded.
    pub async fn fetch_all(&self) -> Result<FetchOutcome, FetchError> {
        let mut threads = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages_fetched = 0;

        loop {
            let page = self.fetch_page(cursor.as_deref()).await?;
            pages_fetched += 1;

            let next = page.next_cursor().map(ToString::to_string);
            debug!(
                page = pages_fetched,
                threads = page.data.len(),
                has_more = next.is_some(),
                "Fetched threads page"
            );
            threads.extend(page.data);

            match next {
                None => {
                    return Ok(FetchOutcome {
                        threads,
                        pages_fetched,
                        truncated: false,
                    });
                }
                Some(_) if pages_fetched >= self.max_pages => {
                    warn!(
                        max_pages = self.max_pages,
                        threads = threads.len(),
                        "Page cap reached with more pages remaining, listing is truncated"
                    );
                    return Ok(FetchOutcome {
                        threads,
                        pages_fetched,
                        truncated: true,
                    });
                }
                Some(next) => cursor = Some(next),
            }
        }
    }

    async fn fetch_page(&self, cursor: Option<&str>) -> Result<ThreadsPage, FetchError> {
        let mut url = self.endpoint.clone();
        if let Some(token) = cursor {
            url.query_pairs_mut().append_pair("page_token", token);
        }

        info!(url = %url, "Requesting threads page");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        info!(status = %status, "Response received");

        let body = response.text().await.map_err(FetchError::Transport)?;
        if !status.is_success() {
            return Err(FetchError::Status { status, body });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Listing URL for the configured mode, with `limit` and `in` applied.
fn threads_endpoint(config: &Config) -> Result<Url, FetchError> {
    let mut url = Url::parse(&config.api_base_url)?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|()| FetchError::CannotBeABase(config.api_base_url.clone()))?;
        segments.pop_if_empty().push("v3");
        if config.api_mode == ApiMode::Remote {
            segments.extend(["grants", config.grant_id.as_str()]);
        }
        segments.push("threads");
    }

    let folder = config.thread_folder.as_deref().filter(|f| !f.is_empty());
    if config.thread_limit != 0 || folder.is_some() {
        let mut query = url.query_pairs_mut();
        if config.thread_limit != 0 {
            query.append_pair("limit", &config.thread_limit.to_string());
        }
        if let Some(folder) = folder {
            query.append_pair("in", folder);
        }
    }

    Ok(url)
}

fn auth_headers(config: &Config) -> Result<HeaderMap, FetchError> {
    let mut headers = HeaderMap::new();
    match config.api_mode {
        ApiMode::Remote => {
            let key = config.api_key.as_deref().unwrap_or_default();
            let mut value = header_value("authorization", &format!("Bearer {key}"))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        ApiMode::Local => {
            let email = config.email_address.as_deref().unwrap_or_default();
            for (name, value) in [
                (PROVIDER_HEADER, config.provider.as_str()),
                (EMAIL_HEADER, email),
                (GRANT_HEADER, config.grant_id.as_str()),
            ] {
                headers.insert(HeaderName::from_static(name), header_value(name, value)?);
            }
        }
    }
    Ok(headers)
}

fn header_value(name: &'static str, value: &str) -> Result<HeaderValue, FetchError> {
    HeaderValue::from_str(value).map_err(|source| FetchError::InvalidHeader { name, source })
}
