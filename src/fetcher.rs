use std::future::Future;
use std::time::Duration;

use scraper::{Html, Selector};
use tracing::{debug, error, instrument, warn};

use crate::config::Config;
use crate::fetch_error::FetchError;
use crate::refresh::FetchResult;

/// Anything that can produce a gas price reading on demand.
///
/// The scheduler only depends on this trait, so tests can substitute a
/// source that never touches the network.
pub trait PriceSource: Send + Sync + 'static {
    fn fetch(&self) -> impl Future<Output = FetchResult> + Send;
}

/// Scrapes the gas price out of an HTML page.
#[derive(Clone)]
pub struct GasPriceFetcher {
    client: reqwest::Client,
    url: String,
    selector: String,
}

impl GasPriceFetcher {
    pub fn new(url: String, selector: String, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            url,
            selector,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        Self::new(
            config.url.clone(),
            config.selector.clone(),
            config.request_timeout(),
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    #[instrument(skip(self), fields(url = %self.url, selector = %self.selector))]
    pub async fn fetch_price(&self) -> Result<String, FetchError> {
        let url = reqwest::Url::parse(&self.url).map_err(|e| {
            error!("Configured URL is not valid: {}", e);
            FetchError::InvalidUrl(self.url.clone())
        })?;

        debug!("Sending HTTP request to gas tracker");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        debug!("Received HTTP response with status: {}", status);

        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await?;
        let html = String::from_utf8(body.to_vec()).map_err(|e| {
            warn!("Response body is not valid UTF-8: {}", e);
            FetchError::InvalidData
        })?;
        debug!("Retrieved HTML content, size: {} bytes", html.len());

        parse_price(&html, &self.selector)
    }
}

impl PriceSource for GasPriceFetcher {
    async fn fetch(&self) -> FetchResult {
        self.fetch_price().await.into()
    }
}

/// Extract the trimmed text of the first element matching `selector`.
///
/// Text nodes are concatenated as they appear in the markup, then whitespace
/// runs collapse to a single space.
#[instrument(skip(html), fields(html_size = html.len()))]
pub fn parse_price(html: &str, selector: &str) -> Result<String, FetchError> {
    let selector =
        Selector::parse(selector).map_err(|e| FetchError::ParseError(format!("{e:?}")))?;

    debug!("Parsing HTML document");
    let document = Html::parse_document(html);

    let element = document.select(&selector).next().ok_or_else(|| {
        warn!("No element matched the gas price selector");
        debug!(
            "HTML preview (first 500 chars): {}",
            &html.chars().take(500).collect::<String>()
        );
        FetchError::ElementNotFound
    })?;

    let text = element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    if text.is_empty() {
        return Err(FetchError::EmptyElement);
    }

    debug!("Extracted gas price text: {}", text);
    Ok(text)
}
