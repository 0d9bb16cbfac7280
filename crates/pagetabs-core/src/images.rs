//! Page image download
//!
//! Fetches the image behind a tab's URI and decodes it. There is no cache
//! and no retry: a failed load is reported once and the page shows a
//! placeholder.

use std::time::Duration;

use bytes::{Bytes, BytesMut};
use image::DynamicImage;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, REFERER, USER_AGENT};
use reqwest::{Client, Proxy};
use url::Url;

use crate::config::ImageConfig;
use crate::{Error, Result};

const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// HTTP image fetcher
#[derive(Clone)]
pub struct ImageFetcher {
    client: Client,
    max_bytes: usize,
}

impl ImageFetcher {
    /// Create a new image fetcher with configuration
    pub fn new(config: &ImageConfig) -> Result<Self> {
        let client = Self::build_client(config.request_timeout_secs, &config.proxy_url)?;

        Ok(Self {
            client,
            max_bytes: config.max_bytes,
        })
    }

    /// Build HTTP client with optional proxy
    fn build_client(timeout_secs: u64, proxy_url: &Option<String>) -> Result<Client> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(10));

        if let Some(ref proxy) = proxy_url {
            let proxy = Proxy::all(proxy)
                .map_err(|e| Error::Config(format!("Invalid proxy URL: {}", e)))?;
            builder = builder.proxy(proxy);
            tracing::info!("Using HTTP proxy for image downloads");
        }

        builder.build().map_err(Error::Http)
    }

    /// Browser-like headers; some image hosts reject bare clients
    fn build_headers(url: &Url) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("image/avif,image/webp,image/png,image/jpeg,image/*;q=0.8"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        if let Some(host) = url.host_str() {
            if let Ok(referer) = HeaderValue::from_str(&format!("{}://{}/", url.scheme(), host)) {
                headers.insert(REFERER, referer);
            }
        }
        headers
    }

    /// Download raw image bytes
    pub async fn fetch_bytes(&self, url: &Url) -> Result<Bytes> {
        tracing::debug!("Fetching image from: {}", url);

        let mut response = self
            .client
            .get(url.clone())
            .headers(Self::build_headers(url))
            .send()
            .await?
            .error_for_status()?;

        if let Some(length) = response.content_length() {
            ensure_size(declared_size(length), self.max_bytes)?;
        }

        // Chunked bodies carry no length, so the cap is enforced while reading
        let mut body = BytesMut::new();
        while let Some(chunk) = response.chunk().await? {
            append_capped(&mut body, &chunk, self.max_bytes)?;
        }
        Ok(body.freeze())
    }

    /// Download and decode an image
    pub async fn fetch(&self, url: &Url) -> Result<DynamicImage> {
        let bytes = self.fetch_bytes(url).await?;
        let image = tokio::task::spawn_blocking(move || decode(&bytes))
            .await
            .map_err(|e| Error::Other(format!("Decode task failed: {}", e)))??;

        tracing::info!(
            "Loaded image {} ({}x{})",
            url,
            image.width(),
            image.height()
        );
        Ok(image)
    }
}

fn ensure_size(size: usize, limit: usize) -> Result<()> {
    if size > limit {
        return Err(Error::ImageTooLarge { size, limit });
    }
    Ok(())
}

/// Content-Length as usize; lengths past the address space saturate
fn declared_size(length: u64) -> usize {
    usize::try_from(length).unwrap_or(usize::MAX)
}

fn append_capped(body: &mut BytesMut, chunk: &[u8], limit: usize) -> Result<()> {
    ensure_size(body.len().saturating_add(chunk.len()), limit)?;
    body.extend_from_slice(chunk);
    Ok(())
}

/// Decode image bytes, detecting the format from content
pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
    if bytes.is_empty() {
        return Err(Error::Other("Empty image body".to_string()));
    }
    Ok(image::load_from_memory(bytes)?)
}
