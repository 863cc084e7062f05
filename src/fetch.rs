use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::future::join_all;
use tracing::warn;

const USER_AGENT: &str = "kmap-scraper/0.1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Extensions accepted for photo candidates. Anything else is dropped at the
/// fetch layer, including HTML error pages served with a 200.
const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "webp", "svg"];

/// A downloaded, validated image.
#[derive(Debug, Clone)]
pub struct ImageBlob {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageBlob {
    pub fn extension(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or("")
    }
}

/// Retrieves raw pages and photo candidates over one shared session.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn get_html(&self, url: &str) -> Result<String>;

    /// A candidate that fails to resolve to a valid image yields `None`;
    /// the failure is never fatal here.
    async fn fetch_image(&self, url: &str) -> Option<ImageBlob>;
}

/// Download all candidates concurrently, keeping accepted blobs in candidate
/// order. The caller compares the accepted count against the candidate count
/// to classify partial failures.
pub async fn fetch_images(fetcher: &dyn PageFetcher, urls: &[String]) -> Vec<ImageBlob> {
    let downloads = urls.iter().map(|url| fetcher.fetch_image(url));
    join_all(downloads).await.into_iter().flatten().collect()
}

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("build http client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn get_html(&self, url: &str) -> Result<String> {
        let res = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("fetch {url}"))?
            .error_for_status()
            .with_context(|| format!("fetch {url}"))?;
        res.text().await.with_context(|| format!("read body of {url}"))
    }

    async fn fetch_image(&self, url: &str) -> Option<ImageBlob> {
        if url::Url::parse(url).is_err() {
            warn!("unparseable photo url: {}", url);
            return None;
        }

        let res = match self.client.get(url).send().await {
            Ok(res) => res,
            Err(e) => {
                warn!("photo fetch failed for {}: {}", url, e);
                return None;
            }
        };
        if !res.status().is_success() {
            warn!("photo fetch returned {} for {}", res.status(), url);
            return None;
        }

        let content_type = res
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
            .unwrap_or_default();

        let bytes = match res.bytes().await {
            Ok(b) => b.to_vec(),
            Err(e) => {
                warn!("photo body read failed for {}: {}", url, e);
                return None;
            }
        };

        validate_image(url, &content_type, bytes)
    }
}

/// Apply the photo acceptance rules: no HTML, only image (or octet-stream)
/// content types, and only whitelisted file extensions.
pub fn validate_image(url: &str, content_type: &str, bytes: Vec<u8>) -> Option<ImageBlob> {
    if content_type == "text/html" {
        warn!("HTML was returned instead of an image: {}", url);
        return None;
    }
    if !content_type.starts_with("image") && content_type != "application/octet-stream" {
        return None;
    }

    let name = file_name_of(url);
    let ext = name.rsplit('.').next().unwrap_or("").to_ascii_lowercase();
    if !name.contains('.') || !IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        return None;
    }

    Some(ImageBlob {
        name,
        content_type: content_type.to_string(),
        bytes,
    })
}

/// Last path segment of the URL, without query/fragment, percent-decoded.
fn file_name_of(url: &str) -> String {
    let raw = url
        .rsplit('/')
        .next()
        .unwrap_or("file")
        .split('?')
        .next()
        .unwrap_or("file")
        .split('#')
        .next()
        .unwrap_or("file");
    let raw = if raw.is_empty() { "file" } else { raw };
    urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}
