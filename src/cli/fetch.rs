use anyhow::{bail, Context};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;
use url::Url;

use crate::cli::Cache;
use crate::TRACING_TARGET_FETCH;

/// Retrieves text over HTTP(S), going through the response [Cache].
///
/// `data:` URLs are decoded in place and never cached.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    cache: Cache,
}

impl Fetcher {
    pub fn new(cache: Cache) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;

        tracing::debug!(target: TRACING_TARGET_FETCH, cache_dir = %cache.dir().display(), "fetcher ready");
        Ok(Self { client, cache })
    }

    pub async fn fetch_text(&self, url: &Url) -> anyhow::Result<String> {
        if url.scheme() == "data" {
            return decode_data_url(url);
        }

        if let Some(content) = self.cache.load(url.as_str()).await {
            return Ok(content);
        }

        tracing::debug!(target: TRACING_TARGET_FETCH, url = %url, "requesting");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("failed to fetch {url}"))?
            .error_for_status()
            .with_context(|| format!("failed to fetch {url}"))?;
        let content = response
            .text()
            .await
            .with_context(|| format!("failed to read response body of {url}"))?;

        self.cache.store(url.as_str(), &content).await?;
        Ok(content)
    }
}

/// Decodes an inline `data:` URL, as emitted for inline source maps.
///
/// Supports `;base64` payloads and plain payloads; the media type is not checked.
fn decode_data_url(url: &Url) -> anyhow::Result<String> {
    let Some((meta, payload)) = url.as_str().strip_prefix("data:").and_then(|s| s.split_once(','))
    else {
        bail!("malformed data URL");
    };

    if meta.ends_with(";base64") {
        let bytes = STANDARD
            .decode(payload.trim())
            .context("malformed base64 payload in data URL")?;
        String::from_utf8(bytes).context("data URL payload is not UTF-8")
    } else {
        Ok(payload.to_owned())
    }
}
