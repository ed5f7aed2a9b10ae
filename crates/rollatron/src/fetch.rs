use anyhow::{Context, Result};
use mods::Druid;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Client for the repository's public object XML, with a local cache.
///
/// Records change rarely, so once downloaded a record is reused until the
/// caller forces a redownload. Only successful responses are cached; error
/// bodies never land in the cache.
pub struct MetadataFetcher {
    client: Client,
    purl_base: String,
    cache_dir: PathBuf,
}

impl MetadataFetcher {
    pub fn new(purl_base: &str, cache_dir: PathBuf) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            purl_base: purl_base.to_string(),
            cache_dir,
        }
    }

    fn cache_path(&self, druid: &Druid) -> PathBuf {
        self.cache_dir.join(format!("{druid}.xml"))
    }

    /// Object XML for `druid`, from cache or the repository.
    pub async fn fetch(&self, druid: &Druid, redownload: bool) -> Result<String> {
        let cache_path = self.cache_path(druid);
        if !redownload && cache_path.exists() {
            return std::fs::read_to_string(&cache_path)
                .with_context(|| format!("Failed to read cached XML {}", cache_path.display()));
        }

        let url = format!("{}{}.xml", self.purl_base, druid);
        info!("downloading {}", url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {url}"))?;

        if !response.status().is_success() {
            anyhow::bail!("{} returned status {}", url, response.status());
        }

        let xml = response
            .text()
            .await
            .with_context(|| format!("Failed to read body of {url}"))?;

        std::fs::create_dir_all(&self.cache_dir)?;
        std::fs::write(&cache_path, &xml)
            .with_context(|| format!("Failed to cache XML at {}", cache_path.display()))?;

        Ok(xml)
    }
}
