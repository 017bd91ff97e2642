//! Batch download of release assets listed in a manifest.
use async_trait::async_trait;
use log::*;
use url::Url;

use crate::{
    error::ReleaseToolError,
    manifest::{self, Manifest},
    result::Result,
};

/// Release-download endpoint for the CTP7 modules project. The trailing
/// slash matters: tag and asset segments are joined onto it.
pub const DOWNLOAD_BASE_URL: &str =
    "https://github.com/cms-gem-daq-project/ctp7_modules/releases/download/";

/// Abstraction over HTTP retrieval so the download loop can be tested
/// without a network.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Fetch the full body behind a URL. Non-success statuses are errors.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// [`AssetSource`] backed by a reqwest client.
pub struct HttpAssetSource {
    client: reqwest::Client,
}

impl HttpAssetSource {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpAssetSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AssetSource for HttpAssetSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ReleaseToolError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// Settings for a fetch run, captured once at startup.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    pub base_url: String,
    pub mod_root: Option<String>,
}

impl FetcherConfig {
    /// Fixed download endpoint plus the current `CTP7_MOD_ROOT` value.
    pub fn from_env() -> Self {
        Self {
            base_url: DOWNLOAD_BASE_URL.to_string(),
            mod_root: std::env::var(manifest::MOD_ROOT_VAR).ok(),
        }
    }
}

/// Outcome counts for a batch of downloads.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FetchSummary {
    pub attempted: usize,
    pub failed: usize,
}

/// Downloads every asset named in a manifest, one entry at a time.
pub struct AssetFetcher {
    base_url: Url,
    mod_root: Option<String>,
    source: Box<dyn AssetSource>,
}

impl AssetFetcher {
    pub fn new(
        config: FetcherConfig,
        source: Box<dyn AssetSource>,
    ) -> Result<Self> {
        Ok(Self {
            base_url: Url::parse(&config.base_url)?,
            mod_root: config.mod_root,
            source,
        })
    }

    /// Attempt to download every manifest entry, writing each body to its
    /// resolved destination and overwriting existing files. A failed
    /// download is logged and skipped so the batch never stops early; a
    /// failure writing to disk aborts the run. No retries and no
    /// integrity verification of the downloaded bytes.
    pub async fn fetch_all(
        &self,
        tag: &str,
        manifest: &Manifest,
    ) -> Result<FetchSummary> {
        let mut summary = FetchSummary::default();

        for entry in manifest.entries() {
            let url = self.asset_url(tag, &entry.name)?;
            let destination = manifest::resolve_destination(
                &entry.path,
                self.mod_root.as_deref(),
            )?;

            summary.attempted += 1;
            info!("downloading {url}");

            match self.source.fetch(url.as_str()).await {
                Ok(body) => {
                    tokio::fs::write(&destination, body).await?;
                }
                Err(err) => {
                    error!("failed to download {url}: {err:#}");
                    summary.failed += 1;
                }
            }
        }

        if summary.failed > 0 {
            warn!(
                "{} of {} downloads failed",
                summary.failed, summary.attempted
            );
        }

        Ok(summary)
    }

    fn asset_url(&self, tag: &str, asset: &str) -> Result<Url> {
        Ok(self.base_url.join(&format!("{tag}/{asset}"))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    fn fetcher_for(
        dir: &std::path::Path,
        source: MockAssetSource,
    ) -> AssetFetcher {
        let config = FetcherConfig {
            base_url: "https://example.com/releases/download/".to_string(),
            mod_root: Some(dir.display().to_string()),
        };
        AssetFetcher::new(config, Box::new(source)).unwrap()
    }

    #[test_log::test(tokio::test)]
    async fn attempts_every_entry_despite_failures() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = Manifest::parse(
            r#"{
                "first.tgz": "$CTP7_MOD_ROOT/first.tgz",
                "second.tgz": "$CTP7_MOD_ROOT/second.tgz"
            }"#,
        )
        .unwrap();

        let mut source = MockAssetSource::new();
        source
            .expect_fetch()
            .with(eq("https://example.com/releases/download/v1.0/first.tgz"))
            .times(1)
            .returning(|url| {
                Err(ReleaseToolError::DownloadFailed {
                    url: url.to_string(),
                    status: 404,
                }
                .into())
            });
        source
            .expect_fetch()
            .with(eq(
                "https://example.com/releases/download/v1.0/second.tgz",
            ))
            .times(1)
            .returning(|_| Ok(b"payload".to_vec()));

        let fetcher = fetcher_for(dir.path(), source);
        let summary = fetcher.fetch_all("v1.0", &manifest).await.unwrap();

        assert_eq!(summary.attempted, 2);
        assert_eq!(summary.failed, 1);
        assert!(!dir.path().join("first.tgz").exists());
        assert_eq!(
            std::fs::read(dir.path().join("second.tgz")).unwrap(),
            b"payload"
        );
    }

    #[test_log::test(tokio::test)]
    async fn substitutes_mod_root_into_destination() {
        let dir = tempfile::tempdir().unwrap();
        let manifest =
            Manifest::parse(r#"{"a.txt": "$CTP7_MOD_ROOT/a.txt"}"#).unwrap();

        let mut source = MockAssetSource::new();
        source
            .expect_fetch()
            .times(1)
            .returning(|_| Ok(b"contents".to_vec()));

        let fetcher = fetcher_for(dir.path(), source);
        fetcher.fetch_all("v1.0", &manifest).await.unwrap();

        assert_eq!(
            std::fs::read_to_string(dir.path().join("a.txt")).unwrap(),
            "contents"
        );
    }

    #[test_log::test(tokio::test)]
    async fn overwrites_existing_destination() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("a.txt");
        std::fs::write(&destination, "stale").unwrap();

        let manifest =
            Manifest::parse(r#"{"a.txt": "$CTP7_MOD_ROOT/a.txt"}"#).unwrap();

        let mut source = MockAssetSource::new();
        source
            .expect_fetch()
            .times(1)
            .returning(|_| Ok(b"fresh".to_vec()));

        let fetcher = fetcher_for(dir.path(), source);
        fetcher.fetch_all("v1.0", &manifest).await.unwrap();

        assert_eq!(std::fs::read_to_string(&destination).unwrap(), "fresh");
    }

    #[test_log::test(tokio::test)]
    async fn destinations_without_placeholder_are_used_directly() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("direct.txt");
        let manifest = Manifest::parse(&format!(
            r#"{{"direct.txt": "{}"}}"#,
            destination.display()
        ))
        .unwrap();

        let mut source = MockAssetSource::new();
        source
            .expect_fetch()
            .times(1)
            .returning(|_| Ok(b"direct".to_vec()));

        let config = FetcherConfig {
            base_url: "https://example.com/releases/download/".to_string(),
            mod_root: None,
        };
        let fetcher = AssetFetcher::new(config, Box::new(source)).unwrap();
        fetcher.fetch_all("v1.0", &manifest).await.unwrap();

        assert_eq!(
            std::fs::read_to_string(&destination).unwrap(),
            "direct"
        );
    }

    #[test_log::test(tokio::test)]
    async fn unresolvable_placeholder_aborts_the_run() {
        let manifest =
            Manifest::parse(r#"{"a.txt": "$CTP7_MOD_ROOT/a.txt"}"#).unwrap();

        let mut source = MockAssetSource::new();
        source.expect_fetch().times(0);

        let config = FetcherConfig {
            base_url: "https://example.com/releases/download/".to_string(),
            mod_root: None,
        };
        let fetcher = AssetFetcher::new(config, Box::new(source)).unwrap();

        assert!(fetcher.fetch_all("v1.0", &manifest).await.is_err());
    }

    #[test]
    fn builds_download_urls_from_tag_and_asset() {
        let source = MockAssetSource::new();
        let config = FetcherConfig {
            base_url: DOWNLOAD_BASE_URL.to_string(),
            mod_root: None,
        };
        let fetcher = AssetFetcher::new(config, Box::new(source)).unwrap();

        let url = fetcher.asset_url("v3.2.2", "module.tgz").unwrap();
        assert_eq!(
            url.as_str(),
            "https://github.com/cms-gem-daq-project/ctp7_modules/releases/download/v3.2.2/module.tgz"
        );
    }
}
