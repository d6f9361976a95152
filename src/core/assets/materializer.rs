//! Asset materializer
//!
//! Turns the set of remote URLs referenced by a dataset into the run's
//! [`ImageCache`] under bounded concurrency. Batches of [`ASSET_BATCH_SIZE`]
//! are issued concurrently and awaited as a whole before the next batch
//! starts, so total in-flight requests never exceed the batch size. A
//! failing asset is logged and left absent; it never aborts the batch or
//! the run.

use super::cache::ImageCache;
use crate::adapters::assets::AssetSource;
use crate::domain::{BlockPayload, EncodedImage, ExportDataset, KaryaError, Result};
use futures::future::join_all;
use std::collections::HashSet;
use tokio::sync::watch;

/// Fixed concurrency bound for asset fetches
pub const ASSET_BATCH_SIZE: usize = 5;

/// Accounting for one materialization pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaterializeStats {
    /// Distinct URLs handed to the pass
    pub requested: usize,

    /// Fetches that succeeded and were cached
    pub resolved: usize,

    /// Fetches that failed (absent cache entries)
    pub failed: usize,

    /// URLs skipped because they were already attempted this run
    pub skipped: usize,
}

/// Collect the distinct asset URLs referenced by a dataset
///
/// Covers every user avatar, every portfolio thumbnail, the URL of every
/// image content block, and the fixed branding asset. Order follows first
/// appearance in the dataset; each URL appears exactly once no matter how
/// often the dataset references it.
pub fn collect_asset_urls(dataset: &ExportDataset, branding_url: Option<&str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut urls = Vec::new();
    let mut push = |url: &str| {
        if !url.is_empty() && seen.insert(url.to_string()) {
            urls.push(url.to_string());
        }
    };

    if let Some(branding) = branding_url {
        push(branding);
    }

    for portfolio in &dataset.portfolios {
        if let Some(avatar) = &portfolio.user.avatar_url {
            push(avatar);
        }
        if let Some(thumbnail) = &portfolio.thumbnail_url {
            push(thumbnail);
        }
        for block in &portfolio.content_blocks {
            if let BlockPayload::Image { url, .. } = &block.payload {
                push(url);
            }
        }
    }

    urls
}

/// Fetch all URLs into the cache in sequential bounded batches
///
/// URLs already present in `cache` or listed in `already_attempted` are
/// skipped, keeping the at-most-one-fetch-per-URL-per-run guarantee even
/// when an earlier stage (branding) touched a URL first. The shutdown
/// signal is checked between batches; in-flight fetches of the current
/// batch are always awaited.
pub async fn materialize_images<F>(
    source: &dyn AssetSource,
    urls: &[String],
    cache: &mut ImageCache,
    already_attempted: &HashSet<String>,
    shutdown: &watch::Receiver<bool>,
    mut after_batch: F,
) -> Result<MaterializeStats>
where
    F: FnMut(usize, usize),
{
    let mut stats = MaterializeStats {
        requested: urls.len(),
        ..Default::default()
    };

    let pending: Vec<&String> = urls
        .iter()
        .filter(|url| !cache.contains(url) && !already_attempted.contains(*url))
        .collect();
    stats.skipped = urls.len() - pending.len();

    let total_batches = pending.len().div_ceil(ASSET_BATCH_SIZE);

    for (batch_index, batch) in pending.chunks(ASSET_BATCH_SIZE).enumerate() {
        if *shutdown.borrow() {
            tracing::info!(
                completed_batches = batch_index,
                total_batches = total_batches,
                "Asset materialization cancelled between batches"
            );
            return Err(KaryaError::Cancelled);
        }

        tracing::debug!(
            batch = batch_index + 1,
            total_batches = total_batches,
            batch_size = batch.len(),
            "Fetching asset batch"
        );

        let fetches = batch.iter().map(|url| async move {
            let result = source.fetch(url).await;
            (url.as_str(), result)
        });

        for (url, result) in join_all(fetches).await {
            match result {
                Ok(asset) => {
                    cache.insert(url, EncodedImage::from_bytes(asset.media_type, &asset.bytes));
                    stats.resolved += 1;
                }
                Err(e) => {
                    // non-fatal by contract: absent entry, run continues
                    tracing::warn!(url = %url, error = %e, "Failed to fetch asset, skipping");
                    stats.failed += 1;
                }
            }
        }

        after_batch(batch_index + 1, total_batches);
    }

    tracing::info!(
        requested = stats.requested,
        resolved = stats.resolved,
        failed = stats.failed,
        skipped = stats.skipped,
        "Asset materialization finished"
    );

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::assets::FetchedAsset;
    use crate::domain::errors::AssetError;
    use crate::domain::{
        ContentBlockExportItem, PortfolioExportItem, SeriesId, SeriesInfo, UserExportInfo,
    };
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FakeSource {
        fail_urls: HashSet<String>,
        fetched: Mutex<Vec<String>>,
        max_in_flight: AtomicUsize,
        in_flight: AtomicUsize,
    }

    impl FakeSource {
        fn new(fail_urls: &[&str]) -> Self {
            Self {
                fail_urls: fail_urls.iter().map(|s| s.to_string()).collect(),
                fetched: Mutex::new(Vec::new()),
                max_in_flight: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
            }
        }

        fn fetch_count(&self) -> usize {
            self.fetched.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl AssetSource for FakeSource {
        async fn fetch(&self, url: &str) -> std::result::Result<FetchedAsset, AssetError> {
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(current, Ordering::SeqCst);
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            self.fetched.lock().unwrap().push(url.to_string());
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.fail_urls.contains(url) {
                return Err(AssetError::Status {
                    status: 404,
                    url: url.to_string(),
                });
            }
            Ok(FetchedAsset {
                media_type: "image/png".to_string(),
                bytes: b"img".to_vec(),
            })
        }
    }

    fn dataset_with_shared_avatar() -> ExportDataset {
        let avatar = Some("https://cdn.example/avatar.png".to_string());
        let user = |username: &str| UserExportInfo {
            username: username.to_string(),
            nama: username.to_string(),
            avatar_url: avatar.clone(),
            kelas_nama: None,
            jurusan_nama: None,
            nisn: None,
            nis: None,
        };
        let portfolio = |id: i64, username: &str| PortfolioExportItem {
            id,
            judul: format!("Karya {id}"),
            created_at: Utc::now(),
            thumbnail_url: Some(format!("https://cdn.example/thumb-{id}.png")),
            user: user(username),
            content_blocks: vec![ContentBlockExportItem {
                id: id * 10,
                block_order: 1,
                payload: BlockPayload::Image {
                    url: "https://cdn.example/shared-block.png".to_string(),
                    caption: None,
                },
            }],
        };
        ExportDataset {
            series: SeriesInfo {
                id: SeriesId::new(1).unwrap(),
                nama: "Demo".to_string(),
                blocks: Vec::new(),
            },
            portfolios: vec![portfolio(1, "alice"), portfolio(2, "bob")],
        }
    }

    #[test]
    fn test_collect_dedups_shared_urls() {
        let dataset = dataset_with_shared_avatar();
        let urls = collect_asset_urls(&dataset, Some("https://cdn.example/logo.png"));
        // branding + shared avatar + 2 thumbnails + shared block image
        assert_eq!(urls.len(), 5);
        assert_eq!(urls[0], "https://cdn.example/logo.png");
        let unique: HashSet<&String> = urls.iter().collect();
        assert_eq!(unique.len(), urls.len());
    }

    #[test]
    fn test_collect_without_branding() {
        let dataset = dataset_with_shared_avatar();
        let urls = collect_asset_urls(&dataset, None);
        assert_eq!(urls.len(), 4);
    }

    #[tokio::test]
    async fn test_shared_url_fetched_exactly_once() {
        let dataset = dataset_with_shared_avatar();
        let urls = collect_asset_urls(&dataset, None);
        let source = FakeSource::new(&[]);
        let mut cache = ImageCache::new();
        let (_tx, rx) = watch::channel(false);

        let stats = materialize_images(&source, &urls, &mut cache, &HashSet::new(), &rx, |_, _| {})
            .await
            .unwrap();

        assert_eq!(source.fetch_count(), 4);
        assert_eq!(stats.resolved, 4);
        assert!(cache.contains("https://cdn.example/avatar.png"));
    }

    #[tokio::test]
    async fn test_failures_are_swallowed_not_fatal() {
        let urls = vec![
            "https://cdn.example/ok.png".to_string(),
            "https://cdn.example/broken.png".to_string(),
        ];
        let source = FakeSource::new(&["https://cdn.example/broken.png"]);
        let mut cache = ImageCache::new();
        let (_tx, rx) = watch::channel(false);

        let stats = materialize_images(&source, &urls, &mut cache, &HashSet::new(), &rx, |_, _| {})
            .await
            .unwrap();

        assert_eq!(stats.resolved, 1);
        assert_eq!(stats.failed, 1);
        assert!(cache.contains("https://cdn.example/ok.png"));
        assert!(!cache.contains("https://cdn.example/broken.png"));
    }

    #[tokio::test]
    async fn test_concurrency_stays_within_batch_size() {
        let urls: Vec<String> = (0..13)
            .map(|i| format!("https://cdn.example/{i}.png"))
            .collect();
        let source = FakeSource::new(&[]);
        let mut cache = ImageCache::new();
        let (_tx, rx) = watch::channel(false);
        let mut batches = Vec::new();

        materialize_images(&source, &urls, &mut cache, &HashSet::new(), &rx, |done, total| {
            batches.push((done, total));
        })
        .await
        .unwrap();

        assert!(source.max_in_flight.load(Ordering::SeqCst) <= ASSET_BATCH_SIZE);
        assert_eq!(batches, vec![(1, 3), (2, 3), (3, 3)]);
    }

    #[tokio::test]
    async fn test_preseeded_and_attempted_urls_are_skipped() {
        let urls = vec![
            "https://cdn.example/cached.png".to_string(),
            "https://cdn.example/failed-earlier.png".to_string(),
            "https://cdn.example/new.png".to_string(),
        ];
        let source = FakeSource::new(&[]);
        let mut cache = ImageCache::new();
        cache.insert(
            "https://cdn.example/cached.png",
            EncodedImage::from_bytes("image/png", b"x"),
        );
        let attempted: HashSet<String> =
            ["https://cdn.example/failed-earlier.png".to_string()].into();
        let (_tx, rx) = watch::channel(false);

        let stats = materialize_images(&source, &urls, &mut cache, &attempted, &rx, |_, _| {})
            .await
            .unwrap();

        assert_eq!(stats.skipped, 2);
        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_cancellation_between_batches() {
        let urls: Vec<String> = (0..10)
            .map(|i| format!("https://cdn.example/{i}.png"))
            .collect();
        let source = FakeSource::new(&[]);
        let mut cache = ImageCache::new();
        let (tx, rx) = watch::channel(true);

        let result =
            materialize_images(&source, &urls, &mut cache, &HashSet::new(), &rx, |_, _| {}).await;

        assert!(matches!(result, Err(KaryaError::Cancelled)));
        assert_eq!(source.fetch_count(), 0);
        drop(tx);
    }
}
