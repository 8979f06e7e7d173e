//! Static asset inspection with a crawl-wide cache
//!
//! Assets shared between pages (stylesheets, logos, scripts) are fetched
//! once per crawl. Lookups take the read lock; a miss fetches without any
//! lock held and then stores the record under the write lock. Two workers
//! missing on the same URL both fetch, and the last write wins.

use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::{extract_assets, AssetRef};
use crate::crawler::pool::TaskPool;
use crate::output::AssetRecord;
use crate::FetchError;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio_util::sync::CancellationToken;
use url::Url;

type AssetCache = Arc<RwLock<HashMap<String, AssetRecord>>>;

/// Concurrent asset checker
pub struct AssetChecker {
    fetcher: Arc<Fetcher>,
    workers: usize,
    cache: AssetCache,
}

impl AssetChecker {
    pub fn new(fetcher: Arc<Fetcher>, workers: usize) -> Self {
        Self {
            fetcher,
            workers,
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Extracts the assets of a page and checks them
    pub async fn check(
        &self,
        html: &str,
        page_url: &Url,
        cancel: &CancellationToken,
    ) -> Vec<AssetRecord> {
        let assets = extract_assets(html, page_url);
        self.check_refs(assets, cancel).await
    }

    /// Checks already extracted assets
    ///
    /// Results keep discovery order and are then stably sorted by type.
    /// Every asset yields a record: those left unchecked by cancellation
    /// carry the cancellation error and are not cached.
    pub async fn check_refs(
        &self,
        assets: Vec<AssetRef>,
        cancel: &CancellationToken,
    ) -> Vec<AssetRecord> {
        if assets.is_empty() {
            return Vec::new();
        }

        let mut pool = TaskPool::new(self.workers);
        let mut unchecked = Vec::new();
        for (index, asset) in assets.into_iter().enumerate() {
            if cancel.is_cancelled() {
                unchecked.push((index, cancelled_record(asset)));
                continue;
            }
            let fallback = asset.clone();
            let fetcher = Arc::clone(&self.fetcher);
            let cache = Arc::clone(&self.cache);
            let task_cancel = cancel.clone();
            let task = async move {
                let record = check_asset(&fetcher, &cache, asset, &task_cancel).await;
                (index, record)
            };
            if !pool.submit(task, cancel).await {
                unchecked.push((index, cancelled_record(fallback)));
            }
        }

        let mut indexed = pool.join().await;
        indexed.extend(unchecked);
        indexed.sort_by_key(|(index, _)| *index);

        let mut records: Vec<AssetRecord> = indexed.into_iter().map(|(_, record)| record).collect();
        records.sort_by_key(|record| record.asset_type);
        records
    }

    /// Returns the number of cached asset records
    pub fn cached(&self) -> usize {
        self.cache.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}

fn cancelled_record(asset: AssetRef) -> AssetRecord {
    AssetRecord {
        url: asset.url,
        asset_type: asset.asset_type,
        status_code: 0,
        size_bytes: 0,
        error: Some(FetchError::Cancelled.to_string()),
    }
}

async fn check_asset(
    fetcher: &Fetcher,
    cache: &RwLock<HashMap<String, AssetRecord>>,
    asset: AssetRef,
    cancel: &CancellationToken,
) -> AssetRecord {
    let cached = {
        let cache = cache.read().unwrap_or_else(|e| e.into_inner());
        cache.get(&asset.url).cloned()
    };
    if let Some(record) = cached {
        tracing::trace!("Asset cache hit: {}", asset.url);
        return record;
    }

    let result = fetcher.measure(&asset.url, cancel).await;
    let cancelled = result.as_ref().err().map(FetchError::is_cancelled).unwrap_or(false);

    let record = match result {
        Ok(measured) if measured.status_code >= 400 => AssetRecord {
            url: asset.url,
            asset_type: asset.asset_type,
            status_code: measured.status_code,
            size_bytes: 0,
            error: Some(format!("HTTP {}", measured.status_code)),
        },
        Ok(measured) => AssetRecord {
            url: asset.url,
            asset_type: asset.asset_type,
            status_code: measured.status_code,
            size_bytes: measured.size_bytes,
            error: None,
        },
        Err(e) => AssetRecord {
            url: asset.url,
            asset_type: asset.asset_type,
            status_code: 0,
            size_bytes: 0,
            error: Some(e.to_string()),
        },
    };

    // A cancelled check says nothing about the asset
    if !cancelled {
        let mut cache = cache.write().unwrap_or_else(|e| e.into_inner());
        cache.insert(record.url.clone(), record.clone());
    }

    record
}
