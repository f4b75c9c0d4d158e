//! The data-sourcing policy: cache-first reads with remote fallback.

use color_eyre::Result;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::catalog::api_types::ApiItem;
use crate::catalog::client::FetchError;
use crate::catalog::types::CatalogItem;

use super::store::{ItemRow, ItemStore};

/// Cache-first retrieval over an [`ItemStore`].
///
/// `retrieve` serves stored rows whenever any exist and only consults the
/// remote source when the store is empty, so a populated cache is never
/// refreshed automatically. `force_refresh` always goes remote. Both fall
/// back to whatever the store holds when the transport fails.
///
/// The fetch itself is passed in as a closure, keeping this layer free of
/// HTTP concerns and letting tests drive it with canned responses.
pub struct ItemCache {
  store: Arc<dyn ItemStore>,
  /// Serializes refresh bodies so overlapping calls cannot interleave
  /// clear/insert in the store.
  refresh_lock: Arc<Mutex<()>>,
}

impl ItemCache {
  pub fn new(store: Arc<dyn ItemStore>) -> Self {
    Self {
      store,
      refresh_lock: Arc::new(Mutex::new(())),
    }
  }

  /// Cache-first retrieval of all catalog items.
  ///
  /// 1. Non-empty store: translate and return, no remote call.
  /// 2. Empty store: fetch, repopulate the store on success, fall back to
  ///    the (empty) store on transport failure.
  pub async fn retrieve<F, Fut>(&self, fetcher: F) -> Result<Vec<CatalogItem>>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Option<Vec<ApiItem>>, FetchError>>,
  {
    let _guard = self.refresh_lock.lock().await;

    let cached = self.store.all()?;
    if !cached.is_empty() {
      debug!(count = cached.len(), "serving catalog from cache");
      return Ok(rows_to_items(cached));
    }

    self.refresh_locked(fetcher).await
  }

  /// Fetch from the remote source regardless of what the store holds.
  ///
  /// Success replaces the cache wholesale; transport failure leaves it
  /// untouched and returns the stored rows.
  pub async fn force_refresh<F, Fut>(&self, fetcher: F) -> Result<Vec<CatalogItem>>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Option<Vec<ApiItem>>, FetchError>>,
  {
    let _guard = self.refresh_lock.lock().await;

    self.refresh_locked(fetcher).await
  }

  /// Fetch, repopulate the store, and translate. The caller must hold the
  /// refresh lock.
  async fn refresh_locked<F, Fut>(&self, fetcher: F) -> Result<Vec<CatalogItem>>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Option<Vec<ApiItem>>, FetchError>>,
  {
    match fetcher().await {
      Ok(Some(wire)) => {
        let rows: Vec<ItemRow> = wire.into_iter().map(ApiItem::into_row).collect();

        // Clear-then-insert is two separate store calls. A crash between
        // them leaves the store empty, which the next retrieve treats as a
        // cache miss and repopulates.
        self.store.clear()?;
        self.store.insert_all(&rows)?;

        debug!(count = rows.len(), "catalog cache repopulated");
        Ok(rows_to_items(rows))
      }
      Ok(None) => {
        debug!("catalog endpoint returned no data");
        Ok(Vec::new())
      }
      Err(FetchError::Transport(reason)) => {
        warn!(%reason, "catalog fetch failed, serving cached rows");
        Ok(rows_to_items(self.store.all()?))
      }
      // Anything past the transport is an application fault and surfaces
      // as an opaque error.
      Err(err @ FetchError::Decode(_)) => Err(err.into()),
    }
  }
}

impl Clone for ItemCache {
  fn clone(&self) -> Self {
    Self {
      store: Arc::clone(&self.store),
      refresh_lock: Arc::clone(&self.refresh_lock),
    }
  }
}

fn rows_to_items(rows: Vec<ItemRow>) -> Vec<CatalogItem> {
  rows.into_iter().map(CatalogItem::from).collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::store::MemoryStore;
  use std::sync::atomic::{AtomicUsize, Ordering};

  fn wire(id: i64, title: &str, body: &str) -> ApiItem {
    ApiItem {
      id,
      title: title.to_string(),
      subtitle: body.to_string(),
    }
  }

  fn row(id: i64, title: &str, subtitle: &str) -> ItemRow {
    ItemRow {
      id,
      title: title.to_string(),
      subtitle: subtitle.to_string(),
    }
  }

  fn item(id: i64, title: &str, subtitle: &str) -> CatalogItem {
    CatalogItem {
      id,
      title: title.to_string(),
      subtitle: subtitle.to_string(),
    }
  }

  fn populated_store(rows: &[ItemRow]) -> Arc<MemoryStore> {
    let store = MemoryStore::new();
    store.insert_all(rows).unwrap();
    Arc::new(store)
  }

  #[tokio::test]
  async fn retrieve_serves_cache_without_remote_call() {
    let store = populated_store(&[row(1, "A", "x")]);
    let cache = ItemCache::new(store);
    let calls = AtomicUsize::new(0);

    let items = cache
      .retrieve(|| {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Ok(Some(vec![wire(9, "remote", "z")])) }
      })
      .await
      .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(items, vec![item(1, "A", "x")]);
  }

  #[tokio::test]
  async fn retrieve_populates_empty_cache_from_remote() {
    let store = Arc::new(MemoryStore::new());
    let cache = ItemCache::new(store.clone());

    let items = cache
      .retrieve(|| async { Ok(Some(vec![wire(1, "A", "x"), wire(2, "B", "y")])) })
      .await
      .unwrap();

    assert_eq!(items, vec![item(1, "A", "x"), item(2, "B", "y")]);
    assert_eq!(
      store.all().unwrap(),
      vec![row(1, "A", "x"), row(2, "B", "y")]
    );

    // Second retrieve comes from the cache; the remote is not consulted.
    let calls = AtomicUsize::new(0);
    let again = cache
      .retrieve(|| {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Ok(None) }
      })
      .await
      .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(again, items);
  }

  #[tokio::test]
  async fn retrieve_returns_empty_when_remote_has_no_data() {
    let store = Arc::new(MemoryStore::new());
    let cache = ItemCache::new(store.clone());

    let items = cache.retrieve(|| async { Ok(None) }).await.unwrap();

    assert!(items.is_empty());
    assert!(store.all().unwrap().is_empty());
  }

  #[tokio::test]
  async fn retrieve_with_empty_cache_survives_transport_failure() {
    let cache = ItemCache::new(Arc::new(MemoryStore::new()));

    let items = cache
      .retrieve(|| async { Err(FetchError::Transport("connection refused".to_string())) })
      .await
      .unwrap();

    assert!(items.is_empty());
  }

  #[tokio::test]
  async fn force_refresh_replaces_cache_wholesale() {
    let store = populated_store(&[row(9, "stale", "stale")]);
    let cache = ItemCache::new(store.clone());

    let items = cache
      .force_refresh(|| async { Ok(Some(vec![wire(1, "A", "x")])) })
      .await
      .unwrap();

    assert_eq!(items, vec![item(1, "A", "x")]);
    assert_eq!(store.all().unwrap(), vec![row(1, "A", "x")]);
  }

  #[tokio::test]
  async fn force_refresh_falls_back_to_cache_on_transport_failure() {
    let store = populated_store(&[row(9, "stale", "stale")]);
    let cache = ItemCache::new(store.clone());

    let items = cache
      .force_refresh(|| async { Err(FetchError::Transport("timed out".to_string())) })
      .await
      .unwrap();

    // Result equals the pre-existing rows and the store itself is
    // untouched: clear-then-insert never began.
    assert_eq!(items, vec![item(9, "stale", "stale")]);
    assert_eq!(store.all().unwrap(), vec![row(9, "stale", "stale")]);
  }

  #[tokio::test]
  async fn force_refresh_with_no_data_leaves_cache_untouched() {
    let store = populated_store(&[row(9, "stale", "stale")]);
    let cache = ItemCache::new(store.clone());

    let items = cache.force_refresh(|| async { Ok(None) }).await.unwrap();

    assert!(items.is_empty());
    assert_eq!(store.all().unwrap(), vec![row(9, "stale", "stale")]);
  }

  #[tokio::test]
  async fn decode_failure_surfaces_as_error() {
    let cache = ItemCache::new(Arc::new(MemoryStore::new()));

    let result = cache
      .force_refresh(|| async { Err(FetchError::Decode("expected array".to_string())) })
      .await;

    assert!(result.is_err());
  }

  #[tokio::test]
  async fn retrieve_is_idempotent_without_mutation() {
    let store = populated_store(&[row(1, "A", "x"), row(2, "B", "y")]);
    let cache = ItemCache::new(store);

    let first = cache.retrieve(|| async { Ok(None) }).await.unwrap();
    let second = cache.retrieve(|| async { Ok(None) }).await.unwrap();

    assert_eq!(first, second);
  }
}
