//! Catalog retrieval composed from the HTTP client and the cache layer.

use color_eyre::Result;
use std::sync::Arc;

use crate::cache::{ItemCache, ItemStore};
use crate::config::Config;

use super::client::CatalogClient;
use super::types::CatalogItem;

/// The retrieval seam the presentation layer talks to.
///
/// Wires [`CatalogClient`] into [`ItemCache`] and holds no state beyond the
/// two collaborators, so it clones cheaply into background tasks.
#[derive(Clone)]
pub struct CachedCatalog {
  inner: CatalogClient,
  cache: ItemCache,
}

impl CachedCatalog {
  /// Compose the catalog from explicitly constructed collaborators.
  ///
  /// The store handle is passed in rather than created here so the caller
  /// decides between the durable and the ephemeral backend.
  pub fn new(config: &Config, store: Arc<dyn ItemStore>) -> Result<Self> {
    let inner = CatalogClient::new(config)?;
    let cache = ItemCache::new(store);

    Ok(Self { inner, cache })
  }

  /// Cache-first retrieval of all catalog items.
  pub async fn retrieve(&self) -> Result<Vec<CatalogItem>> {
    let inner = self.inner.clone();
    self
      .cache
      .retrieve(move || async move { inner.fetch_items().await })
      .await
  }

  /// Fetch from the remote endpoint regardless of cache contents.
  pub async fn force_refresh(&self) -> Result<Vec<CatalogItem>> {
    let inner = self.inner.clone();
    self
      .cache
      .force_refresh(move || async move { inner.fetch_items().await })
      .await
  }
}
