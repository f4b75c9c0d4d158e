//! Presentation state holder for async data loading.
//!
//! A [`Loader`] owns three observable cells (last loaded data, a loading
//! flag, an error message) and a fetcher that produces a future for a given
//! request. Loads run on the tokio runtime; the UI thread polls for results
//! each tick and never blocks on storage or network I/O.
//!
//! Starting a new load drops the receiver of any pending one, so the latest
//! request wins. The task behind a superseded load still runs to completion;
//! only its publication is discarded.
//!
//! # Example
//!
//! ```ignore
//! let catalog = catalog.clone();
//! let mut items = Loader::new(move |kind: LoadKind| {
//!     let catalog = catalog.clone();
//!     async move { catalog.retrieve().await.map_err(|e| e.to_string()) }
//! });
//!
//! items.load(LoadKind::CacheFirst);
//!
//! // In the event loop tick
//! if items.poll() {
//!     // State changed, re-render
//! }
//! ```

use std::future::Future;
use std::pin::Pin;
use tokio::sync::mpsc;

/// A boxed future that returns a Result<T, String>
type BoxFuture<T> = Pin<Box<dyn Future<Output = Result<T, String>> + Send>>;

/// A factory function that creates a fetch future for a request
type FetcherFn<R, T> = Box<dyn Fn(R) -> BoxFuture<T> + Send + Sync>;

/// Async loader with separate data, loading, and error cells.
pub struct Loader<R, T> {
  fetcher: FetcherFn<R, T>,
  data: Option<T>,
  error: Option<String>,
  loading: bool,
  receiver: Option<mpsc::UnboundedReceiver<Result<T, String>>>,
}

impl<R, T: Send + 'static> Loader<R, T> {
  /// Create a loader with the given fetcher function. The fetcher is called
  /// once per `load`, with the request it was given.
  pub fn new<F, Fut>(fetcher: F) -> Self
  where
    F: Fn(R) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, String>> + Send + 'static,
  {
    Self {
      fetcher: Box::new(move |request| Box::pin(fetcher(request))),
      data: None,
      error: None,
      loading: false,
      receiver: None,
    }
  }

  /// Last successfully loaded value.
  ///
  /// Retained while a reload is in flight and across failed reloads, so the
  /// UI keeps showing something useful.
  pub fn data(&self) -> Option<&T> {
    self.data.as_ref()
  }

  /// Error message from the most recent failed load, if any.
  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  pub fn is_loading(&self) -> bool {
    self.loading
  }

  /// Start a load.
  ///
  /// Raises the loading flag, clears the error, and drops the receiver of
  /// any pending load so only this request's result is published.
  pub fn load(&mut self, request: R) {
    let (tx, rx) = mpsc::unbounded_channel();
    self.receiver = Some(rx);
    self.loading = true;
    self.error = None;

    let future = (self.fetcher)(request);
    tokio::spawn(async move {
      let result = future.await;
      // Ignore send errors - a newer load may have replaced the receiver
      let _ = tx.send(result);
    });
  }

  /// Poll for a completed load without blocking.
  ///
  /// Returns `true` if state changed. The loading flag is cleared on every
  /// completion path, including a fetch task that died without sending.
  pub fn poll(&mut self) -> bool {
    let receiver = match &mut self.receiver {
      Some(rx) => rx,
      None => return false,
    };

    match receiver.try_recv() {
      Ok(Ok(data)) => {
        self.data = Some(data);
        self.loading = false;
        self.receiver = None;
        true
      }
      Ok(Err(error)) => {
        self.error = Some(error);
        self.loading = false;
        self.receiver = None;
        true
      }
      Err(mpsc::error::TryRecvError::Empty) => false,
      Err(mpsc::error::TryRecvError::Disconnected) => {
        // Sender dropped without sending - surface as a generic failure
        self.error = Some("Load failed unexpectedly".to_string());
        self.loading = false;
        self.receiver = None;
        true
      }
    }
  }
}

impl<R, T: std::fmt::Debug> std::fmt::Debug for Loader<R, T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Loader")
      .field("data", &self.data)
      .field("error", &self.error)
      .field("loading", &self.loading)
      .finish_non_exhaustive()
  }
}
