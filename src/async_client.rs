//! Async wrapper around [`CardPricer`] for use in async runtimes (Tokio, etc.).
//!
//! Runs all client operations on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free of the
//! blocking HTTP calls and the simulated submit progress delay.
//!
//! # Example
//!
//! ```ignore
//! use card_pricer::AsyncCardPricer;
//!
//! #[tokio::main]
//! async fn main() {
//!     let pricer = AsyncCardPricer::builder().build().await.unwrap();
//!
//!     let records = pricer.fetch_results().await.unwrap();
//!     println!("{} priced cards", records.len());
//!
//!     pricer.close().await.unwrap();
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::endpoints::{NoProgress, ProgressPacing};
use crate::error::{PricerError, Result};
use crate::grid::RowGrid;
use crate::models::{CardVariant, ResultRecord, SubmitReceipt};
use crate::CardPricer;

// ---------------------------------------------------------------------------
// AsyncCardPricerBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncCardPricer`] instance.
#[derive(Default)]
pub struct AsyncCardPricerBuilder {
    api_base: Option<String>,
    timeout: Option<Duration>,
    download_dir: Option<PathBuf>,
    pacing: Option<ProgressPacing>,
}

impl AsyncCardPricerBuilder {
    /// Set the pricing API base URL.
    pub fn api_base(mut self, url: &str) -> Self {
        self.api_base = Some(url.to_string());
        self
    }

    /// Set the HTTP request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the download directory.
    pub fn download_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.download_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the pacing of the simulated submit progress.
    pub fn pacing(mut self, pacing: ProgressPacing) -> Self {
        self.pacing = Some(pacing);
        self
    }

    /// Build the async client on the blocking thread pool.
    pub async fn build(self) -> Result<AsyncCardPricer> {
        tokio::task::spawn_blocking(move || {
            let mut builder = CardPricer::builder();
            if let Some(url) = self.api_base {
                builder = builder.api_base(&url);
            }
            if let Some(timeout) = self.timeout {
                builder = builder.timeout(timeout);
            }
            if let Some(dir) = self.download_dir {
                builder = builder.download_dir(dir);
            }
            if let Some(pacing) = self.pacing {
                builder = builder.pacing(pacing);
            }
            let pricer = builder.build()?;
            Ok(AsyncCardPricer {
                inner: Arc::new(Mutex::new(pricer)),
            })
        })
        .await
        .map_err(|e| PricerError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncCardPricer
// ---------------------------------------------------------------------------

/// Async wrapper around [`CardPricer`].
///
/// All operations are dispatched to a blocking thread pool via
/// [`tokio::task::spawn_blocking`]. The underlying [`CardPricer`] is
/// protected by a [`Mutex`] since its HTTP client slot uses `RefCell`.
///
/// Call [`close()`](Self::close) before dropping the last handle inside a
/// runtime so the blocking HTTP client is torn down off the event loop.
#[derive(Clone)]
pub struct AsyncCardPricer {
    inner: Arc<Mutex<CardPricer>>,
}

impl AsyncCardPricer {
    /// Create a new builder for configuring the async client.
    pub fn builder() -> AsyncCardPricerBuilder {
        AsyncCardPricerBuilder::default()
    }

    /// Run a sync client operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&CardPricer) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let pricer = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = pricer
                .lock()
                .map_err(|_| PricerError::InvalidArgument("client lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|e| PricerError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Submit a grid without progress reporting.
    pub async fn submit(&self, grid: RowGrid) -> Result<SubmitReceipt> {
        self.run(move |p| p.submit(&grid, &mut NoProgress)).await
    }

    /// Fetch the results of the last submission.
    pub async fn fetch_results(&self) -> Result<Vec<ResultRecord>> {
        self.run(|p| p.results().fetch()).await
    }

    /// Look up the variants of one card.
    pub async fn lookup_variants(&self, card: &str, id: &str) -> Result<Vec<CardVariant>> {
        let card = card.to_string();
        let id = id.to_string();
        self.run(move |p| p.variants().lookup(&card, &id)).await
    }

    /// Close the client, releasing the HTTP connection pool off the event loop.
    pub async fn close(self) -> Result<()> {
        tokio::task::spawn_blocking(move || {
            let pricer = self
                .inner
                .lock()
                .map_err(|_| PricerError::InvalidArgument("client lock poisoned".into()))?;
            pricer.client().close();
            Ok(())
        })
        .await
        .map_err(|e| PricerError::InvalidArgument(format!("Task join error: {e}")))?
    }
}
