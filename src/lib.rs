//! Card-collection pricing client for Rust.
//!
//! Validates a grid of trading cards (typed in or uploaded as CSV), submits
//! it to the pricing API, fetches the resulting grade-price matrix and
//! aggregates it into per-grade totals that can be exported as CSV.
//!
//! # Quick start
//!
//! ```no_run
//! use card_pricer::{CardPricer, RowGrid, ResultsTable};
//! use card_pricer::endpoints::NoProgress;
//! use card_pricer::models::RowField;
//!
//! let pricer = CardPricer::builder()
//!     .api_base("https://pricing.example.com/prod")
//!     .build()
//!     .unwrap();
//!
//! let mut grid = RowGrid::new();
//! grid.edit_field(0, RowField::CardName, "Charizard".into()).unwrap();
//! grid.edit_field(0, RowField::CardId, "4/102".into()).unwrap();
//! pricer.submit(&grid, &mut NoProgress).unwrap();
//!
//! let mut table = ResultsTable::default();
//! pricer.load_results(&mut table);
//! println!("{:?}", table.totals());
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod booster;
pub mod client;
pub mod config;
pub mod downloads;
pub mod endpoints;
pub mod error;
pub mod export;
pub mod format;
pub mod grid;
pub mod models;
pub mod results;
pub mod upload;

#[cfg(feature = "async")]
pub use async_client::AsyncCardPricer;
pub use client::ApiClient;
pub use error::{PricerError, Result};
pub use grid::RowGrid;
pub use results::{ResultsTable, Totals};

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use endpoints::{ProgressObserver, ProgressPacing};
use models::{RecordDisplay, SubmitReceipt};

// ---------------------------------------------------------------------------
// CardPricerBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`CardPricer`] instance.
///
/// Use [`CardPricer::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](CardPricerBuilder::build) to create the client.
pub struct CardPricerBuilder {
    api_base: Option<String>,
    timeout: Duration,
    download_dir: Option<PathBuf>,
    pacing: ProgressPacing,
}

impl Default for CardPricerBuilder {
    fn default() -> Self {
        Self {
            api_base: None,
            timeout: config::DEFAULT_TIMEOUT,
            download_dir: None,
            pacing: ProgressPacing::default(),
        }
    }
}

impl CardPricerBuilder {
    /// Set the pricing API base URL.
    ///
    /// If not set, `CARD_PRICER_API_URL` is read from the environment, and
    /// failing that `http://localhost:3001` is used.
    pub fn api_base(mut self, url: &str) -> Self {
        self.api_base = Some(url.to_string());
        self
    }

    /// Set the HTTP request timeout. Defaults to 10 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Directory that template and results downloads are written to.
    ///
    /// Defaults to the platform download directory, or the current
    /// directory when there is none.
    pub fn download_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.download_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the pacing of the simulated submit progress.
    pub fn pacing(mut self, pacing: ProgressPacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// Build the client. No network traffic happens until the first request.
    pub fn build(self) -> Result<CardPricer> {
        let base = self.api_base.unwrap_or_else(config::default_api_base);
        let client = ApiClient::new(&base, self.timeout)?;
        Ok(CardPricer {
            client,
            download_dir: self.download_dir.unwrap_or_else(config::default_download_dir),
            pacing: self.pacing,
        })
    }
}

// ---------------------------------------------------------------------------
// CardPricer
// ---------------------------------------------------------------------------

/// The main entry point for talking to the pricing API.
///
/// Owns the [`ApiClient`] and exposes each endpoint as a lightweight
/// borrowing wrapper, plus convenience methods that tie the endpoints to the
/// [`RowGrid`] and [`ResultsTable`] state objects.
///
/// Created via [`CardPricer::builder()`].
pub struct CardPricer {
    client: ApiClient,
    download_dir: PathBuf,
    pacing: ProgressPacing,
}

impl CardPricer {
    /// Create a new builder for configuring the client.
    pub fn builder() -> CardPricerBuilder {
        CardPricerBuilder::default()
    }

    // -- Endpoint accessors ------------------------------------------------

    /// Access the submit endpoint.
    pub fn submission(&self) -> endpoints::SubmitEndpoint<'_> {
        endpoints::SubmitEndpoint::new(&self.client, self.pacing)
    }

    /// Access the results endpoint.
    pub fn results(&self) -> endpoints::ResultsEndpoint<'_> {
        endpoints::ResultsEndpoint::new(&self.client)
    }

    /// Access the variant lookup endpoint.
    pub fn variants(&self) -> endpoints::VariantsEndpoint<'_> {
        endpoints::VariantsEndpoint::new(&self.client)
    }

    // -- Flows -------------------------------------------------------------

    /// Submit the grid, reporting simulated progress to `observer`.
    ///
    /// Nothing is sent when any row is invalid.
    pub fn submit(
        &self,
        grid: &RowGrid,
        observer: &mut dyn ProgressObserver,
    ) -> Result<SubmitReceipt> {
        self.submission().submit(grid, observer)
    }

    /// Fetch results into `table`.
    ///
    /// On failure the table keeps its records and records the error message.
    /// Returns whether the fetch succeeded.
    pub fn load_results(&self, table: &mut ResultsTable) -> bool {
        table.apply_fetch(self.results().fetch())
    }

    /// Toggle a record's expanded state, looking up its variants when needed.
    ///
    /// A failed lookup leaves the record expanded with no variants; the
    /// returned display state tells which case applies.
    pub fn expand(&self, table: &mut ResultsTable, index: usize) -> Result<RecordDisplay> {
        if let Some(req) = table.toggle_advanced(index)? {
            let fetched = self.variants().lookup(&req.card, &req.id);
            table.store_variants(req.index, fetched);
        }
        table
            .record(index)
            .map(|r| r.display())
            .ok_or_else(|| PricerError::NotFound(format!("record {}", index)))
    }

    // -- Downloads ---------------------------------------------------------

    /// Write `card_template.csv` to the download directory.
    pub fn download_template(&self) -> Result<PathBuf> {
        downloads::save(&self.download_dir, config::TEMPLATE_FILE, &upload::template_csv())
    }

    /// Export the table (with its current totals) as `results.csv`.
    pub fn download_results(&self, table: &ResultsTable) -> Result<PathBuf> {
        if table.records().is_empty() {
            return Err(PricerError::NotFound("no results to export".to_string()));
        }
        let body = export::export_csv(table.records(), &table.totals())?;
        downloads::save(&self.download_dir, config::RESULTS_FILE, &body)
    }

    // -- Accessors ---------------------------------------------------------

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    pub fn api_base(&self) -> &str {
        &self.client.base_url
    }

    /// Return a reference to the underlying [`ApiClient`] for advanced usage.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Consume the client and release the HTTP connection pool.
    pub fn close(self) {
        self.client.close();
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for CardPricer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CardPricer(api_base={}, download_dir={}, pacing={})",
            self.client.base_url,
            self.download_dir.display(),
            if self.pacing.enabled { "on" } else { "off" }
        )
    }
}
