//! `POST /submit`: validated grid submission with simulated progress.

use std::time::Duration;

use crate::client::ApiClient;
use crate::config;
use crate::error::{PricerError, Result};
use crate::grid::RowGrid;
use crate::models::SubmitReceipt;

// ---------------------------------------------------------------------------
// Progress reporting
// ---------------------------------------------------------------------------

/// Receives the 0–100 progress steps of a submission.
pub trait ProgressObserver {
    fn progress(&mut self, percent: u8);

    /// Called once the submission has finished, successfully or not.
    fn finish(&mut self) {}
}

impl<F: FnMut(u8)> ProgressObserver for F {
    fn progress(&mut self, percent: u8) {
        self(percent)
    }
}

/// Observer that ignores progress.
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn progress(&mut self, _percent: u8) {}
}

/// Timing of the simulated progress bar shown before the request is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressPacing {
    pub per_card: Duration,
    pub base: Duration,
    /// When false, progress is reported without any delay.
    pub enabled: bool,
}

impl Default for ProgressPacing {
    fn default() -> Self {
        Self {
            per_card: Duration::from_millis(config::PROGRESS_MS_PER_CARD),
            base: Duration::from_millis(config::PROGRESS_BASE_MS),
            enabled: true,
        }
    }
}

impl ProgressPacing {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// `per_card × total_cards + base`; negative totals count as zero.
    pub fn estimated_duration(&self, total_cards: i64) -> Duration {
        let cards = u32::try_from(total_cards.max(0)).unwrap_or(u32::MAX);
        self.per_card.saturating_mul(cards).saturating_add(self.base)
    }
}

// ---------------------------------------------------------------------------
// SubmitEndpoint
// ---------------------------------------------------------------------------

/// Submits the card grid to the pricing API.
pub struct SubmitEndpoint<'a> {
    client: &'a ApiClient,
    pacing: ProgressPacing,
}

impl<'a> SubmitEndpoint<'a> {
    pub fn new(client: &'a ApiClient, pacing: ProgressPacing) -> Self {
        Self { client, pacing }
    }

    /// Validate, animate progress, then POST the grid.
    ///
    /// Fails with [`PricerError::InvalidRows`] before touching the network
    /// when any row is flagged invalid. A non-2xx response is returned as
    /// [`PricerError::Api`]. The observer's `finish` runs on every path that
    /// reached the progress phase.
    pub fn submit(
        &self,
        grid: &RowGrid,
        observer: &mut dyn ProgressObserver,
    ) -> Result<SubmitReceipt> {
        let invalid = grid.invalid_indices();
        if !invalid.is_empty() {
            tracing::warn!(rows = ?invalid, "refusing to submit invalid rows");
            return Err(PricerError::InvalidRows(invalid));
        }

        let total = grid.total_card_count();
        let estimated = self.pacing.estimated_duration(total);
        tracing::info!(
            total_cards = total,
            estimated_ms = estimated.as_millis() as u64,
            "submitting cards"
        );

        let result = (|| -> Result<SubmitReceipt> {
            self.animate(estimated, observer);
            let body = self.client.post_json(config::SUBMIT_PATH, &grid.payload())?;
            Ok(parse_receipt(&body))
        })();

        observer.finish();
        result
    }

    fn animate(&self, estimated: Duration, observer: &mut dyn ProgressObserver) {
        let step = estimated / 100;
        for percent in 0..=100u8 {
            if self.pacing.enabled {
                std::thread::sleep(step);
            }
            observer.progress(percent);
        }
    }
}

/// The submit response has no fixed schema; keep what can be read.
fn parse_receipt(body: &str) -> SubmitReceipt {
    if body.trim().is_empty() {
        return SubmitReceipt::default();
    }
    match serde_json::from_str::<SubmitReceipt>(body) {
        Ok(receipt) => receipt,
        Err(e) => {
            tracing::warn!(error = %e, "unrecognized submit response body");
            SubmitReceipt::default()
        }
    }
}
