//! `GET /results`: the priced grade matrix for the last submission.

use crate::client::ApiClient;
use crate::config;
use crate::error::Result;
use crate::models::ResultRecord;
use crate::results::wire;

/// Fetches and reshapes the results of the last submission.
pub struct ResultsEndpoint<'a> {
    client: &'a ApiClient,
}

impl<'a> ResultsEndpoint<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Fetch the column-oriented results and convert them to records.
    ///
    /// Fails on transport errors, non-2xx responses and payloads without a
    /// `results.card` column.
    pub fn fetch(&self) -> Result<Vec<ResultRecord>> {
        let body = self.client.get_text(config::RESULTS_PATH, &[])?;
        let records = wire::decode(&body)?;
        tracing::info!(records = records.len(), "fetched results");
        Ok(records)
    }
}
