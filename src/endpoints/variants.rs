//! `GET /variants`: per-card alternate print lookup.

use crate::client::ApiClient;
use crate::config;
use crate::error::Result;
use crate::models::CardVariant;

pub struct VariantsEndpoint<'a> {
    client: &'a ApiClient,
}

impl<'a> VariantsEndpoint<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Look up the known variants of one card.
    pub fn lookup(&self, card: &str, id: &str) -> Result<Vec<CardVariant>> {
        let variants: Vec<CardVariant> = self
            .client
            .get_json(config::VARIANTS_PATH, &[("card", card), ("id", id)])?;
        tracing::debug!(card, id, variants = variants.len(), "variant lookup");
        Ok(variants)
    }
}
