//! Interactive state of the results view.

use crate::error::{PricerError, Result};
use crate::models::{CardVariant, Grade, GradeMap, ResultRecord, VariantState};

use super::totals::{self, Totals};

/// A variant lookup the caller should perform for an expanded record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantRequest {
    pub index: usize,
    pub card: String,
    pub id: String,
}

/// Priced records plus exclusion anchor, grade selections and the last
/// fetch error.
#[derive(Debug, Clone, Default)]
pub struct ResultsTable {
    records: Vec<ResultRecord>,
    anchor: Option<usize>,
    error: Option<String>,
}

impl ResultsTable {
    pub fn new(records: Vec<ResultRecord>) -> Self {
        Self {
            records,
            anchor: None,
            error: None,
        }
    }

    pub fn records(&self) -> &[ResultRecord] {
        &self.records
    }

    pub fn record(&self, index: usize) -> Option<&ResultRecord> {
        self.records.get(index)
    }

    /// Message of the last failed fetch, if the most recent one failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Index of the last plain- or shift-clicked record.
    pub fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    /// Replace the records with a fresh fetch, clearing selection state.
    pub fn load(&mut self, records: Vec<ResultRecord>) {
        self.records = records;
        self.anchor = None;
        self.error = None;
    }

    /// Store the outcome of a fetch.
    ///
    /// On failure the error is recorded and the records already shown are
    /// kept. Returns whether the fetch succeeded.
    pub fn apply_fetch(&mut self, fetched: Result<Vec<ResultRecord>>) -> bool {
        match fetched {
            Ok(records) => {
                self.load(records);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, kept = self.records.len(), "results fetch failed");
                self.error = Some(e.to_string());
                false
            }
        }
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.records.len() {
            return Err(PricerError::InvalidArgument(format!(
                "record {} out of range (0..{})",
                index,
                self.records.len()
            )));
        }
        Ok(())
    }

    // -- Exclusion ---------------------------------------------------------

    /// Click handler for the exclude checkbox.
    ///
    /// A plain click inverts one record. A shift-click with an anchor sets
    /// every record between the anchor and `index` (inclusive) to the
    /// anchor's current state, i.e. the inverse of the state it had before it
    /// was clicked. Range members adopt that one state; they are not
    /// individually inverted. Either way `index` becomes the new anchor.
    pub fn toggle_exclude(&mut self, index: usize, shift: bool) -> Result<()> {
        self.check_index(index)?;

        match (shift, self.anchor) {
            (true, Some(anchor)) if anchor < self.records.len() => {
                let state = self.records[anchor].is_excluded;
                let (lo, hi) = (anchor.min(index), anchor.max(index));
                for record in &mut self.records[lo..=hi] {
                    record.is_excluded = state;
                }
            }
            _ => {
                let record = &mut self.records[index];
                record.is_excluded = !record.is_excluded;
            }
        }

        self.anchor = Some(index);
        Ok(())
    }

    // -- Variants ----------------------------------------------------------

    /// Expand or collapse a record.
    ///
    /// Expanding a record whose variants are not loaded yet marks it loading
    /// and returns the lookup to perform. Collapsing keeps any cached
    /// variants.
    pub fn toggle_advanced(&mut self, index: usize) -> Result<Option<VariantRequest>> {
        self.check_index(index)?;
        let record = &mut self.records[index];
        record.is_advanced = !record.is_advanced;

        if !record.is_advanced || record.variants.is_loaded() {
            return Ok(None);
        }

        record.variants = VariantState::Loading;
        Ok(Some(VariantRequest {
            index,
            card: record.card.clone(),
            id: record.id.clone(),
        }))
    }

    /// Store the outcome of a variant lookup.
    ///
    /// A failure is logged and leaves the record in place with no variants;
    /// nothing else in the table is affected.
    pub fn store_variants(&mut self, index: usize, fetched: Result<Vec<CardVariant>>) {
        let Some(record) = self.records.get_mut(index) else {
            tracing::warn!(index, "variant result for a record that no longer exists");
            return;
        };
        match fetched {
            Ok(variants) => record.variants = VariantState::Loaded(variants),
            Err(e) => {
                tracing::warn!(card = %record.card, id = %record.id, error = %e, "variant lookup failed");
                record.variants = VariantState::Failed(e.to_string());
            }
        }
    }

    /// Unit prices of one cached variant of a record.
    pub fn variant_prices(&self, index: usize, variant: usize) -> Result<GradeMap<f64>> {
        self.check_index(index)?;
        let record = &self.records[index];
        let v = record.variants.variants().get(variant).ok_or_else(|| {
            PricerError::NotFound(format!("variant {} of record {} is not loaded", variant, index))
        })?;
        Ok(totals::variant_prices(record, v))
    }

    // -- Grades & totals ---------------------------------------------------

    /// Choose (or clear) the grade a record is estimated at.
    pub fn select_grade(&mut self, index: usize, grade: Option<Grade>) -> Result<()> {
        self.check_index(index)?;
        self.records[index].selected_grade = grade;
        Ok(())
    }

    /// Totals over non-excluded records.
    pub fn totals(&self) -> Totals {
        totals::compute_totals(&self.records)
    }

    /// Totals over records with a selected grade.
    pub fn estimated_totals(&self) -> Totals {
        totals::compute_estimated_totals(&self.records)
    }
}
