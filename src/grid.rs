//! The editable grid of card rows behind the input page.
//!
//! Owns the rows and the path of the last uploaded CSV. Every edit re-runs the
//! invalidity predicate over the whole collection, not just the edited row.

use crate::config;
use crate::error::{PricerError, Result};
use crate::models::{CardRow, FieldValue, RowField, SubmitPayload};
use crate::upload;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Mutable collection of [`CardRow`]s plus the attached upload, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct RowGrid {
    rows: Vec<CardRow>,
    upload: Option<PathBuf>,
}

impl Default for RowGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl RowGrid {
    /// A fresh grid of blank rows.
    pub fn new() -> Self {
        Self {
            rows: blank_rows(config::ROW_BATCH),
            upload: None,
        }
    }

    /// Build a grid from existing rows, recomputing every invalid flag.
    pub fn from_rows(rows: Vec<CardRow>) -> Self {
        let mut grid = Self { rows, upload: None };
        grid.recheck();
        grid
    }

    pub fn rows(&self) -> &[CardRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Path of the CSV currently attached to the grid.
    pub fn upload(&self) -> Option<&Path> {
        self.upload.as_deref()
    }

    // -- Editing -----------------------------------------------------------

    /// Set one field of one row, then revalidate every row.
    ///
    /// Checkbox fields accept a bool or a truthy string (`"true"`, `"1"`,
    /// `"on"`). The count accepts a number or numeric text; empty text maps
    /// to the default count of 1.
    pub fn edit_field(&mut self, index: usize, field: RowField, value: FieldValue) -> Result<()> {
        let len = self.rows.len();
        let row = self.rows.get_mut(index).ok_or_else(|| {
            PricerError::InvalidArgument(format!("row {} out of range (0..{})", index, len))
        })?;

        match field {
            RowField::CardName => row.card_name = coerce_text(value),
            RowField::CardId => row.card_id = coerce_text(value),
            RowField::Holo => row.holo = coerce_checked(&value),
            RowField::ReverseHolo => row.reverse_holo = coerce_checked(&value),
            RowField::FirstEdition => row.first_edition = coerce_checked(&value),
            RowField::CardCount => row.card_count = Some(coerce_count(value)?),
        }

        self.recheck();
        Ok(())
    }

    /// Append `n` blank rows; existing rows keep their values and flags.
    pub fn add_rows(&mut self, n: usize) {
        self.rows.extend(blank_rows(n));
    }

    /// Append the standard batch of 10 blank rows.
    pub fn add_default_rows(&mut self) {
        self.add_rows(config::ROW_BATCH);
    }

    /// Reset one row to blank defaults.
    pub fn clear_row(&mut self, index: usize) -> Result<()> {
        let len = self.rows.len();
        let row = self.rows.get_mut(index).ok_or_else(|| {
            PricerError::InvalidArgument(format!("row {} out of range (0..{})", index, len))
        })?;
        *row = CardRow::default();
        Ok(())
    }

    /// Reset to a fresh grid and detach the uploaded file.
    pub fn clear_all(&mut self) {
        self.rows = blank_rows(config::ROW_BATCH);
        self.upload = None;
    }

    // -- CSV import --------------------------------------------------------

    /// Replace the grid with the rows of a CSV file.
    ///
    /// On any read or parse failure the grid is left exactly as it was.
    pub fn import_csv<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let count = self.import_csv_reader(BufReader::new(file))?;
        self.upload = Some(path.to_path_buf());
        tracing::info!(path = %path.display(), rows = count, "imported CSV");
        Ok(count)
    }

    /// Replace the grid with rows parsed from any reader.
    pub fn import_csv_reader<R: Read>(&mut self, reader: R) -> Result<usize> {
        let parsed = upload::parse_rows(reader)?;
        let count = parsed.len();
        self.rows = parsed;
        Ok(count)
    }

    // -- Validation & payload ----------------------------------------------

    /// Recompute the invalid flag of every row.
    pub fn recheck(&mut self) {
        for row in &mut self.rows {
            row.is_invalid = row.check_invalid();
        }
    }

    pub fn has_invalid(&self) -> bool {
        self.rows.iter().any(|r| r.is_invalid)
    }

    /// Zero-based indices of rows currently flagged invalid.
    pub fn invalid_indices(&self) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_invalid)
            .map(|(i, _)| i)
            .collect()
    }

    /// Sum of all counts; a cleared count contributes nothing.
    pub fn total_card_count(&self) -> i64 {
        self.rows.iter().map(|r| r.card_count.unwrap_or(0)).sum()
    }

    /// The submit body for every row in the grid, placeholders included.
    pub fn payload(&self) -> SubmitPayload {
        SubmitPayload {
            cards: self.rows.iter().map(CardRow::to_submit_card).collect(),
        }
    }
}

fn blank_rows(n: usize) -> Vec<CardRow> {
    (0..n).map(|_| CardRow::default()).collect()
}

fn coerce_text(value: FieldValue) -> String {
    match value {
        FieldValue::Text(s) => s,
        FieldValue::Checked(b) => b.to_string(),
        FieldValue::Number(n) => n.to_string(),
    }
}

fn coerce_checked(value: &FieldValue) -> bool {
    match value {
        FieldValue::Checked(b) => *b,
        FieldValue::Number(n) => *n != 0,
        FieldValue::Text(s) => matches!(s.trim(), "true" | "1" | "on"),
    }
}

fn coerce_count(value: FieldValue) -> Result<i64> {
    match value {
        FieldValue::Number(n) => Ok(n),
        FieldValue::Checked(b) => Ok(i64::from(b)),
        FieldValue::Text(s) => {
            let t = s.trim();
            if t.is_empty() {
                return Ok(1);
            }
            t.parse::<i64>()
                .map_err(|_| PricerError::InvalidArgument(format!("card count '{}' is not a whole number", t)))
        }
    }
}
