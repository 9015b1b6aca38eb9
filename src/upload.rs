//! CSV upload parsing and the downloadable input template.
//!
//! Cells are typed dynamically (empty → null, `true`/`false` → bool, numeric
//! → number, anything else → text). A parsed row is flagged invalid when a
//! checkbox or count cell is unusable or the row itself is partially
//! identified.

use crate::config;
use crate::error::{PricerError, Result};
use crate::models::CardRow;
use csv::{ReaderBuilder, StringRecord};
use std::io::Read;

/// A dynamically typed CSV cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Type a raw cell the way a spreadsheet import would.
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return CellValue::Null;
        }
        match trimmed {
            "true" | "TRUE" | "True" => return CellValue::Bool(true),
            "false" | "FALSE" | "False" => return CellValue::Bool(false),
            _ => {}
        }
        if looks_numeric(trimmed) {
            if let Ok(n) = trimmed.parse::<f64>() {
                return CellValue::Number(n);
            }
        }
        CellValue::Text(raw.to_string())
    }

    /// Whether this cell is an acceptable value for a checkbox column.
    ///
    /// Accepts `true`/`false`, `1`/`0`, their string spellings and null.
    pub fn is_boolish(&self) -> bool {
        match self {
            CellValue::Null | CellValue::Bool(_) => true,
            CellValue::Number(n) => *n == 1.0 || *n == 0.0,
            CellValue::Text(s) => s == "true" || s == "false",
        }
    }

    /// Checkbox value: only `true`, `1` and `"true"` count as checked.
    pub fn as_checked(&self) -> bool {
        match self {
            CellValue::Bool(b) => *b,
            CellValue::Number(n) => *n == 1.0,
            CellValue::Text(s) => s == "true",
            CellValue::Null => false,
        }
    }
}

/// Plain decimal literal: optional sign, digits with at most one `.`,
/// optional exponent. Rejects `inf`, `NaN` and hex-like strings that
/// `f64::from_str` would otherwise accept.
fn looks_numeric(s: &str) -> bool {
    let body = s.strip_prefix('-').unwrap_or(s);
    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(i) => (&body[..i], Some(&body[i + 1..])),
        None => (body, None),
    };
    let mut dots = 0;
    let mut digits = 0;
    for c in mantissa.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return false,
        }
    }
    if digits == 0 || dots > 1 {
        return false;
    }
    match exponent {
        None => true,
        Some(exp) => {
            let exp = exp.strip_prefix(['+', '-']).unwrap_or(exp);
            !exp.is_empty() && exp.chars().all(|c| c.is_ascii_digit())
        }
    }
}

// ---------------------------------------------------------------------------
// Column lookup
// ---------------------------------------------------------------------------

struct Columns {
    card_name: Option<usize>,
    card_id: Option<usize>,
    holo: Option<usize>,
    reverse_holo: Option<usize>,
    first_edition: Option<usize>,
    card_count: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |names: &[&str]| {
            headers.iter().position(|h| {
                let h = h.trim().trim_start_matches('\u{feff}');
                names.iter().any(|n| h == *n)
            })
        };
        let cols = Columns {
            card_name: find(&["cardName", "card_name"]),
            card_id: find(&["cardId", "card_id"]),
            holo: find(&["holo"]),
            reverse_holo: find(&["reverse_holo", "reverseHolo"]),
            first_edition: find(&["first_edition", "firstEdition"]),
            card_count: find(&["card_count", "cardCount"]),
        };
        if cols.card_name.is_none() && cols.card_id.is_none() {
            return Err(PricerError::InvalidArgument(format!(
                "CSV header must contain cardName and cardId columns (expected: {})",
                config::TEMPLATE_HEADER
            )));
        }
        Ok(cols)
    }

    fn cell(record: &StringRecord, idx: Option<usize>) -> CellValue {
        idx.and_then(|i| record.get(i))
            .map(CellValue::infer)
            .unwrap_or(CellValue::Null)
    }

    fn text(record: &StringRecord, idx: Option<usize>) -> String {
        idx.and_then(|i| record.get(i))
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse an uploaded CSV into grid rows.
///
/// The header row is required; a missing header or one without name/id
/// columns is [`PricerError::InvalidArgument`]. Each returned row is flagged
/// when a checkbox or count cell is unusable or the row predicate fails.
pub fn parse_rows<R: Read>(reader: R) -> Result<Vec<CardRow>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(PricerError::InvalidArgument(
            "CSV file is empty or has no header row".to_string(),
        ));
    }
    let cols = Columns::from_headers(&headers)?;

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(parse_record(&record, &cols));
    }

    tracing::debug!(rows = rows.len(), "parsed CSV upload");
    Ok(rows)
}

fn parse_record(record: &StringRecord, cols: &Columns) -> CardRow {
    let holo = Columns::cell(record, cols.holo);
    let reverse_holo = Columns::cell(record, cols.reverse_holo);
    let first_edition = Columns::cell(record, cols.first_edition);
    let count = Columns::cell(record, cols.card_count);

    let (card_count, count_ok) = match count {
        CellValue::Null => (Some(1), true),
        CellValue::Number(n) if n > 0.0 && n.fract() == 0.0 => (Some(n as i64), true),
        CellValue::Number(n) => (Some(n.trunc() as i64), false),
        _ => (None, false),
    };

    let is_invalid = !holo.is_boolish()
        || !reverse_holo.is_boolish()
        || !first_edition.is_boolish()
        || !count_ok;

    let mut row = CardRow {
        card_name: Columns::text(record, cols.card_name),
        card_id: Columns::text(record, cols.card_id),
        holo: holo.as_checked(),
        reverse_holo: reverse_holo.as_checked(),
        first_edition: first_edition.as_checked(),
        card_count,
        is_invalid: false,
    };
    row.is_invalid = is_invalid || row.check_invalid();
    row
}

/// The downloadable template: header plus one blank data row.
pub fn template_csv() -> String {
    format!("{}\n,,,,,", config::TEMPLATE_HEADER)
}
