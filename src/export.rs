//! CSV export of priced results and re-reading of an exported file.
//!
//! Layout: `Card,ID,Card Count,<17 grade labels>,Final Link`, one line per
//! record, then a `Totals:` line with the card-count sum and each grade total
//! formatted as currency.

use csv::{ReaderBuilder, Terminator, WriterBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{PricerError, Result};
use crate::format::format_currency;
use crate::models::{Grade, ResultRecord};
use crate::results::Totals;

pub const TOTALS_LABEL: &str = "Totals:";

/// One data line of an exported results file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedRow {
    pub card: String,
    pub id: String,
    pub card_count: String,
    /// Grade price strings in [`Grade::ALL`] order.
    pub grades: Vec<String>,
    pub final_link: String,
}

impl From<&ResultRecord> for ExportedRow {
    fn from(r: &ResultRecord) -> Self {
        Self {
            card: r.card.clone(),
            id: r.id.clone(),
            card_count: r.card_count.clone(),
            grades: r.grades.values().cloned().collect(),
            final_link: r.final_link.clone(),
        }
    }
}

fn header() -> Vec<&'static str> {
    let mut cols = vec!["Card", "ID", "Card Count"];
    cols.extend(Grade::ALL.iter().map(|g| g.label()));
    cols.push("Final Link");
    cols
}

/// Serialize every record plus a trailing totals line.
pub fn export_csv(records: &[ResultRecord], totals: &Totals) -> Result<String> {
    let mut wtr = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    wtr.write_record(header())?;

    for r in records {
        let mut line: Vec<&str> = vec![r.card.as_str(), r.id.as_str(), r.card_count.as_str()];
        line.extend(r.grades.values().map(String::as_str));
        line.push(r.final_link.as_str());
        wtr.write_record(&line)?;
    }

    let mut footer = vec![
        TOTALS_LABEL.to_string(),
        String::new(),
        totals.card_count.to_string(),
    ];
    footer.extend(totals.by_grade.values().map(|v| format_currency(*v)));
    footer.push(String::new());
    wtr.write_record(&footer)?;

    let bytes = wtr
        .into_inner()
        .map_err(|e| PricerError::Io(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| PricerError::InvalidArgument(format!("export is not UTF-8: {}", e)))
}

/// Read the data lines of an exported file back, skipping the totals line.
///
/// Columns are located by header name, so the grade columns must carry the
/// standard labels.
pub fn parse_export(body: &str) -> Result<Vec<ExportedRow>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(body.as_bytes());

    let headers = rdr.headers()?.clone();
    let col = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| PricerError::NotFound(format!("export has no '{}' column", name)))
    };
    let card = col("Card")?;
    let id = col("ID")?;
    let count = col("Card Count")?;
    let link = col("Final Link")?;
    let grade_cols = Grade::ALL
        .iter()
        .map(|g| col(g.label()))
        .collect::<Result<Vec<_>>>()?;

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let field = |i: usize| record.get(i).unwrap_or("").to_string();
        if field(card) == TOTALS_LABEL {
            continue;
        }
        rows.push(ExportedRow {
            card: field(card),
            id: field(id),
            card_count: field(count),
            grades: grade_cols.iter().map(|&i| field(i)).collect(),
            final_link: field(link),
        });
    }
    Ok(rows)
}
