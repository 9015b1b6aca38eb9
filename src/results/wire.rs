//! Adapter from the column-oriented `/results` payload to [`ResultRecord`]s.
//!
//! The endpoint returns one object per field, each mapping a row key to a
//! value:
//!
//! ```json
//! { "results": { "card": {"0": "Charizard"}, "id": {"0": "4/102"},
//!                "card_count": {"0": "1"}, "Ungraded": {"0": "$350.00"}, ... } }
//! ```
//!
//! Columns may also arrive as plain arrays. Nothing outside this module
//! depends on that shape.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{PricerError, Result};
use crate::models::{Grade, GradeMap, ResultRecord};

#[derive(Debug, Deserialize)]
struct Envelope {
    results: Map<String, Value>,
}

/// Decode a `/results` response body.
pub fn decode(body: &str) -> Result<Vec<ResultRecord>> {
    let envelope: Envelope = serde_json::from_str(body)?;
    from_columns(&envelope.results)
}

/// Reshape a column map into row-oriented records.
///
/// Row order and row keys come from the `card` column. A missing cell in any
/// other column becomes an empty string, which aggregates as zero.
pub fn from_columns(columns: &Map<String, Value>) -> Result<Vec<ResultRecord>> {
    let card_col = columns.get("card").ok_or_else(missing_card_column)?;
    let keys = row_keys(card_col)?;

    let records = keys
        .iter()
        .map(|key| {
            let cell = |name: &str| {
                columns
                    .get(name)
                    .and_then(|col| lookup(col, key))
                    .map(cell_text)
                    .unwrap_or_default()
            };
            ResultRecord {
                grades: GradeMap::from_fn(|i| cell(Grade::ALL[i].label())),
                final_link: cell("final_link"),
                img_link: cell("img_link"),
                ..ResultRecord::new(&cell("card"), &cell("id"), &cell("card_count"))
            }
        })
        .collect();

    Ok(records)
}

/// Address of one row within a column.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RowKey {
    position: usize,
    key: String,
}

fn row_keys(card_col: &Value) -> Result<Vec<RowKey>> {
    match card_col {
        Value::Array(items) => Ok((0..items.len())
            .map(|i| RowKey {
                position: i,
                key: i.to_string(),
            })
            .collect()),
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            // numeric keys in numeric order, anything else after, by name
            keys.sort_by(|a, b| match (a.parse::<u64>(), b.parse::<u64>()) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                (Ok(_), Err(_)) => std::cmp::Ordering::Less,
                (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
                (Err(_), Err(_)) => a.cmp(b),
            });
            Ok(keys
                .into_iter()
                .enumerate()
                .map(|(i, k)| RowKey {
                    position: i,
                    key: k.clone(),
                })
                .collect())
        }
        _ => Err(missing_card_column()),
    }
}

fn missing_card_column() -> PricerError {
    PricerError::NotFound("results payload has no 'card' column".to_string())
}

fn lookup<'v>(col: &'v Value, key: &RowKey) -> Option<&'v Value> {
    match col {
        Value::Object(map) => map.get(&key.key),
        Value::Array(items) => items.get(key.position),
        _ => None,
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
