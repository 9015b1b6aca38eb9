//! Shared test fixtures for the card-pricer integration tests.
//!
//! Provides sample priced records, a builder for the column-oriented
//! `/results` payload and a pricer wired to a mock server with progress
//! pacing disabled.

#![allow(dead_code)]

use card_pricer::endpoints::ProgressPacing;
use card_pricer::models::{Grade, ResultRecord};
use card_pricer::CardPricer;
use serde_json::{json, Map, Value};

/// Create a `CardPricer` pointed at `base_url` that writes downloads into a
/// fresh temp dir.
///
/// Returns `(CardPricer, tempfile::TempDir)`. The caller must keep the
/// `TempDir` alive for the duration of the test.
pub fn pricer_for(base_url: &str) -> (CardPricer, tempfile::TempDir) {
    let tmp_dir = tempfile::tempdir().unwrap();
    let pricer = CardPricer::builder()
        .api_base(base_url)
        .download_dir(tmp_dir.path())
        .pacing(ProgressPacing::disabled())
        .build()
        .unwrap();
    (pricer, tmp_dir)
}

/// Three priced cards with a handful of grades filled in.
pub fn sample_records() -> Vec<ResultRecord> {
    vec![
        ResultRecord::new("Charizard", "4/102", "1")
            .with_grade(Grade::Ungraded, "$350.00")
            .with_grade(Grade::Grade9, "$1,200.00")
            .with_grade(Grade::Psa10, "$5,000.00"),
        ResultRecord::new("Blastoise", "2/102", "2")
            .with_grade(Grade::Ungraded, "$120.00")
            .with_grade(Grade::Grade9, "$400.00")
            .with_grade(Grade::Psa10, "$1,500.00"),
        ResultRecord::new("Pikachu", "58/102", "4")
            .with_grade(Grade::Ungraded, "$2.50")
            .with_grade(Grade::Grade9, "N/A"),
    ]
}

/// `n` unpriced records named `Card 0`, `Card 1`, ...
pub fn plain_records(n: usize) -> Vec<ResultRecord> {
    (0..n)
        .map(|i| ResultRecord::new(&format!("Card {}", i), &i.to_string(), "1"))
        .collect()
}

/// Column-oriented `/results` body, one object per column keyed by row index.
///
/// `rows` holds `(card, id, count, [(grade label, price)])`.
pub fn results_body(rows: &[(&str, &str, &str, &[(&str, &str)])]) -> Value {
    let mut columns: Map<String, Value> = Map::new();
    let mut put = |column: &str, row: usize, value: &str| {
        columns
            .entry(column.to_string())
            .or_insert_with(|| json!({}))
            .as_object_mut()
            .unwrap()
            .insert(row.to_string(), json!(value));
    };

    for (i, (card, id, count, grades)) in rows.iter().enumerate() {
        put("card", i, card);
        put("id", i, id);
        put("card_count", i, count);
        put("final_link", i, &format!("https://prices.example.com/{}", i));
        for (label, price) in grades.iter() {
            put(label, i, price);
        }
    }

    json!({ "results": columns })
}
