//! Results: wire decoding, totals, exclusion and variant expansion.

mod common;

use card_pricer::models::{CardVariant, Grade, RecordDisplay, ResultRecord, VariantState};
use card_pricer::results::{compute_totals, variant_prices, wire};
use card_pricer::{PricerError, ResultsTable};
use httpmock::prelude::*;
use serde_json::json;

fn variant(name: &str, modifier: f64) -> CardVariant {
    CardVariant {
        type_field: "print".into(),
        name: name.into(),
        id: "4/102".into(),
        img_link: String::new(),
        final_link: String::new(),
        price_modifier: modifier,
    }
}

// ---------------------------------------------------------------------------
// Wire decoding
// ---------------------------------------------------------------------------

#[test]
fn decode_reshapes_object_columns_into_records() {
    let body = common::results_body(&[
        ("Charizard", "4/102", "1", &[("Ungraded", "$350.00"), ("PSA 10", "$5,000.00")]),
        ("Blastoise", "2/102", "2", &[("Ungraded", "$120.00")]),
    ]);
    let records = wire::decode(&body.to_string()).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].card, "Charizard");
    assert_eq!(records[0].id, "4/102");
    assert_eq!(records[0].grades[Grade::Psa10], "$5,000.00");
    assert_eq!(records[0].final_link, "https://prices.example.com/0");
    assert_eq!(records[1].count(), 2);
    assert_eq!(records[1].grades[Grade::Psa10], "");
}

#[test]
fn decode_orders_rows_numerically() {
    let body = json!({
        "results": {
            "card": { "10": "Mew", "2": "Onix", "0": "Abra" },
            "card_count": { "0": 1, "2": 2, "10": 3 }
        }
    });
    let records = wire::decode(&body.to_string()).unwrap();
    let names: Vec<&str> = records.iter().map(|r| r.card.as_str()).collect();
    assert_eq!(names, vec!["Abra", "Onix", "Mew"]);
    assert_eq!(records[2].card_count, "3");
    assert_eq!(records[0].id, "");
}

#[test]
fn decode_accepts_array_columns() {
    let body = json!({
        "results": {
            "card": ["Abra", "Onix"],
            "id": ["63/102", null],
            "Grade 9": ["$10.00"]
        }
    });
    let records = wire::decode(&body.to_string()).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].grades[Grade::Grade9], "$10.00");
    assert_eq!(records[1].id, "");
    assert_eq!(records[1].grades[Grade::Grade9], "");
}

#[test]
fn decode_without_card_column_fails() {
    let body = json!({ "results": { "id": { "0": "4/102" } } });
    let err = wire::decode(&body.to_string()).unwrap_err();
    assert!(matches!(err, PricerError::NotFound(_)));
}

// ---------------------------------------------------------------------------
// Totals
// ---------------------------------------------------------------------------

#[test]
fn excluded_records_do_not_count() {
    let mut b = ResultRecord::new("B", "2", "1").with_grade(Grade::Ungraded, "$5.00");
    b.is_excluded = true;
    let records = vec![
        ResultRecord::new("A", "1", "2").with_grade(Grade::Ungraded, "$1.00"),
        b,
    ];

    let totals = compute_totals(&records);
    assert_eq!(totals.get(Grade::Ungraded), 2.00);
    assert_eq!(totals.card_count, 2);
}

#[test]
fn totals_are_idempotent() {
    let table = ResultsTable::new(common::sample_records());
    let first = table.totals();
    let second = table.totals();
    assert_eq!(first, second);
}

#[test]
fn totals_parse_formatted_prices() {
    let table = ResultsTable::new(common::sample_records());
    let totals = table.totals();

    assert_eq!(totals.card_count, 7);
    assert_eq!(totals.get(Grade::Ungraded), 350.0 + 240.0 + 10.0);
    // "N/A" is worth nothing
    assert_eq!(totals.get(Grade::Grade9), 1200.0 + 800.0);
    assert_eq!(totals.get(Grade::Psa10), 5000.0 + 3000.0);
    assert_eq!(totals.get(Grade::Bgs10Black), 0.0);
}

#[test]
fn unparsable_count_contributes_zero() {
    let records = vec![ResultRecord::new("A", "1", "several").with_grade(Grade::Ungraded, "$9.00")];
    let totals = compute_totals(&records);
    assert_eq!(totals.card_count, 0);
    assert_eq!(totals.get(Grade::Ungraded), 0.0);
}

#[test]
fn estimated_totals_use_selected_grades_only() {
    let mut table = ResultsTable::new(common::sample_records());
    table.select_grade(0, Some(Grade::Psa10)).unwrap();
    table.select_grade(1, Some(Grade::Ungraded)).unwrap();
    table.toggle_exclude(1, false).unwrap();

    let est = table.estimated_totals();
    assert_eq!(est.card_count, 3);
    assert_eq!(est.get(Grade::Psa10), 5000.0);
    assert_eq!(est.get(Grade::Ungraded), 240.0);
    assert_eq!(est.get(Grade::Grade9), 0.0);

    table.select_grade(0, None).unwrap();
    assert_eq!(table.estimated_totals().get(Grade::Psa10), 0.0);
}

// ---------------------------------------------------------------------------
// Exclusion clicks
// ---------------------------------------------------------------------------

#[test]
fn plain_click_toggles_one_record() {
    let mut table = ResultsTable::new(common::plain_records(3));
    table.toggle_exclude(1, false).unwrap();
    assert!(table.records()[1].is_excluded);
    table.toggle_exclude(1, false).unwrap();
    assert!(!table.records()[1].is_excluded);
    assert_eq!(table.anchor(), Some(1));
}

#[test]
fn shift_click_propagates_anchor_state() {
    let mut table = ResultsTable::new(common::plain_records(5));
    table.toggle_exclude(1, false).unwrap();
    table.toggle_exclude(3, true).unwrap();

    let excluded: Vec<bool> = table.records().iter().map(|r| r.is_excluded).collect();
    assert_eq!(excluded, vec![false, true, true, true, false]);
    assert_eq!(table.anchor(), Some(3));
}

#[test]
fn shift_click_works_backwards_and_sets_uniform_state() {
    let mut table = ResultsTable::new(common::plain_records(5));
    table.toggle_exclude(2, false).unwrap();
    table.toggle_exclude(2, false).unwrap();
    table.toggle_exclude(0, false).unwrap();
    table.toggle_exclude(4, false).unwrap();
    // anchor 4 is excluded; 0 is excluded, 2 is not
    table.toggle_exclude(1, true).unwrap();

    let excluded: Vec<bool> = table.records().iter().map(|r| r.is_excluded).collect();
    assert_eq!(excluded, vec![true, true, true, true, true]);
}

#[test]
fn shift_click_without_anchor_is_a_plain_click() {
    let mut table = ResultsTable::new(common::plain_records(3));
    table.toggle_exclude(2, true).unwrap();
    let excluded: Vec<bool> = table.records().iter().map(|r| r.is_excluded).collect();
    assert_eq!(excluded, vec![false, false, true]);
}

#[test]
fn exclusion_updates_totals() {
    let mut table = ResultsTable::new(common::sample_records());
    table.toggle_exclude(0, false).unwrap();
    assert_eq!(table.totals().card_count, 6);
    assert_eq!(table.totals().get(Grade::Psa10), 3000.0);
}

#[test]
fn click_out_of_range_is_an_error() {
    let mut table = ResultsTable::new(common::plain_records(2));
    assert!(table.toggle_exclude(2, false).is_err());
    assert_eq!(table.anchor(), None);
}

// ---------------------------------------------------------------------------
// Variant state machine
// ---------------------------------------------------------------------------

#[test]
fn expanding_requests_variants_once() {
    let mut table = ResultsTable::new(common::sample_records());

    let req = table.toggle_advanced(0).unwrap().unwrap();
    assert_eq!((req.index, req.card.as_str(), req.id.as_str()), (0, "Charizard", "4/102"));
    assert_eq!(table.records()[0].display(), RecordDisplay::ExpandedLoading);

    table.store_variants(0, Ok(vec![variant("Shadowless", 1.5)]));
    assert_eq!(table.records()[0].display(), RecordDisplay::ExpandedLoaded);

    assert!(table.toggle_advanced(0).unwrap().is_none());
    assert_eq!(table.records()[0].display(), RecordDisplay::Collapsed);
    assert_eq!(table.records()[0].variants.variants().len(), 1);

    // cached variants survive collapse; no second lookup
    assert!(table.toggle_advanced(0).unwrap().is_none());
    assert_eq!(table.records()[0].display(), RecordDisplay::ExpandedLoaded);
}

#[test]
fn failed_lookup_leaves_other_records_alone() {
    let mut table = ResultsTable::new(common::sample_records());
    table.toggle_advanced(1).unwrap();
    table.store_variants(1, Err(PricerError::NotFound("variants".into())));

    assert_eq!(table.records()[1].display(), RecordDisplay::ExpandedFailed);
    assert!(table.records()[1].variants.variants().is_empty());
    assert_eq!(table.records()[0].variants, VariantState::NotRequested);

    // a failed lookup is retried on the next expand
    table.toggle_advanced(1).unwrap();
    assert!(table.toggle_advanced(1).unwrap().is_some());
}

#[test]
fn exclusion_is_independent_of_expansion() {
    let mut table = ResultsTable::new(common::sample_records());
    table.toggle_advanced(0).unwrap();
    table.toggle_exclude(0, false).unwrap();
    assert_eq!(table.records()[0].display(), RecordDisplay::ExpandedLoading);
    assert!(table.records()[0].is_excluded);
}

#[test]
fn variant_prices_scale_parent_prices() {
    let records = common::sample_records();
    let prices = variant_prices(&records[0], &variant("Shadowless", 1.5));
    assert_eq!(prices[Grade::Ungraded], 525.0);
    assert_eq!(prices[Grade::Psa10], 7500.0);
    assert_eq!(prices[Grade::Grade1], 0.0);

    let mut table = ResultsTable::new(records);
    assert!(table.variant_prices(0, 0).is_err());
    table.toggle_advanced(0).unwrap();
    table.store_variants(0, Ok(vec![variant("Shadowless", 2.0)]));
    assert_eq!(table.variant_prices(0, 0).unwrap()[Grade::Grade9], 2400.0);
}

// ---------------------------------------------------------------------------
// Against the API
// ---------------------------------------------------------------------------

#[test]
fn load_results_fills_table() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/results");
        then.status(200).json_body(common::results_body(&[(
            "Charizard",
            "4/102",
            "1",
            &[("Ungraded", "$350.00")],
        )]));
    });

    let (pricer, _tmp) = common::pricer_for(&server.base_url());
    let mut table = ResultsTable::default();
    assert!(pricer.load_results(&mut table));
    mock.assert();
    assert_eq!(table.records().len(), 1);
    assert_eq!(table.totals().get(Grade::Ungraded), 350.0);
    assert!(table.error().is_none());
}

#[test]
fn failed_fetch_keeps_shown_records() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/results");
        then.status(503).body("unavailable");
    });

    let (pricer, _tmp) = common::pricer_for(&server.base_url());
    let mut table = ResultsTable::new(common::sample_records());
    assert!(!pricer.load_results(&mut table));
    assert_eq!(table.records().len(), 3);
    assert!(table.error().unwrap().contains("503"));
}

#[test]
fn expand_looks_up_variants() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/variants")
            .query_param("card", "Charizard")
            .query_param("id", "4/102");
        then.status(200).json_body(json!([{
            "type": "edition",
            "name": "Shadowless",
            "id": "4/102",
            "img_link": "https://img.example.com/shadowless.png",
            "price_modifier": 1.8
        }]));
    });

    let (pricer, _tmp) = common::pricer_for(&server.base_url());
    let mut table = ResultsTable::new(common::sample_records());

    let state = pricer.expand(&mut table, 0).unwrap();
    assert_eq!(state, RecordDisplay::ExpandedLoaded);
    let variants = table.records()[0].variants.variants();
    assert_eq!(variants[0].type_field, "edition");
    assert_eq!(variants[0].final_link, "");

    assert_eq!(pricer.expand(&mut table, 0).unwrap(), RecordDisplay::Collapsed);
    assert_eq!(pricer.expand(&mut table, 0).unwrap(), RecordDisplay::ExpandedLoaded);
    mock.assert_hits(1);
}

#[test]
fn expand_failure_is_reported_on_the_record() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/variants");
        then.status(404).body("no variants");
    });

    let (pricer, _tmp) = common::pricer_for(&server.base_url());
    let mut table = ResultsTable::new(common::sample_records());

    assert_eq!(pricer.expand(&mut table, 2).unwrap(), RecordDisplay::ExpandedFailed);
    assert!(pricer.expand(&mut table, 9).is_err());
}
