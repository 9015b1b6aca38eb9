//! CSV export, re-import of exported files and downloads.

mod common;

use card_pricer::export::{self, ExportedRow};
use card_pricer::format::{format_currency, parse_count, parse_price};
use card_pricer::models::{Grade, ResultRecord};
use card_pricer::upload;
use card_pricer::{PricerError, ResultsTable};

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

#[test]
fn parse_price_strips_formatting() {
    assert_eq!(parse_price("$1,234.50"), 1234.5);
    assert_eq!(parse_price(" 12 "), 12.0);
    assert_eq!(parse_price("-$3.00"), -3.0);
    assert_eq!(parse_price(""), 0.0);
    assert_eq!(parse_price("N/A"), 0.0);
    assert_eq!(parse_price("1.2.3"), 1.2);
    assert_eq!(parse_price("$12.50 - $15.00"), 12.5);
    assert_eq!(parse_price("$5-$7"), 5.0);
    assert_eq!(parse_price("$.75"), 0.75);
    assert_eq!(parse_price("--5"), 0.0);
}

#[test]
fn price_ranges_total_at_their_low_end() {
    let records = vec![ResultRecord::new("Mew", "8/102", "2").with_grade(Grade::Ungraded, "$12.50 - $15.00")];
    let table = ResultsTable::new(records);
    assert_eq!(table.totals().get(Grade::Ungraded), 25.0);
}

#[test]
fn parse_count_reads_leading_integer() {
    assert_eq!(parse_count("3"), 3);
    assert_eq!(parse_count(" 2 "), 2);
    assert_eq!(parse_count("4 copies"), 4);
    assert_eq!(parse_count("-1"), -1);
    assert_eq!(parse_count("x"), 0);
    assert_eq!(parse_count(""), 0);
}

#[test]
fn format_currency_uses_two_decimals() {
    assert_eq!(format_currency(2.0), "$2.00");
    assert_eq!(format_currency(1234.5), "$1234.50");
    assert_eq!(format_currency(-0.0), "$0.00");
}

// ---------------------------------------------------------------------------
// export_csv
// ---------------------------------------------------------------------------

#[test]
fn export_has_header_rows_and_totals() {
    let table = ResultsTable::new(common::sample_records());
    let body = export::export_csv(table.records(), &table.totals()).unwrap();
    let lines: Vec<&str> = body.lines().collect();

    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("Card,ID,Card Count,Ungraded,Grade 1,"));
    assert!(lines[0].ends_with("BGS 10 Black,CGC 10 Pristine,Final Link"));
    assert_eq!(lines[0].split(',').count(), 3 + Grade::COUNT + 1);
    assert!(lines[1].starts_with("Charizard,4/102,1,$350.00,"));
    assert!(lines[4].starts_with("Totals:,,7,$600.00,$0.00,"));
}

#[test]
fn prices_with_commas_are_quoted() {
    let records = vec![ResultRecord::new("Charizard", "4/102", "1").with_grade(Grade::Psa10, "$5,000.00")];
    let table = ResultsTable::new(records);
    let body = export::export_csv(table.records(), &table.totals()).unwrap();
    assert!(body.contains("\"$5,000.00\""));
    assert!(body.contains("$5000.00"));
}

#[test]
fn exported_rows_read_back_identically() {
    let mut table = ResultsTable::new(common::sample_records());
    table.toggle_exclude(2, false).unwrap();
    let body = export::export_csv(table.records(), &table.totals()).unwrap();

    let rows = export::parse_export(&body).unwrap();
    let expected: Vec<ExportedRow> = table.records().iter().map(ExportedRow::from).collect();
    assert_eq!(rows, expected);
    assert_eq!(rows[0].grades[Grade::Grade9.index()], "$1,200.00");
}

#[test]
fn totals_line_reflects_exclusions() {
    let mut table = ResultsTable::new(common::sample_records());
    table.toggle_exclude(0, false).unwrap();
    let body = export::export_csv(table.records(), &table.totals()).unwrap();
    let totals_line = body.lines().last().unwrap();
    assert!(totals_line.starts_with("Totals:,,6,$250.00,"));
}

#[test]
fn parse_export_requires_standard_header() {
    let err = export::parse_export("Card,ID\nMew,8/102\n").unwrap_err();
    assert!(matches!(err, PricerError::NotFound(_)));
}

// ---------------------------------------------------------------------------
// Downloads
// ---------------------------------------------------------------------------

#[test]
fn download_template_writes_file() {
    let (pricer, tmp) = common::pricer_for("http://localhost:3001");
    let path = pricer.download_template().unwrap();

    assert_eq!(path, tmp.path().join("card_template.csv"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), upload::template_csv());
}

#[test]
fn download_results_writes_export() {
    let (pricer, tmp) = common::pricer_for("http://localhost:3001");
    let table = ResultsTable::new(common::sample_records());

    let path = pricer.download_results(&table).unwrap();
    assert_eq!(path, tmp.path().join("results.csv"));

    let body = std::fs::read_to_string(&path).unwrap();
    assert_eq!(export::parse_export(&body).unwrap().len(), 3);
}

#[test]
fn download_results_overwrites_previous_file() {
    let (pricer, _tmp) = common::pricer_for("http://localhost:3001");
    let mut table = ResultsTable::new(common::sample_records());
    pricer.download_results(&table).unwrap();

    table.load(common::plain_records(1));
    let path = pricer.download_results(&table).unwrap();
    let body = std::fs::read_to_string(path).unwrap();
    assert_eq!(export::parse_export(&body).unwrap().len(), 1);
}

#[test]
fn empty_table_is_not_exported() {
    let (pricer, tmp) = common::pricer_for("http://localhost:3001");
    let err = pricer.download_results(&ResultsTable::default()).unwrap_err();
    assert!(matches!(err, PricerError::NotFound(_)));
    assert!(!tmp.path().join("results.csv").exists());
}

#[test]
fn download_dir_is_created_on_demand() {
    let tmp = tempfile::tempdir().unwrap();
    let nested = tmp.path().join("exports").join("cards");
    let pricer = card_pricer::CardPricer::builder()
        .download_dir(&nested)
        .build()
        .unwrap();

    let path = pricer.download_template().unwrap();
    assert!(path.starts_with(&nested));
    assert!(path.exists());
}
