//! Column totals over priced records.

use serde::Serialize;

use crate::format::parse_price;
use crate::models::{CardVariant, Grade, GradeMap, ResultRecord};

/// Summed card count and per-grade value (`price × count`).
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Totals {
    pub card_count: i64,
    pub by_grade: GradeMap<f64>,
}

impl Totals {
    pub fn get(&self, grade: Grade) -> f64 {
        *self.by_grade.get(grade)
    }

    fn add(&mut self, record: &ResultRecord, grades: impl Iterator<Item = Grade>) {
        let count = record.count();
        for grade in grades {
            *self.by_grade.get_mut(grade) += parse_price(record.grades.get(grade)) * count as f64;
        }
    }
}

/// Totals over every record that is not excluded.
///
/// Pure function of its input: calling it repeatedly on the same records
/// yields identical totals.
pub fn compute_totals(records: &[ResultRecord]) -> Totals {
    let mut totals = Totals::default();
    for record in records.iter().filter(|r| !r.is_excluded) {
        totals.card_count += record.count();
        totals.add(record, Grade::ALL.iter().copied());
    }
    totals
}

/// Totals restricted to each record's selected grade.
///
/// Only records with a selection contribute, each to its own grade column.
/// Exclusion is ignored.
pub fn compute_estimated_totals(records: &[ResultRecord]) -> Totals {
    let mut totals = Totals::default();
    for record in records {
        if let Some(grade) = record.selected_grade {
            totals.card_count += record.count();
            totals.add(record, std::iter::once(grade));
        }
    }
    totals
}

/// Per-grade unit prices of a variant: the parent's prices scaled by the
/// variant's modifier.
pub fn variant_prices(parent: &ResultRecord, variant: &CardVariant) -> GradeMap<f64> {
    GradeMap::from_fn(|i| {
        let grade = Grade::ALL[i];
        parse_price(parent.grades.get(grade)) * variant.price_modifier
    })
}
