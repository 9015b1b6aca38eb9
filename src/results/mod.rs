//! Results aggregation: wire adapter, totals and the interactive table.

pub mod table;
pub mod totals;
pub mod wire;

pub use table::{ResultsTable, VariantRequest};
pub use totals::{compute_estimated_totals, compute_totals, variant_prices, Totals};
