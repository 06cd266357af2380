// src/export/mod.rs
pub mod csv;
pub mod pdf;
pub mod sheets;

use crate::payout::PayoutRow;

/// Column headers shared by every adapter.
pub const HEADER: [&str; 3] = ["Author", "Articles", "Total Payout ($)"];

pub const CSV_FILENAME: &str = "payout_report.csv";
pub const PDF_FILENAME: &str = "payout_report.pdf";

/// Currency formatting: exactly two decimals on every adapter surface.
pub fn format_total(total: f64) -> String {
    format!("{total:.2}")
}

/// A payout row as the three display cells every adapter emits.
pub fn row_cells(row: &PayoutRow) -> [String; 3] {
    [
        row.author.clone(),
        row.count.to_string(),
        format_total(row.total),
    ]
}
