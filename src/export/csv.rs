//! Delimited-text adapter. Emits the payout table as RFC-4180-style CSV:
//! fields containing a comma, quote, CR or LF are quoted, embedded quotes
//! doubled. Synchronous and local; the caller persists the result.

use crate::export::{row_cells, HEADER};
use crate::payout::PayoutRow;

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn write_record(out: &mut String, cells: &[String]) {
    let line = cells
        .iter()
        .map(|c| escape_field(c))
        .collect::<Vec<_>>()
        .join(",");
    out.push_str(&line);
    out.push_str("\r\n");
}

/// Serialize header + one record per row. Never fails.
pub fn render(rows: &[PayoutRow]) -> String {
    let mut out = String::new();
    let header: Vec<String> = HEADER.iter().map(|h| h.to_string()).collect();
    write_record(&mut out, &header);
    for row in rows {
        write_record(&mut out, &row_cells(row));
    }
    out
}
