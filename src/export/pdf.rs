//! Tabular-document adapter. Renders the payout table as a paginated PDF
//! with a title line, the shared header row on every page, and one row per
//! entry. Built directly as a minimal PDF 1.4 file (objects, content
//! streams, xref); no re-aggregation, no network, no local side effects —
//! the caller persists the bytes.

use crate::export::{row_cells, HEADER};
use crate::payout::PayoutRow;

const PAGE_WIDTH: f64 = 595.0; // A4 portrait, points
const PAGE_HEIGHT: f64 = 842.0;
const MARGIN_TOP: f64 = 56.0;
const LINE_HEIGHT: f64 = 16.0;
const COLUMN_X: [f64; 3] = [56.0, 320.0, 420.0];

/// Data rows per page; the title and header consume the rest of the column.
const ROWS_PER_PAGE: usize = 42;

pub const TITLE: &str = "Payout Report";

/// Escape the PDF string-literal specials.
fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            '\\' => out.push_str("\\\\"),
            c => out.push(c),
        }
    }
    out
}

struct ContentStream {
    ops: String,
}

impl ContentStream {
    fn new() -> Self {
        Self { ops: String::new() }
    }

    fn text(&mut self, font: &str, size: u32, x: f64, y: f64, s: &str) {
        self.ops.push_str(&format!(
            "BT /{font} {size} Tf {x:.1} {y:.1} Td ({}) Tj ET\n",
            escape_text(s)
        ));
    }

    fn cells(&mut self, font: &str, size: u32, y: f64, cells: &[String]) {
        for (x, cell) in COLUMN_X.iter().zip(cells) {
            self.text(font, size, *x, y, cell);
        }
    }
}

/// Lay the table out page by page. The header repeats on every page; the
/// title appears on the first page only.
fn layout(rows: &[PayoutRow]) -> Vec<ContentStream> {
    let header: Vec<String> = HEADER.iter().map(|h| h.to_string()).collect();
    let chunks: Vec<&[PayoutRow]> = if rows.is_empty() {
        vec![&[]]
    } else {
        rows.chunks(ROWS_PER_PAGE).collect()
    };

    let mut pages = Vec::with_capacity(chunks.len());
    for (page_no, chunk) in chunks.iter().enumerate() {
        let mut page = ContentStream::new();
        let mut y = PAGE_HEIGHT - MARGIN_TOP;
        if page_no == 0 {
            page.text("F2", 14, COLUMN_X[0], y, TITLE);
            y -= 2.0 * LINE_HEIGHT;
        }
        page.cells("F2", 11, y, &header);
        y -= LINE_HEIGHT;
        for row in *chunk {
            page.cells("F1", 10, y, &row_cells(row));
            y -= LINE_HEIGHT;
        }
        pages.push(page);
    }
    pages
}

/// Assemble the document: catalog, page tree, two Type1 fonts, then a page
/// object and content stream per page, finished with the xref table.
pub fn render(rows: &[PayoutRow]) -> Vec<u8> {
    let pages = layout(rows);

    // Object ids: 1 catalog, 2 page tree, 3/4 fonts, then (page, content)
    // pairs; page i occupies 5+2i, its content 6+2i.
    let page_obj = |i: usize| 5 + 2 * i;
    let content_obj = |i: usize| 6 + 2 * i;

    let kids = (0..pages.len())
        .map(|i| format!("{} 0 R", page_obj(i)))
        .collect::<Vec<_>>()
        .join(" ");

    let mut objects: Vec<(usize, Vec<u8>)> = vec![
        (1, b"<< /Type /Catalog /Pages 2 0 R >>".to_vec()),
        (
            2,
            format!(
                "<< /Type /Pages /Kids [{kids}] /Count {} >>",
                pages.len()
            )
            .into_bytes(),
        ),
        (
            3,
            b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_vec(),
        ),
        (
            4,
            b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold >>".to_vec(),
        ),
    ];

    for (i, page) in pages.iter().enumerate() {
        objects.push((
            page_obj(i),
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH:.0} {PAGE_HEIGHT:.0}] \
                 /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
                content_obj(i)
            )
            .into_bytes(),
        ));
        let stream = page.ops.as_bytes();
        let mut body = format!("<< /Length {} >>\nstream\n", stream.len()).into_bytes();
        body.extend_from_slice(stream);
        body.extend_from_slice(b"endstream");
        objects.push((content_obj(i), body));
    }

    let mut out: Vec<u8> = b"%PDF-1.4\n".to_vec();
    let mut offsets = vec![0usize; objects.len() + 1];
    for (id, body) in &objects {
        offsets[*id] = out.len();
        out.extend_from_slice(format!("{id} 0 obj\n").as_bytes());
        out.extend_from_slice(body);
        out.extend_from_slice(b"\nendobj\n");
    }

    let xref_start = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in offsets.iter().skip(1) {
        out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_start}\n%%EOF\n",
            objects.len() + 1
        )
        .as_bytes(),
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: usize) -> Vec<PayoutRow> {
        (0..n)
            .map(|i| PayoutRow {
                author: format!("Author {i}"),
                count: 1,
                total: 1.0,
            })
            .collect()
    }

    fn as_text(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    #[test]
    fn document_has_pdf_header_and_trailer() {
        let doc = render(&rows(3));
        assert!(doc.starts_with(b"%PDF-1.4"));
        assert!(as_text(&doc).contains("%%EOF"));
    }

    #[test]
    fn small_table_fits_one_page() {
        let text = as_text(&render(&rows(5)));
        assert!(text.contains("/Count 1"));
        assert!(text.contains(TITLE));
        assert!(text.contains("Total Payout"));
    }

    #[test]
    fn long_table_paginates() {
        let text = as_text(&render(&rows(ROWS_PER_PAGE + 1)));
        assert!(text.contains("/Count 2"));
        // The header repeats on the continuation page.
        assert_eq!(text.matches("(Author) Tj").count(), 2);
        // The title does not.
        assert_eq!(text.matches(&format!("({TITLE}) Tj")).count(), 1);
    }

    #[test]
    fn empty_table_still_renders_a_page() {
        let text = as_text(&render(&[]));
        assert!(text.contains("/Count 1"));
    }

    #[test]
    fn parens_in_authors_are_escaped() {
        let doc = render(&[PayoutRow {
            author: "Doe (Jane)".into(),
            count: 1,
            total: 1.0,
        }]);
        assert!(as_text(&doc).contains(r"(Doe \(Jane\)) Tj"));
    }
}
