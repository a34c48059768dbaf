//! Quote document generator module.

mod layout;
mod metrics;
mod pdf;

pub use layout::{
    build_layout, date_line, reference_price_line, table_row, Align, Cell, DocumentLayout,
    FontStyle, Page, RgbColor, COLUMN_WIDTHS_MM, TABLE_HEADERS, TITLE,
};
pub use metrics::{text_width_mm, wrap_text};
pub use pdf::{document_id, quote_file_name, render_pdf, PDF_MIME_TYPE};

use crate::error::Result;
use crate::model::QuoteSnapshot;

/// Lay out and render a snapshot as PDF bytes.
pub fn export_pdf(snapshot: &QuoteSnapshot<'_>) -> Result<Vec<u8>> {
    let layout = build_layout(snapshot);
    render_pdf(&layout)
}
