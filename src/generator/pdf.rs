//! PDF rendering of a laid-out quote document.

use crate::error::{QuoteError, Result};
use printpdf::lopdf::{self, Object, StringFormat};
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, CustomPdfConformance, IndirectFontRef, Mm, OffsetDateTime, PdfConformance,
    PdfDocument, PdfLayerReference, Rect, Rgb,
};

use super::layout::{
    Align, Cell, DocumentLayout, RgbColor, CELL_PADDING_MM, PAGE_HEIGHT_MM, PAGE_WIDTH_MM,
};
use super::metrics::{text_width_mm, PT_TO_MM};

/// MIME type of exported documents.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Cell border line width in points.
const BORDER_THICKNESS_PT: f32 = 0.2;

/// Fonts registered once per document.
struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn pick(&self, bold: bool) -> &IndirectFontRef {
        if bold {
            &self.bold
        } else {
            &self.regular
        }
    }
}

fn pdf_color(color: RgbColor) -> Color {
    Color::Rgb(Rgb::new(
        color.r as f32 / 255.0,
        color.g as f32 / 255.0,
        color.b as f32 / 255.0,
        None,
    ))
}

fn pdf_error(err: impl std::fmt::Display) -> QuoteError {
    QuoteError::Pdf {
        message: err.to_string(),
    }
}

/// Stable document identifier for a generation time.
pub fn document_id(layout: &DocumentLayout) -> String {
    format!("quote-{}", layout.generated_at.format("%Y%m%d%H%M%S"))
}

/// Generation time as a PDF metadata date. The naive time is written as UTC.
fn pdf_date(layout: &DocumentLayout) -> Result<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp(layout.generated_at.and_utc().timestamp()).map_err(pdf_error)
}

/// Replace the trailer `/ID` pair, which printpdf fills with random strings.
fn pin_trailer_id(bytes: &[u8], id: &str) -> Result<Vec<u8>> {
    let mut pdf = lopdf::Document::load_mem(bytes).map_err(pdf_error)?;
    let id = Object::String(id.as_bytes().to_vec(), StringFormat::Literal);
    pdf.trailer.set("ID", Object::Array(vec![id.clone(), id]));

    let mut out = Vec::with_capacity(bytes.len());
    pdf.save_to(&mut out).map_err(pdf_error)?;
    Ok(out)
}

/// File name offered for download, e.g. `quote_20240709_080500.pdf`.
pub fn quote_file_name(generated_at: &chrono::NaiveDateTime) -> String {
    format!("quote_{}.pdf", generated_at.format("%Y%m%d_%H%M%S"))
}

/// X position of the text baseline start for a cell.
fn text_x(cell: &Cell) -> f32 {
    let text_width = text_width_mm(&cell.text, cell.font.size_pt, cell.font.bold);
    match cell.align {
        Align::Left => cell.x + CELL_PADDING_MM,
        Align::Center => cell.x + (cell.width - text_width) / 2.0,
        Align::Right => cell.x + cell.width - CELL_PADDING_MM - text_width,
    }
}

/// Baseline of vertically centered text, in layout (top-down) coordinates.
fn text_baseline(cell: &Cell) -> f32 {
    cell.y + 0.5 * cell.height + 0.3 * cell.font.size_pt * PT_TO_MM
}

/// Draw one cell: background and border first, then text.
fn draw_cell(layer: &PdfLayerReference, fonts: &Fonts, cell: &Cell) {
    // PDF coordinates grow upwards from the bottom edge.
    let bottom = PAGE_HEIGHT_MM - cell.y - cell.height;
    let top = PAGE_HEIGHT_MM - cell.y;

    let mode = match (cell.fill.is_some(), cell.border) {
        (true, true) => Some(PaintMode::FillStroke),
        (true, false) => Some(PaintMode::Fill),
        (false, true) => Some(PaintMode::Stroke),
        (false, false) => None,
    };

    if let Some(mode) = mode {
        if let Some(fill) = cell.fill {
            layer.set_fill_color(pdf_color(fill));
        }
        if cell.border {
            layer.set_outline_color(pdf_color(RgbColor::BLACK));
            layer.set_outline_thickness(BORDER_THICKNESS_PT);
        }
        let rect = Rect::new(Mm(cell.x), Mm(bottom), Mm(cell.x + cell.width), Mm(top)).with_mode(mode);
        layer.add_rect(rect);
    }

    if cell.text.is_empty() {
        return;
    }

    layer.set_fill_color(pdf_color(cell.text_color));
    layer.use_text(
        cell.text.as_str(),
        cell.font.size_pt,
        Mm(text_x(cell)),
        Mm(PAGE_HEIGHT_MM - text_baseline(cell)),
        fonts.pick(cell.font.bold),
    );
}

/// Render a layout into PDF bytes.
pub fn render_pdf(layout: &DocumentLayout) -> Result<Vec<u8>> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        layout.title.as_str(),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );

    // Skip the XMP block: it carries a random instance id.
    let date = pdf_date(layout)?;
    let doc = doc
        .with_conformance(PdfConformance::Custom(CustomPdfConformance {
            requires_icc_profile: false,
            requires_xmp_metadata: false,
            ..Default::default()
        }))
        .with_creation_date(date)
        .with_mod_date(date)
        .with_metadata_date(date);

    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?,
    };

    for (idx, page) in layout.pages.iter().enumerate() {
        let layer = if idx == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_idx, layer_idx) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            doc.get_page(page_idx).get_layer(layer_idx)
        };

        for cell in &page.cells {
            draw_cell(&layer, &fonts, cell);
        }
    }

    let bytes = doc.save_to_bytes().map_err(pdf_error)?;
    let bytes = pin_trailer_id(&bytes, &document_id(layout))?;

    tracing::debug!(
        "Rendered {} page(s), {} bytes",
        layout.page_count(),
        bytes.len()
    );
    Ok(bytes)
}
