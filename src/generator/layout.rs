//! Page layout for quote documents.
//!
//! Produces positioned cells on A4 pages from a [`QuoteSnapshot`]. The layout is
//! a pure value so it can be inspected without rendering a PDF. Coordinates are
//! millimeters from the top-left corner of the page.

use crate::config::money::{format_currency, format_plain};
use crate::config::{DESCRIPTION_COLUMN_CHARS, FINISH_COLUMN_CHARS};
use crate::model::{LineItem, QuoteSnapshot};
use chrono::NaiveDateTime;
use serde::Serialize;

use super::metrics::wrap_text;

/// A4 page width.
pub const PAGE_WIDTH_MM: f32 = 210.0;
/// A4 page height.
pub const PAGE_HEIGHT_MM: f32 = 297.0;
/// Left, right and top margin.
pub const MARGIN_MM: f32 = 10.0;
/// Rows may not extend into this strip at the bottom of the page.
pub const BOTTOM_MARGIN_MM: f32 = 15.0;
/// Horizontal padding between a cell edge and its text.
pub const CELL_PADDING_MM: f32 = 1.0;

/// Document title line.
pub const TITLE: &str = "GLASS AND MIRROR QUOTE";

/// Table headers in column order.
pub const TABLE_HEADERS: [&str; 10] = [
    "Description",
    "Material",
    "Thick.",
    "Finish",
    "W (m)",
    "H (m)",
    "Qty",
    "Tot. Area",
    "Surch.%",
    "Total Value",
];

/// Table column widths, summing to the content width.
pub const COLUMN_WIDTHS_MM: [f32; 10] = [42.0, 16.0, 12.0, 18.0, 13.0, 13.0, 10.0, 18.0, 14.0, 24.0];

const TITLE_HEIGHT: f32 = 12.0;
const DATE_HEIGHT: f32 = 6.0;
const CLIENT_HEIGHT: f32 = 7.0;
const PRICE_LINE_HEIGHT: f32 = 6.0;
const HEADER_ROW_HEIGHT: f32 = 8.0;
const ITEM_ROW_HEIGHT: f32 = 7.0;
const TOTAL_ROW_HEIGHT: f32 = 8.0;
const GRAND_TOTAL_HEIGHT: f32 = 10.0;
const TOTAL_LABEL_WIDTH: f32 = 100.0;
const NOTES_LABEL_HEIGHT: f32 = 7.0;
const NOTES_LINE_HEIGHT: f32 = 6.0;

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Brand blue for the title, header row and grand total.
    pub const BLUE: RgbColor = RgbColor::new(26, 111, 168);
    /// Shading for every other item row.
    pub const LIGHT_BLUE: RgbColor = RgbColor::new(235, 245, 255);
    pub const WHITE: RgbColor = RgbColor::new(255, 255, 255);
    pub const BLACK: RgbColor = RgbColor::new(0, 0, 0);
    pub const DARK_GRAY: RgbColor = RgbColor::new(60, 60, 60);
    pub const GRAY: RgbColor = RgbColor::new(80, 80, 80);
}

/// Horizontal text alignment inside a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Helvetica weight and size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FontStyle {
    pub bold: bool,
    pub size_pt: f32,
}

impl FontStyle {
    pub const fn regular(size_pt: f32) -> Self {
        Self { bold: false, size_pt }
    }

    pub const fn bold(size_pt: f32) -> Self {
        Self { bold: true, size_pt }
    }
}

/// A positioned box with optional text, fill and border.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub text: String,
    pub align: Align,
    pub font: FontStyle,
    pub text_color: RgbColor,
    pub fill: Option<RgbColor>,
    pub border: bool,
}

/// One page of cells, in drawing order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Page {
    pub cells: Vec<Cell>,
}

impl Page {
    /// Whether any cell on this page has exactly this text.
    pub fn contains_text(&self, text: &str) -> bool {
        self.cells.iter().any(|cell| cell.text == text)
    }
}

/// Fully positioned document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentLayout {
    /// Document title for PDF metadata.
    pub title: String,
    /// Generation time, also printed on the first page.
    pub generated_at: NaiveDateTime,
    pub pages: Vec<Page>,
}

impl DocumentLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All cells across pages, in order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.pages.iter().flat_map(|page| page.cells.iter())
    }

    /// First cell with exactly this text.
    pub fn find_text(&self, text: &str) -> Option<&Cell> {
        self.cells().find(|cell| cell.text == text)
    }

    /// Whether any cell starts with the given prefix.
    pub fn has_text_starting_with(&self, prefix: &str) -> bool {
        self.cells().any(|cell| cell.text.starts_with(prefix))
    }
}

/// Cursor-based writer that places cells and breaks pages.
struct LayoutWriter {
    pages: Vec<Page>,
    x: f32,
    y: f32,
    font: FontStyle,
    text_color: RgbColor,
    fill_color: RgbColor,
}

impl LayoutWriter {
    fn new() -> Self {
        Self {
            pages: vec![Page::default()],
            x: MARGIN_MM,
            y: MARGIN_MM,
            font: FontStyle::regular(10.0),
            text_color: RgbColor::BLACK,
            fill_color: RgbColor::WHITE,
        }
    }

    fn set_font(&mut self, font: FontStyle) {
        self.font = font;
    }

    fn set_text_color(&mut self, color: RgbColor) {
        self.text_color = color;
    }

    fn set_fill_color(&mut self, color: RgbColor) {
        self.fill_color = color;
    }

    fn content_width() -> f32 {
        PAGE_WIDTH_MM - 2.0 * MARGIN_MM
    }

    /// Start a new page when a cell of this height would cross the bottom margin.
    fn break_page_if_needed(&mut self, height: f32) {
        if self.y + height > PAGE_HEIGHT_MM - BOTTOM_MARGIN_MM {
            self.pages.push(Page::default());
            self.y = MARGIN_MM;
        }
    }

    /// Place a cell at the cursor and advance to its right edge.
    ///
    /// A width of zero stretches the cell to the right margin.
    fn cell(&mut self, width: f32, height: f32, text: impl Into<String>, align: Align, border: bool, fill: bool) {
        self.break_page_if_needed(height);

        let width = if width == 0.0 {
            PAGE_WIDTH_MM - MARGIN_MM - self.x
        } else {
            width
        };

        let cell = Cell {
            x: self.x,
            y: self.y,
            width,
            height,
            text: text.into(),
            align,
            font: self.font,
            text_color: self.text_color,
            fill: fill.then_some(self.fill_color),
            border,
        };

        if let Some(page) = self.pages.last_mut() {
            page.cells.push(cell);
        }
        self.x += width;
    }

    /// Move to the left margin, `height` further down.
    fn newline(&mut self, height: f32) {
        self.x = MARGIN_MM;
        self.y += height;
    }

    /// Wrapped left-aligned text spanning the content width.
    fn paragraph(&mut self, line_height: f32, text: &str) {
        let max_width = Self::content_width() - 2.0 * CELL_PADDING_MM;
        for line in wrap_text(text, max_width, self.font.size_pt, self.font.bold) {
            self.cell(0.0, line_height, line, Align::Left, false, false);
            self.newline(line_height);
        }
    }

    fn finish(self) -> Vec<Page> {
        self.pages
    }
}

/// Truncate to at most `max` characters.
fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Formatted table cells for one item, in column order.
pub fn table_row(item: &LineItem) -> [String; 10] {
    [
        truncate_chars(item.description(), DESCRIPTION_COLUMN_CHARS),
        item.material().label().to_string(),
        item.thickness().to_string(),
        truncate_chars(item.finish().label(), FINISH_COLUMN_CHARS),
        format!("{:.2}", item.width_m()),
        format!("{:.2}", item.height_m()),
        item.quantity().to_string(),
        format!("{:.3}", item.total_area_m2()),
        format!("{:.1}%", item.surcharge_pct()),
        format_currency(item.total_value()),
    ]
}

/// Text of the generation date line.
pub fn date_line(generated_at: &NaiveDateTime) -> String {
    format!("Date: {}", generated_at.format("%d/%m/%Y %H:%M"))
}

/// Text of the reference price line.
pub fn reference_price_line(glass: f64, mirror: f64) -> String {
    format!(
        "Reference price - Glass: R$ {}/m2   |   Mirror: R$ {}/m2",
        format_plain(glass),
        format_plain(mirror)
    )
}

/// Lay out a quote snapshot on A4 pages.
pub fn build_layout(snapshot: &QuoteSnapshot<'_>) -> DocumentLayout {
    let mut w = LayoutWriter::new();

    // Title
    w.set_font(FontStyle::bold(18.0));
    w.set_text_color(RgbColor::BLUE);
    w.cell(0.0, TITLE_HEIGHT, TITLE, Align::Center, false, false);
    w.newline(TITLE_HEIGHT);

    // Date
    w.set_font(FontStyle::regular(10.0));
    w.set_text_color(RgbColor::GRAY);
    w.cell(0.0, DATE_HEIGHT, date_line(&snapshot.generated_at), Align::Right, false, false);
    w.newline(DATE_HEIGHT);
    w.newline(2.0);

    // Client
    if let Some(client) = snapshot.client_name.filter(|c| !c.trim().is_empty()) {
        w.set_font(FontStyle::bold(11.0));
        w.set_text_color(RgbColor::BLACK);
        w.cell(0.0, CLIENT_HEIGHT, format!("Client: {}", client), Align::Left, false, false);
        w.newline(CLIENT_HEIGHT);
    }

    // Reference prices
    w.set_font(FontStyle::regular(10.0));
    w.set_text_color(RgbColor::DARK_GRAY);
    w.cell(
        0.0,
        PRICE_LINE_HEIGHT,
        reference_price_line(snapshot.reference_price_glass, snapshot.reference_price_mirror),
        Align::Left,
        false,
        false,
    );
    w.newline(PRICE_LINE_HEIGHT);
    w.newline(4.0);

    // Table header
    w.set_fill_color(RgbColor::BLUE);
    w.set_text_color(RgbColor::WHITE);
    w.set_font(FontStyle::bold(8.0));
    for (header, width) in TABLE_HEADERS.iter().zip(COLUMN_WIDTHS_MM) {
        w.cell(width, HEADER_ROW_HEIGHT, *header, Align::Center, true, true);
    }
    w.newline(HEADER_ROW_HEIGHT);

    // Item rows, shaded alternately starting with white
    w.set_font(FontStyle::regular(8.0));
    w.set_text_color(RgbColor::BLACK);
    for (idx, item) in snapshot.items.iter().enumerate() {
        let shade = if idx % 2 == 1 {
            RgbColor::LIGHT_BLUE
        } else {
            RgbColor::WHITE
        };
        w.set_fill_color(shade);

        for (value, width) in table_row(item).into_iter().zip(COLUMN_WIDTHS_MM) {
            w.cell(width, ITEM_ROW_HEIGHT, value, Align::Center, true, true);
        }
        w.newline(ITEM_ROW_HEIGHT);
    }
    w.newline(4.0);

    // Totals
    let totals = &snapshot.totals;
    w.set_font(FontStyle::bold(10.0));
    w.set_text_color(RgbColor::BLACK);
    w.cell(TOTAL_LABEL_WIDTH, TOTAL_ROW_HEIGHT, "Total Glass:", Align::Right, false, false);
    w.cell(0.0, TOTAL_ROW_HEIGHT, format_currency(totals.total_glass), Align::Left, false, false);
    w.newline(TOTAL_ROW_HEIGHT);

    w.cell(TOTAL_LABEL_WIDTH, TOTAL_ROW_HEIGHT, "Total Mirror:", Align::Right, false, false);
    w.cell(0.0, TOTAL_ROW_HEIGHT, format_currency(totals.total_mirror), Align::Left, false, false);
    w.newline(TOTAL_ROW_HEIGHT);

    w.set_font(FontStyle::bold(12.0));
    w.set_fill_color(RgbColor::BLUE);
    w.set_text_color(RgbColor::WHITE);
    w.cell(TOTAL_LABEL_WIDTH, GRAND_TOTAL_HEIGHT, "GRAND TOTAL:", Align::Right, false, true);
    w.cell(0.0, GRAND_TOTAL_HEIGHT, format_currency(totals.total_general), Align::Left, false, true);
    w.newline(GRAND_TOTAL_HEIGHT);

    // Notes
    if let Some(notes) = snapshot.notes.filter(|n| !n.trim().is_empty()) {
        w.newline(4.0);
        w.set_font(FontStyle::bold(10.0));
        w.set_text_color(RgbColor::BLACK);
        w.cell(0.0, NOTES_LABEL_HEIGHT, "Notes:", Align::Left, false, false);
        w.newline(NOTES_LABEL_HEIGHT);
        w.set_font(FontStyle::regular(9.0));
        w.paragraph(NOTES_LINE_HEIGHT, notes);
    }

    let pages = w.finish();
    tracing::debug!(
        "Laid out {} item(s) on {} page(s)",
        snapshot.items.len(),
        pages.len()
    );

    DocumentLayout {
        title: TITLE.to_string(),
        generated_at: snapshot.generated_at,
        pages,
    }
}
