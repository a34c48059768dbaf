//! glass-quote - Pricing and PDF export for glass and mirror cutting jobs.
//!
//! A [`Ledger`] holds the line items of one quoting session together with the
//! reference prices per m². The document generator turns an immutable
//! [`QuoteSnapshot`] of the ledger into a printable PDF.
//!
//! # Example
//!
//! ```no_run
//! use glass_quote::{export_pdf, ItemSpec, Ledger, Material};
//!
//! let mut ledger = Ledger::default();
//! ledger
//!     .add_item(ItemSpec::new("Living room window", Material::Glass, 2.0, 1.5).with_quantity(3))
//!     .unwrap();
//! let now = chrono::Local::now().naive_local();
//! let pdf = export_pdf(&ledger.snapshot(now)).unwrap();
//! std::fs::write("quote.pdf", pdf).unwrap();
//! ```

pub mod config;
pub mod error;
pub mod generator;
pub mod model;
pub mod parser;
pub mod validation;

// Re-exports for convenience
pub use config::QuoteConfig;
pub use error::{QuoteError, Result};
pub use generator::{build_layout, export_pdf, quote_file_name, DocumentLayout, PDF_MIME_TYPE};
pub use model::{Finish, ItemSpec, ItemUpdate, Ledger, LineItem, Material, QuoteSnapshot, Totals};
pub use parser::{load_session, parse_script_file, SessionScript};
pub use validation::{review_ledger, ValidationResult};

/// Export the current state of a ledger.
///
/// Takes a snapshot stamped with `generated_at`, reviews it and renders the PDF.
/// Review warnings are logged; they never block the export.
///
/// # Returns
///
/// The suggested file name and the document bytes.
pub fn export_quote(ledger: &Ledger, generated_at: chrono::NaiveDateTime) -> Result<(String, Vec<u8>)> {
    let review = review_ledger(ledger);
    for warning in &review.warnings {
        tracing::warn!("{}", warning);
    }

    let snapshot = ledger.snapshot(generated_at);
    let bytes = export_pdf(&snapshot)?;

    tracing::info!(
        "Exported quote with {} item(s), total {}",
        ledger.len(),
        config::money::format_currency(snapshot.totals.total_general)
    );

    Ok((quote_file_name(&generated_at), bytes))
}
