//! Validation logic for quote inputs and ledger review.

use crate::config::float_cmp::approx_zero;
use crate::config::{DESCRIPTION_COLUMN_CHARS, THICKNESS_OPTIONS};
use crate::error::{QuoteError, Result};
use crate::model::{ItemSpec, Ledger, Material};

/// Review result with warnings.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Whether validation passed.
    pub passed: bool,
    /// Warning messages.
    pub warnings: Vec<String>,
    /// Error messages.
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// Create a passing result.
    pub fn ok() -> Self {
        Self {
            passed: true,
            ..Default::default()
        }
    }

    /// Add a warning.
    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Add an error.
    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.passed = false;
    }
}

/// Reject non-finite numbers.
fn validate_finite(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(QuoteError::validation(field, format!("{} is not a number", value)));
    }
    Ok(())
}

/// Require a strictly positive real number.
pub fn validate_positive(field: &str, value: f64) -> Result<()> {
    validate_finite(field, value)?;
    if value <= 0.0 {
        return Err(QuoteError::validation(
            field,
            format!("must be greater than zero, got {}", value),
        ));
    }
    Ok(())
}

/// Require a real number that is zero or more.
pub fn validate_non_negative(field: &str, value: f64) -> Result<()> {
    validate_finite(field, value)?;
    if value < 0.0 {
        return Err(QuoteError::validation(
            field,
            format!("must not be negative, got {}", value),
        ));
    }
    Ok(())
}

/// Prices per m² may be zero but never negative.
pub fn validate_price(field: &str, price: f64) -> Result<()> {
    validate_non_negative(field, price)
}

/// A whole number of pieces, at least one. Returns the piece count.
pub fn validate_quantity(quantity: f64) -> Result<u32> {
    validate_finite("quantity", quantity)?;
    if quantity.fract() != 0.0 {
        return Err(QuoteError::validation(
            "quantity",
            format!("must be a whole number, got {}", quantity),
        ));
    }
    if quantity < 1.0 || quantity > f64::from(u32::MAX) {
        return Err(QuoteError::validation(
            "quantity",
            format!("must be at least 1, got {}", quantity),
        ));
    }
    Ok(quantity as u32)
}

/// Description must have text once whitespace is trimmed.
pub fn validate_description(description: &str) -> Result<()> {
    if description.trim().is_empty() {
        return Err(QuoteError::validation("description", "must not be empty"));
    }
    Ok(())
}

/// Check every input of a new line item. Stops at the first failure.
pub fn validate_item_spec(spec: &ItemSpec) -> Result<()> {
    validate_description(&spec.description)?;
    validate_positive("width_m", spec.width_m)?;
    validate_positive("height_m", spec.height_m)?;
    validate_quantity(spec.quantity)?;
    validate_non_negative("surcharge_pct", spec.surcharge_pct)?;
    Ok(())
}

/// Review a ledger before export.
///
/// Nothing here blocks an export except items whose stored values drifted
/// from their inputs.
pub fn review_ledger(ledger: &Ledger) -> ValidationResult {
    let mut result = ValidationResult::ok();

    if ledger.is_empty() {
        result.add_warning("Quote has no items");
    }

    for (idx, item) in ledger.items().iter().enumerate() {
        if item.description().chars().count() > DESCRIPTION_COLUMN_CHARS {
            result.add_warning(format!(
                "Item {}: Description '{}' will be truncated to {} characters",
                idx,
                item.description(),
                DESCRIPTION_COLUMN_CHARS
            ));
        }

        if !item.finish().is_finished() && item.surcharge_pct() > 0.0 {
            result.add_warning(format!(
                "Item {}: Surcharge of {:.1}% with no finish",
                idx,
                item.surcharge_pct()
            ));
        }

        if !THICKNESS_OPTIONS.iter().any(|t| *t == item.thickness()) {
            result.add_warning(format!(
                "Item {}: Unlisted thickness '{}'",
                idx,
                item.thickness()
            ));
        }

        if approx_zero(item.unit_price_per_m2()) {
            result.add_warning(format!("Item {}: Priced at zero per m²", idx));
        }

        if !item.is_consistent() {
            result.add_error(format!(
                "Item {}: Stored total {:.2} does not match its inputs",
                idx,
                item.total_value()
            ));
        }
    }

    for material in Material::ALL {
        if ledger.uses_material(material) && approx_zero(ledger.reference_price(material)) {
            result.add_warning(format!("{} reference price is zero", material));
        }
    }

    result
}
