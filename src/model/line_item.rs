//! LineItem - One quoted piece of glass or mirror.

use super::{Finish, Material};
use crate::config::float_cmp::round_to;
use crate::config::{AREA_DECIMALS, MONEY_DECIMALS};
use crate::error::{QuoteError, Result};
use crate::validation;
use serde::{Deserialize, Serialize};

/// User-supplied inputs for a new line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSpec {
    /// Free-text description (window, shower box, ...).
    pub description: String,
    /// Material, selects the reference price.
    #[serde(default)]
    pub material: Material,
    /// Thickness label such as "8mm". Not interpreted.
    #[serde(default = "default_thickness")]
    pub thickness: String,
    /// Finish applied to the piece.
    #[serde(default)]
    pub finish: Finish,
    /// Width in meters.
    pub width_m: f64,
    /// Height in meters.
    pub height_m: f64,
    /// Number of identical pieces, as entered. Checked to be a whole number.
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    /// Percentage markup over the base value.
    #[serde(default)]
    pub surcharge_pct: f64,
}

fn default_thickness() -> String {
    "Other".to_string()
}

fn default_quantity() -> f64 {
    1.0
}

impl ItemSpec {
    /// Create a spec with one piece, no finish and no surcharge.
    pub fn new(description: impl Into<String>, material: Material, width_m: f64, height_m: f64) -> Self {
        Self {
            description: description.into(),
            material,
            thickness: default_thickness(),
            finish: Finish::None,
            width_m,
            height_m,
            quantity: 1.0,
            surcharge_pct: 0.0,
        }
    }

    pub fn with_thickness(mut self, thickness: impl Into<String>) -> Self {
        self.thickness = thickness.into();
        self
    }

    pub fn with_finish(mut self, finish: Finish) -> Self {
        self.finish = finish;
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = f64::from(quantity);
        self
    }

    pub fn with_surcharge(mut self, surcharge_pct: f64) -> Self {
        self.surcharge_pct = surcharge_pct;
        self
    }
}

/// Changes to an existing line item. Absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemUpdate {
    #[serde(default)]
    pub width_m: Option<f64>,
    #[serde(default)]
    pub height_m: Option<f64>,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub surcharge_pct: Option<f64>,
}

/// One quoted piece with its derived area and value.
///
/// The unit price is frozen when the item is created. Derived fields are only
/// ever written by [`LineItem::recompute`], which every setter calls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    description: String,
    material: Material,
    thickness: String,
    finish: Finish,
    width_m: f64,
    height_m: f64,
    quantity: u32,
    unit_price_per_m2: f64,
    surcharge_pct: f64,

    // === Derived ===
    area_m2: f64,
    total_area_m2: f64,
    unit_value: f64,
    total_value: f64,
}

impl LineItem {
    /// Validate a spec and build the item at the given unit price.
    pub fn new(spec: ItemSpec, unit_price_per_m2: f64) -> Result<Self> {
        validation::validate_item_spec(&spec)?;
        validation::validate_price("unit_price_per_m2", unit_price_per_m2)?;
        let quantity = validation::validate_quantity(spec.quantity)?;

        let mut item = Self {
            description: spec.description.trim().to_string(),
            material: spec.material,
            thickness: spec.thickness,
            finish: spec.finish,
            width_m: spec.width_m,
            height_m: spec.height_m,
            quantity,
            unit_price_per_m2,
            surcharge_pct: spec.surcharge_pct,
            area_m2: 0.0,
            total_area_m2: 0.0,
            unit_value: 0.0,
            total_value: 0.0,
        };
        item.recompute()?;
        Ok(item)
    }

    /// Recalculate every derived field from the inputs.
    ///
    /// Fails without touching the item when a product overflows.
    fn recompute(&mut self) -> Result<()> {
        let quantity = f64::from(self.quantity);
        let area = self.width_m * self.height_m;
        let unit_value = area * self.unit_price_per_m2 * (1.0 + self.surcharge_pct / 100.0);

        let area_m2 = round_to(area, AREA_DECIMALS);
        let total_area_m2 = round_to(area * quantity, AREA_DECIMALS);
        if !area_m2.is_finite() || !total_area_m2.is_finite() {
            return Err(QuoteError::validation("total_area_m2", "dimensions are too large"));
        }

        let unit_value = round_to(unit_value, MONEY_DECIMALS);
        let total_value = round_to(unit_value * quantity, MONEY_DECIMALS);
        if !unit_value.is_finite() || !total_value.is_finite() {
            return Err(QuoteError::validation("total_value", "too large to quote"));
        }

        self.area_m2 = area_m2;
        self.total_area_m2 = total_area_m2;
        self.unit_value = unit_value;
        self.total_value = total_value;
        Ok(())
    }

    /// Apply an edit to a copy and keep it only if it prices cleanly.
    fn change(&mut self, edit: impl FnOnce(&mut Self)) -> Result<()> {
        let mut next = self.clone();
        edit(&mut next);
        next.recompute()?;
        *self = next;
        Ok(())
    }

    /// Change the piece dimensions.
    pub fn set_dimensions(&mut self, width_m: f64, height_m: f64) -> Result<()> {
        validation::validate_positive("width_m", width_m)?;
        validation::validate_positive("height_m", height_m)?;
        self.change(|item| {
            item.width_m = width_m;
            item.height_m = height_m;
        })
    }

    /// Change the number of pieces.
    pub fn set_quantity(&mut self, quantity: u32) -> Result<()> {
        validation::validate_quantity(f64::from(quantity))?;
        self.change(|item| item.quantity = quantity)
    }

    /// Change the surcharge percentage.
    pub fn set_surcharge_pct(&mut self, surcharge_pct: f64) -> Result<()> {
        validation::validate_non_negative("surcharge_pct", surcharge_pct)?;
        self.change(|item| item.surcharge_pct = surcharge_pct)
    }

    /// Apply every change in `update`, or none of them.
    pub fn apply(&mut self, update: &ItemUpdate) -> Result<()> {
        let mut next = self.clone();

        if update.width_m.is_some() || update.height_m.is_some() {
            next.set_dimensions(
                update.width_m.unwrap_or(self.width_m),
                update.height_m.unwrap_or(self.height_m),
            )?;
        }
        if let Some(quantity) = update.quantity {
            next.set_quantity(validation::validate_quantity(quantity)?)?;
        }
        if let Some(surcharge_pct) = update.surcharge_pct {
            next.set_surcharge_pct(surcharge_pct)?;
        }

        *self = next;
        Ok(())
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn material(&self) -> Material {
        self.material
    }

    pub fn thickness(&self) -> &str {
        &self.thickness
    }

    pub fn finish(&self) -> Finish {
        self.finish
    }

    pub fn width_m(&self) -> f64 {
        self.width_m
    }

    pub fn height_m(&self) -> f64 {
        self.height_m
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Price per m² captured when the item was added.
    pub fn unit_price_per_m2(&self) -> f64 {
        self.unit_price_per_m2
    }

    pub fn surcharge_pct(&self) -> f64 {
        self.surcharge_pct
    }

    /// Area of one piece in m².
    pub fn area_m2(&self) -> f64 {
        self.area_m2
    }

    /// Area of all pieces in m².
    pub fn total_area_m2(&self) -> f64 {
        self.total_area_m2
    }

    /// Value of one piece, surcharge included.
    pub fn unit_value(&self) -> f64 {
        self.unit_value
    }

    /// Value of all pieces, surcharge included.
    pub fn total_value(&self) -> f64 {
        self.total_value
    }

    /// Whether the stored derived fields still match the inputs.
    pub fn is_consistent(&self) -> bool {
        let mut fresh = self.clone();
        fresh.recompute().is_ok() && fresh == *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::float_cmp::approx_eq;
    use crate::error::QuoteError;

    fn sample() -> LineItem {
        let spec = ItemSpec::new("Living room window", Material::Glass, 2.0, 1.5)
            .with_quantity(3)
            .with_surcharge(10.0)
            .with_finish(Finish::Polished)
            .with_thickness("8mm");
        LineItem::new(spec, 150.0).unwrap()
    }

    #[test]
    fn test_derived_values() {
        let item = sample();
        assert!(approx_eq(item.area_m2(), 3.0));
        assert!(approx_eq(item.total_area_m2(), 9.0));
        assert!(approx_eq(item.unit_value(), 495.0));
        assert!(approx_eq(item.total_value(), 1485.0));
        assert_eq!(item.thickness(), "8mm");
    }

    #[test]
    fn test_no_surcharge() {
        let spec = ItemSpec::new("Mirror", Material::Mirror, 0.5, 0.5).with_quantity(2);
        let item = LineItem::new(spec, 200.0).unwrap();
        assert!(approx_eq(item.area_m2(), 0.25));
        assert!(approx_eq(item.unit_value(), 50.0));
        assert!(approx_eq(item.total_value(), 100.0));
    }

    #[test]
    fn test_area_rounding() {
        let spec = ItemSpec::new("Shelf", Material::Glass, 0.333, 0.777);
        let item = LineItem::new(spec, 100.0).unwrap();
        // 0.258741 m²
        assert!(approx_eq(item.area_m2(), 0.2587));
        assert!(approx_eq(item.total_value(), 25.87));
    }

    #[test]
    fn test_description_trimmed() {
        let spec = ItemSpec::new("  Box  ", Material::Glass, 1.0, 1.0);
        let item = LineItem::new(spec, 100.0).unwrap();
        assert_eq!(item.description(), "Box");
    }

    #[test]
    fn test_setters_recompute() {
        let mut item = sample();
        item.set_quantity(1).unwrap();
        assert!(approx_eq(item.total_value(), 495.0));
        assert!(approx_eq(item.total_area_m2(), 3.0));

        item.set_surcharge_pct(0.0).unwrap();
        assert!(approx_eq(item.total_value(), 450.0));

        item.set_dimensions(1.0, 1.0).unwrap();
        assert!(approx_eq(item.total_value(), 150.0));
        assert!(item.is_consistent());
    }

    #[test]
    fn test_setter_rejects_and_keeps_state() {
        let mut item = sample();
        let before = item.clone();

        let err = item.set_quantity(0).unwrap_err();
        assert!(matches!(err, QuoteError::Validation { .. }));
        assert!(item.set_dimensions(-1.0, 1.0).is_err());
        assert!(item.set_surcharge_pct(-5.0).is_err());

        assert_eq!(item, before);
    }

    #[test]
    fn test_spec_defaults_from_json() {
        let spec: ItemSpec =
            serde_json::from_str(r#"{"description": "Door", "width_m": 0.9, "height_m": 2.1}"#).unwrap();
        assert_eq!(spec.material, Material::Glass);
        assert_eq!(spec.finish, Finish::None);
        assert_eq!(spec.quantity, 1.0);
        assert_eq!(spec.thickness, "Other");
        assert_eq!(spec.surcharge_pct, 0.0);
    }

    #[test]
    fn test_fractional_quantity_rejected() {
        let spec: ItemSpec = serde_json::from_str(
            r#"{"description": "Door", "width_m": 0.9, "height_m": 2.1, "quantity": 1.5}"#,
        )
        .unwrap();
        let err = LineItem::new(spec, 150.0).unwrap_err();
        assert!(matches!(err, QuoteError::Validation { ref field, .. } if field == "quantity"));
    }

    #[test]
    fn test_overflowing_values_rejected() {
        let huge = ItemSpec::new("Wall", Material::Glass, 1e200, 1e200);
        let err = LineItem::new(huge, 150.0).unwrap_err();
        assert!(matches!(err, QuoteError::Validation { ref field, .. } if field == "total_area_m2"));

        let pricey = ItemSpec::new("Wall", Material::Glass, 1e150, 1e150);
        assert!(LineItem::new(pricey, 1e100).is_err());

        let mut item = sample();
        let before = item.clone();
        assert!(item.set_dimensions(1e300, 1e300).is_err());
        assert!(item.set_surcharge_pct(f64::MAX).is_err());
        assert_eq!(item, before);
        assert!(item.is_consistent());
    }

    #[test]
    fn test_apply_update() {
        let mut item = sample();
        item.apply(&ItemUpdate {
            height_m: Some(1.0),
            quantity: Some(2.0),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(item.width_m(), 2.0);
        assert_eq!(item.height_m(), 1.0);
        assert_eq!(item.quantity(), 2);
        // 2 m² x 150 x 1.10 = 330 per piece
        assert!(approx_eq(item.unit_value(), 330.0));
        assert!(approx_eq(item.total_value(), 660.0));
        assert!(item.is_consistent());
    }

    #[test]
    fn test_apply_update_is_all_or_nothing() {
        let mut item = sample();
        let before = item.clone();

        let err = item
            .apply(&ItemUpdate {
                width_m: Some(1.0),
                surcharge_pct: Some(-3.0),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, QuoteError::Validation { ref field, .. } if field == "surcharge_pct"));
        assert_eq!(item, before);
    }
}
