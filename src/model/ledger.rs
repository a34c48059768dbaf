//! Ledger - Line items, reference prices and client data for one session.

use super::{ItemSpec, ItemUpdate, LineItem, Material};
use crate::config::QuoteConfig;
use crate::error::{QuoteError, Result};
use crate::validation;
use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::debug;

/// Aggregate values per material.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    pub total_glass: f64,
    pub total_mirror: f64,
    pub total_general: f64,
}

impl Totals {
    /// Sum item values per material.
    pub fn from_items(items: &[LineItem]) -> Self {
        let sum_for = |material: Material| -> f64 {
            items
                .iter()
                .filter(|item| item.material() == material)
                .map(LineItem::total_value)
                .sum()
        };

        let total_glass = sum_for(Material::Glass);
        let total_mirror = sum_for(Material::Mirror);

        Self {
            total_glass,
            total_mirror,
            total_general: total_glass + total_mirror,
        }
    }

    /// Total for a single material.
    pub fn for_material(&self, material: Material) -> f64 {
        match material {
            Material::Glass => self.total_glass,
            Material::Mirror => self.total_mirror,
        }
    }
}

/// Session state owned by the caller and passed to every handler.
///
/// Items are addressed by their current position, which is only sound while a
/// single actor mutates the ledger.
#[derive(Debug, Clone, Serialize)]
pub struct Ledger {
    items: Vec<LineItem>,
    reference_price_glass: f64,
    reference_price_mirror: f64,
    client_name: Option<String>,
    notes: Option<String>,
}

impl Default for Ledger {
    fn default() -> Self {
        let config = QuoteConfig::default();
        Self {
            items: Vec::new(),
            reference_price_glass: config.glass_price,
            reference_price_mirror: config.mirror_price,
            client_name: None,
            notes: None,
        }
    }
}

impl Ledger {
    /// Create an empty ledger with the configured reference prices.
    ///
    /// Fails when a starting price is negative or not a number.
    pub fn new(config: &QuoteConfig) -> Result<Self> {
        validation::validate_price("glass_price", config.glass_price)?;
        validation::validate_price("mirror_price", config.mirror_price)?;

        Ok(Self {
            reference_price_glass: config.glass_price,
            reference_price_mirror: config.mirror_price,
            ..Self::default()
        })
    }

    /// Price the spec at the current reference price and append it.
    pub fn add_item(&mut self, spec: ItemSpec) -> Result<LineItem> {
        let price = self.reference_price(spec.material);
        let item = LineItem::new(spec, price)?;

        debug!(
            "Added item {} '{}' ({}, {:.4} m², value {:.2})",
            self.items.len(),
            item.description(),
            item.material(),
            item.total_area_m2(),
            item.total_value()
        );

        self.items.push(item.clone());
        Ok(item)
    }

    /// Remove the item at a display position. Later items shift down by one.
    pub fn remove_item(&mut self, index: usize) -> Result<LineItem> {
        if index >= self.items.len() {
            return Err(QuoteError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }

        let item = self.items.remove(index);
        debug!("Removed item {} '{}'", index, item.description());
        Ok(item)
    }

    /// Change the item at a display position. The item keeps its unit price.
    pub fn update_item(&mut self, index: usize, update: &ItemUpdate) -> Result<LineItem> {
        let len = self.items.len();
        let item = self
            .items
            .get_mut(index)
            .ok_or(QuoteError::IndexOutOfRange { index, len })?;

        item.apply(update)?;
        debug!(
            "Updated item {} '{}' ({:.4} m², value {:.2})",
            index,
            item.description(),
            item.total_area_m2(),
            item.total_value()
        );
        Ok(item.clone())
    }

    /// Remove every item. Prices and client data are kept.
    pub fn clear_all(&mut self) {
        debug!("Cleared {} item(s)", self.items.len());
        self.items.clear();
    }

    /// Change a reference price. Existing items keep the price they were added at.
    pub fn set_reference_price(&mut self, material: Material, price: f64) -> Result<()> {
        validation::validate_price("price", price)?;

        match material {
            Material::Glass => self.reference_price_glass = price,
            Material::Mirror => self.reference_price_mirror = price,
        }
        debug!("{} reference price set to {:.2}", material, price);
        Ok(())
    }

    /// Current reference price for a material.
    pub fn reference_price(&self, material: Material) -> f64 {
        match material {
            Material::Glass => self.reference_price_glass,
            Material::Mirror => self.reference_price_mirror,
        }
    }

    /// Totals computed from the current items.
    pub fn totals(&self) -> Totals {
        Totals::from_items(&self.items)
    }

    /// Set the client name. Blank text clears it.
    pub fn set_client_name(&mut self, name: impl Into<String>) {
        self.client_name = non_blank(name.into());
    }

    /// Set the free-text notes. Blank text clears them.
    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = non_blank(notes.into());
    }

    pub fn client_name(&self) -> Option<&str> {
        self.client_name.as_deref()
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Items in display order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Item at a display position.
    pub fn item(&self, index: usize) -> Option<&LineItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether any item uses the given material.
    pub fn uses_material(&self, material: Material) -> bool {
        self.items.iter().any(|item| item.material() == material)
    }

    /// Freeze the current state for export.
    pub fn snapshot(&self, generated_at: NaiveDateTime) -> QuoteSnapshot<'_> {
        QuoteSnapshot {
            items: &self.items,
            client_name: self.client_name(),
            notes: self.notes(),
            reference_price_glass: self.reference_price_glass,
            reference_price_mirror: self.reference_price_mirror,
            totals: self.totals(),
            generated_at,
        }
    }
}

fn non_blank(text: String) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Immutable view of a ledger handed to the document exporter.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteSnapshot<'a> {
    pub items: &'a [LineItem],
    pub client_name: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub reference_price_glass: f64,
    pub reference_price_mirror: f64,
    pub totals: Totals,
    pub generated_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::float_cmp::{approx_eq, approx_zero};
    use crate::model::Finish;
    use pretty_assertions::assert_eq;

    fn glass(description: &str, width: f64, height: f64) -> ItemSpec {
        ItemSpec::new(description, Material::Glass, width, height)
    }

    fn mirror(description: &str, width: f64, height: f64) -> ItemSpec {
        ItemSpec::new(description, Material::Mirror, width, height)
    }

    fn descriptions(ledger: &Ledger) -> Vec<&str> {
        ledger.items().iter().map(LineItem::description).collect()
    }

    #[test]
    fn test_add_item_uses_reference_price() {
        let mut ledger = Ledger::default();
        let item = ledger.add_item(mirror("Hall mirror", 1.0, 2.0)).unwrap();

        assert_eq!(item.unit_price_per_m2(), 200.0);
        assert!(approx_eq(item.total_value(), 400.0));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_add_item_updates_correct_bucket() {
        let mut ledger = Ledger::default();
        ledger.add_item(glass("Window", 1.0, 1.0)).unwrap();
        let before = ledger.totals();

        let item = ledger
            .add_item(mirror("Bath", 1.0, 0.5).with_quantity(2).with_surcharge(20.0))
            .unwrap();
        let after = ledger.totals();

        assert!(approx_eq(after.total_glass, before.total_glass));
        assert!(approx_eq(after.total_mirror, before.total_mirror + item.total_value()));
        assert!(approx_eq(after.total_general, before.total_general + item.total_value()));
        assert!(approx_eq(after.total_mirror, 240.0));
    }

    #[test]
    fn test_add_item_rejected_leaves_ledger() {
        let mut ledger = Ledger::default();
        ledger.add_item(glass("Window", 1.0, 1.0)).unwrap();

        assert!(ledger.add_item(glass("   ", 1.0, 1.0)).is_err());
        assert!(ledger.add_item(glass("Zero", 0.0, 1.0)).is_err());
        assert!(ledger.add_item(glass("Qty", 1.0, 1.0).with_quantity(0)).is_err());
        assert!(ledger.add_item(glass("Neg", 1.0, 1.0).with_surcharge(-1.0)).is_err());

        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_remove_item_shifts_positions() {
        let mut ledger = Ledger::default();
        ledger.add_item(glass("A", 1.0, 1.0)).unwrap();
        ledger.add_item(mirror("B", 1.0, 1.0)).unwrap();
        ledger.add_item(glass("C", 2.0, 1.0)).unwrap();
        ledger.add_item(glass("D", 1.0, 0.5)).unwrap();
        let before = ledger.totals();

        let removed = ledger.remove_item(1).unwrap();

        assert_eq!(removed.description(), "B");
        assert_eq!(descriptions(&ledger), vec!["A", "C", "D"]);
        let after = ledger.totals();
        assert!(approx_eq(after.total_general, before.total_general - removed.total_value()));
        assert!(approx_zero(after.total_mirror));

        let removed = ledger.remove_item(1).unwrap();
        assert_eq!(removed.description(), "C");
        assert_eq!(descriptions(&ledger), vec!["A", "D"]);
    }

    #[test]
    fn test_remove_item_out_of_range() {
        let mut ledger = Ledger::default();
        ledger.add_item(glass("A", 1.0, 1.0)).unwrap();

        let err = ledger.remove_item(1).unwrap_err();
        assert!(matches!(err, QuoteError::IndexOutOfRange { index: 1, len: 1 }));
        assert_eq!(ledger.len(), 1);

        let mut empty = Ledger::default();
        assert!(empty.remove_item(0).is_err());
    }

    #[test]
    fn test_clear_all() {
        let mut ledger = Ledger::default();
        ledger.add_item(glass("A", 1.0, 1.0)).unwrap();
        ledger.add_item(mirror("B", 1.0, 1.0)).unwrap();
        ledger.set_client_name("Maria");

        ledger.clear_all();

        assert!(ledger.is_empty());
        assert_eq!(ledger.totals(), Totals::default());
        assert_eq!(ledger.client_name(), Some("Maria"));
    }

    #[test]
    fn test_price_change_not_retroactive() {
        let mut ledger = Ledger::default();
        let first = ledger.add_item(glass("A", 1.0, 1.0).with_finish(Finish::Tempered)).unwrap();

        ledger.set_reference_price(Material::Glass, 300.0).unwrap();
        let second = ledger.add_item(glass("B", 1.0, 1.0)).unwrap();

        let stored = ledger.item(0).unwrap();
        assert_eq!(stored.unit_price_per_m2(), first.unit_price_per_m2());
        assert_eq!(stored.total_value(), first.total_value());
        assert_eq!(second.unit_price_per_m2(), 300.0);
        assert!(approx_eq(ledger.totals().total_glass, 450.0));
    }

    #[test]
    fn test_set_reference_price_validation() {
        let mut ledger = Ledger::default();
        assert!(ledger.set_reference_price(Material::Mirror, -0.01).is_err());
        assert!(ledger.set_reference_price(Material::Mirror, f64::NAN).is_err());
        assert_eq!(ledger.reference_price(Material::Mirror), 200.0);

        ledger.set_reference_price(Material::Mirror, 0.0).unwrap();
        assert_eq!(ledger.reference_price(Material::Mirror), 0.0);
    }

    #[test]
    fn test_new_rejects_bad_starting_prices() {
        let err = Ledger::new(&QuoteConfig::new(-50.0, 200.0)).unwrap_err();
        assert!(matches!(err, QuoteError::Validation { ref field, .. } if field == "glass_price"));

        let err = Ledger::new(&QuoteConfig::new(150.0, f64::NAN)).unwrap_err();
        assert!(matches!(err, QuoteError::Validation { ref field, .. } if field == "mirror_price"));

        let free = Ledger::new(&QuoteConfig::new(0.0, 0.0)).unwrap();
        assert_eq!(free.reference_price(Material::Glass), 0.0);
    }

    #[test]
    fn test_update_item() {
        let mut ledger = Ledger::default();
        ledger.add_item(glass("Window", 1.0, 1.0)).unwrap();
        ledger.add_item(mirror("Hall", 1.0, 1.0)).unwrap();
        ledger.set_reference_price(Material::Mirror, 300.0).unwrap();

        let updated = ledger
            .update_item(
                1,
                &ItemUpdate {
                    width_m: Some(0.5),
                    quantity: Some(4.0),
                    ..Default::default()
                },
            )
            .unwrap();

        // Still priced at 200, the price it was added at
        assert_eq!(updated.unit_price_per_m2(), 200.0);
        assert!(approx_eq(updated.total_value(), 400.0));
        assert_eq!(ledger.item(1), Some(&updated));
        assert!(approx_eq(ledger.totals().total_mirror, 400.0));
        assert!(approx_eq(ledger.totals().total_general, 550.0));
    }

    #[test]
    fn test_update_item_rejected_keeps_state() {
        let mut ledger = Ledger::default();
        ledger.add_item(glass("Window", 1.0, 1.0)).unwrap();
        let before = ledger.clone();

        let err = ledger.update_item(3, &ItemUpdate::default()).unwrap_err();
        assert!(matches!(err, QuoteError::IndexOutOfRange { index: 3, len: 1 }));

        let bad = ItemUpdate {
            height_m: Some(2.0),
            quantity: Some(0.0),
            ..Default::default()
        };
        assert!(ledger.update_item(0, &bad).is_err());
        assert_eq!(ledger.items(), before.items());
    }

    #[test]
    fn test_client_and_notes_blank_clears() {
        let mut ledger = Ledger::default();
        ledger.set_client_name("João Silva");
        ledger.set_notes("Delivery in 10 days");
        assert_eq!(ledger.client_name(), Some("João Silva"));
        assert_eq!(ledger.notes(), Some("Delivery in 10 days"));

        ledger.set_client_name("  ");
        ledger.set_notes("");
        assert_eq!(ledger.client_name(), None);
        assert_eq!(ledger.notes(), None);
    }

    #[test]
    fn test_snapshot_carries_state() {
        let mut ledger = Ledger::new(&QuoteConfig::new(100.0, 120.0)).unwrap();
        ledger.add_item(glass("A", 1.0, 1.0)).unwrap();
        ledger.set_notes("Pay on delivery");

        let at = chrono::NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        let snapshot = ledger.snapshot(at);

        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.client_name, None);
        assert_eq!(snapshot.notes, Some("Pay on delivery"));
        assert_eq!(snapshot.reference_price_glass, 100.0);
        assert_eq!(snapshot.reference_price_mirror, 120.0);
        assert_eq!(snapshot.totals, ledger.totals());
    }
}
