//! Drink customization value object.

use serde::{Deserialize, Serialize};

/// Customizations applied to a single line item.
///
/// Stored as JSON on the line item row. Every field defaults to false so
/// rows written before a field existed still deserialize.
///
/// At most one milk flag may be set on a stored value; the domain layer
/// normalizes requests before they reach the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Customizations {
    /// Oat milk substitution (carries a surcharge).
    #[serde(default)]
    pub oat_milk: bool,

    /// Semi-skimmed milk (the no-surcharge milk option).
    #[serde(default)]
    pub semi_skimmed_milk: bool,

    /// Caramel syrup shot.
    #[serde(default)]
    pub caramel_syrup: bool,

    /// Vanilla syrup shot.
    #[serde(default)]
    pub vanilla_syrup: bool,

    /// Decaffeinated.
    #[serde(default)]
    pub decaf: bool,

    /// Served iced. Always mirrors the catalog entry for the drink.
    #[serde(default)]
    pub iced: bool,
}

impl Customizations {
    /// Returns a customization set with nothing selected.
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns true if either milk flag is set.
    pub fn has_milk(&self) -> bool {
        self.oat_milk || self.semi_skimmed_milk
    }

    /// Returns the number of syrup shots selected.
    pub fn syrup_count(&self) -> u32 {
        self.caramel_syrup as u32 + self.vanilla_syrup as u32
    }
}
