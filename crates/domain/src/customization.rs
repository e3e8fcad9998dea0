//! Customization normalization.
//!
//! Requests coming over the wire can ask for anything; normalization
//! clamps them to what the drink actually supports. It never rejects —
//! an unsupported flag is simply dropped, and a contradictory milk
//! request resolves to oat.

use common::Customizations;

use crate::catalog::Drink;

/// Normalizes a requested customization set against a drink's
/// capabilities.
///
/// Rules:
/// - milk flags are dropped when the drink offers no milk choice, and
///   when both are requested oat wins (at most one milk is ever stored)
/// - syrups are dropped when the drink offers no syrups
/// - decaf is dropped when the drink offers no decaf
/// - iced always comes from the catalog entry, never the request
pub fn normalize(drink: &Drink, requested: &Customizations) -> Customizations {
    let oat_milk = drink.milk && requested.oat_milk;
    let semi_skimmed_milk = drink.milk && requested.semi_skimmed_milk && !oat_milk;

    Customizations {
        oat_milk,
        semi_skimmed_milk,
        caramel_syrup: drink.syrup && requested.caramel_syrup,
        vanilla_syrup: drink.syrup && requested.vanilla_syrup,
        decaf: drink.decaf && requested.decaf,
        iced: drink.iced,
    }
}

/// Builds the display name for a customized drink, e.g. "Decaf Oat Latte".
///
/// Syrups are not part of the name; they show up in the price and on the
/// kitchen ticket detail instead.
pub fn display_name(drink: &Drink, customizations: &Customizations) -> String {
    let mut name = String::new();
    if customizations.decaf {
        name.push_str("Decaf ");
    }
    if customizations.oat_milk {
        name.push_str("Oat ");
    }
    name.push_str(drink.name);
    name
}
