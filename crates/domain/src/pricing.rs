//! Channel-aware unit pricing.

use common::{Customizations, Money};

use crate::catalog::{Drink, DrinkCategory};

/// Where the order is being placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Public pre-order form (specialty drinks are discounted).
    Preorder,
    /// Cashier till on the day.
    Cashier,
}

/// Surcharge for substituting oat milk.
pub const OAT_MILK_SURCHARGE: Money = Money::from_pence(40);

/// Surcharge per syrup shot.
pub const SYRUP_SURCHARGE: Money = Money::from_pence(40);

/// Discount on specialty drinks when pre-ordered.
pub const SPECIALTY_PREORDER_DISCOUNT: Money = Money::from_pence(20);

/// Computes the unit price for a drink with the given customizations.
///
/// Deterministic: base price by category, minus the pre-order specialty
/// discount where it applies, plus the oat milk and syrup surcharges.
/// Oat milk always carries its surcharge, whatever the drink. The
/// result is clamped at zero.
///
/// Callers are expected to pass normalized customizations; surcharges
/// are computed from whatever flags are set.
pub fn unit_price(drink: &Drink, channel: Channel, customizations: &Customizations) -> Money {
    let mut price = drink.base_price();

    if channel == Channel::Preorder && drink.category == DrinkCategory::Specialty {
        price -= SPECIALTY_PREORDER_DISCOUNT;
    }

    if customizations.oat_milk {
        price += OAT_MILK_SURCHARGE;
    }
    price += SYRUP_SURCHARGE.multiply(customizations.syrup_count());

    price.max(Money::zero())
}
