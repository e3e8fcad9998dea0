//! Drink catalog with per-drink customization capabilities.

use common::Money;
use serde::{Deserialize, Serialize};

/// Menu category. The category sets the base price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrinkCategory {
    HotCoffee,
    IcedCoffee,
    Specialty,
}

impl DrinkCategory {
    /// Returns the base price for drinks in this category.
    pub const fn base_price(&self) -> Money {
        match self {
            DrinkCategory::HotCoffee => Money::from_pence(300),
            DrinkCategory::IcedCoffee => Money::from_pence(350),
            DrinkCategory::Specialty => Money::from_pence(400),
        }
    }

    /// Returns true for the coffee categories (the only ones that can
    /// be made decaf).
    pub fn is_coffee(&self) -> bool {
        matches!(self, DrinkCategory::HotCoffee | DrinkCategory::IcedCoffee)
    }
}

/// A drink on the menu, with the customizations it supports.
///
/// The capability flags gate what the normalizer lets through: a drink
/// with `milk: false` never stores a milk selection, and so on. `iced`
/// is a property of the drink itself, not a choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drink {
    pub id: &'static str,
    pub name: &'static str,
    pub category: DrinkCategory,
    pub iced: bool,
    /// Milk choice (oat or semi-skimmed) is offered.
    pub milk: bool,
    /// Syrup shots are offered.
    pub syrup: bool,
    /// Decaf is offered.
    pub decaf: bool,
}

impl Drink {
    const fn new(
        id: &'static str,
        name: &'static str,
        category: DrinkCategory,
        iced: bool,
        milk: bool,
        syrup: bool,
        decaf: bool,
    ) -> Self {
        Self {
            id,
            name,
            category,
            iced,
            milk,
            syrup,
            decaf,
        }
    }

    /// Returns the base price for this drink.
    pub fn base_price(&self) -> Money {
        self.category.base_price()
    }

    /// Returns true if no customization is offered at all.
    pub fn no_customization(&self) -> bool {
        !self.milk && !self.syrup && !self.decaf
    }
}

use DrinkCategory::{HotCoffee, IcedCoffee, Specialty};

/// The full menu.
pub const DRINKS: &[Drink] = &[
    // Hot coffee — £3.00
    Drink::new("espresso", "Espresso", HotCoffee, false, false, false, true),
    Drink::new("macchiato", "Macchiato", HotCoffee, false, true, true, true),
    Drink::new("americano", "Americano", HotCoffee, false, true, true, true),
    Drink::new("cortado", "Cortado", HotCoffee, false, true, true, true),
    Drink::new("flat_white", "Flat White", HotCoffee, false, true, true, true),
    Drink::new("latte", "Latte", HotCoffee, false, true, true, true),
    Drink::new("cappuccino", "Cappuccino", HotCoffee, false, true, true, true),
    // Iced coffee — £3.50
    Drink::new("iced_latte", "Iced Latte", IcedCoffee, true, true, true, true),
    Drink::new(
        "iced_americano",
        "Iced Americano",
        IcedCoffee,
        true,
        true,
        true,
        true,
    ),
    // Specialty — £4.00
    Drink::new("matcha_hot", "Matcha", Specialty, false, true, true, false),
    Drink::new(
        "matcha_iced",
        "Iced Matcha",
        Specialty,
        true,
        true,
        true,
        false,
    ),
    Drink::new("hojicha_hot", "Hojicha", Specialty, false, true, true, false),
    Drink::new(
        "hojicha_iced",
        "Iced Hojicha",
        Specialty,
        true,
        true,
        true,
        false,
    ),
    Drink::new(
        "hk_iced_lemon_tea",
        "HK Iced Lemon Tea",
        Specialty,
        true,
        false,
        false,
        false,
    ),
    Drink::new(
        "yuzu_tea_hot",
        "Yuzu Tea",
        Specialty,
        false,
        false,
        false,
        false,
    ),
    Drink::new(
        "yuzu_tea_iced",
        "Iced Yuzu Tea",
        Specialty,
        true,
        false,
        false,
        false,
    ),
    Drink::new(
        "genmaicha_hot",
        "Genmaicha",
        Specialty,
        false,
        false,
        false,
        false,
    ),
    Drink::new(
        "genmaicha_iced",
        "Iced Genmaicha",
        Specialty,
        true,
        false,
        false,
        false,
    ),
];

/// Looks up a drink by its catalog ID.
pub fn find_drink(id: &str) -> Option<&'static Drink> {
    DRINKS.iter().find(|d| d.id == id)
}
