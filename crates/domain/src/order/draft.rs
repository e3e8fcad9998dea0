//! Request-shaped draft items.

use common::Customizations;
use serde::{Deserialize, Serialize};

/// One requested drink line, before validation, normalization, and
/// pricing. This is the shape both the cashier till and the pre-order
/// form submit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftItem {
    pub drink_id: String,
    pub quantity: u32,
    #[serde(default)]
    pub customizations: Customizations,
}

impl DraftItem {
    /// Creates a draft item with no customizations.
    pub fn plain(drink_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            drink_id: drink_id.into(),
            quantity,
            customizations: Customizations::none(),
        }
    }

    /// Creates a draft item with customizations.
    pub fn customized(
        drink_id: impl Into<String>,
        quantity: u32,
        customizations: Customizations,
    ) -> Self {
        Self {
            drink_id: drink_id.into(),
            quantity,
            customizations,
        }
    }
}
