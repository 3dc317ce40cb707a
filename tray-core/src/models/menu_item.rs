use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Category;

/// A purchasable item on the menu.
///
/// Items are owned by a [`MenuCatalog`](crate::MenuCatalog); orders only
/// ever hold clones of catalog entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category: Category,
}

impl MenuItem {
    pub fn new(
        name: impl Into<String>,
        category: Category,
        price: Decimal,
    ) -> Self {
        Self {
            name: name.into(),
            description: None,
            price,
            category,
        }
    }

    pub fn with_description(
        mut self,
        description: impl Into<String>,
    ) -> Self {
        self.description = Some(description.into());
        self
    }
}
