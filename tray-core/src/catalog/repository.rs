use thiserror::Error;

use crate::models::{Category, MenuItem};

/// Why a catalog lookup for a specific course failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("not on the menu")]
    NotOnMenu,

    #[error("listed as {actual}, not {requested}")]
    WrongCategory {
        requested: Category,
        actual: Category,
    },
}

/// Errors raised while assembling a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("duplicate menu key '{0}'")]
    DuplicateKey(String),

    #[error("menu item '{key}' has a negative price {price}")]
    NegativePrice { key: String, price: rust_decimal::Decimal },

    #[error("menu item '{key}' price {price} exceeds the maximum {max}")]
    PriceTooLarge {
        key: String,
        price: rust_decimal::Decimal,
        max: rust_decimal::Decimal,
    },

    #[error("menu key must not be empty")]
    EmptyKey,
}

/// Read-only source of menu items.
///
/// Implementations must be immutable once built; an order holds the catalog
/// for its whole lifetime and relies on prices never changing underneath it.
pub trait MenuCatalog: Send + Sync {
    /// Item stored under `key`, regardless of category.
    fn get(
        &self,
        key: &str,
    ) -> Option<&MenuItem>;

    /// Every item with its key, sorted by key.
    fn entries(&self) -> Vec<(&str, &MenuItem)>;

    /// Item stored under `key`, provided it belongs to `category`.
    fn lookup(
        &self,
        key: &str,
        category: Category,
    ) -> Result<&MenuItem, LookupError> {
        let item = self.get(key).ok_or(LookupError::NotOnMenu)?;
        if item.category == category {
            Ok(item)
        } else {
            Err(LookupError::WrongCategory {
                requested: category,
                actual: item.category,
            })
        }
    }

    /// Entries that belong to `category`, in key order.
    fn entries_in(
        &self,
        category: Category,
    ) -> Vec<(&str, &MenuItem)> {
        self.entries()
            .into_iter()
            .filter(|(_, item)| item.category == category)
            .collect()
    }

    fn len(&self) -> usize {
        self.entries().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
