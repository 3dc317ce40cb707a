use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::repository::{CatalogError, MenuCatalog};
use crate::calculations::MAX_PRICE;
use crate::models::{Category, MenuItem};

/// In-memory catalog keyed by lookup key.
///
/// Built once, then shared read-only (usually behind an `Arc`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticCatalog {
    items: BTreeMap<String, MenuItem>,
}

impl StaticCatalog {
    /// Builds a catalog from `(key, item)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] for an empty or repeated key, or a price that
    /// is negative or above [`MAX_PRICE`].
    pub fn new<K, I>(entries: I) -> Result<Self, CatalogError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, MenuItem)>,
    {
        let mut items = BTreeMap::new();

        for (key, item) in entries {
            let key = key.into();
            if key.trim().is_empty() {
                return Err(CatalogError::EmptyKey);
            }
            if item.price < Decimal::ZERO {
                return Err(CatalogError::NegativePrice {
                    key,
                    price: item.price,
                });
            }
            if item.price > MAX_PRICE {
                return Err(CatalogError::PriceTooLarge {
                    key,
                    price: item.price,
                    max: MAX_PRICE,
                });
            }
            if items.contains_key(&key) {
                return Err(CatalogError::DuplicateKey(key));
            }
            items.insert(key, item);
        }

        Ok(Self { items })
    }

    /// Builds a catalog keyed by each item's display name.
    pub fn from_items<I>(items: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = MenuItem>,
    {
        Self::new(items.into_iter().map(|item| (item.name.clone(), item)))
    }
}

impl MenuCatalog for StaticCatalog {
    fn get(
        &self,
        key: &str,
    ) -> Option<&MenuItem> {
        self.items.get(key)
    }

    fn entries(&self) -> Vec<(&str, &MenuItem)> {
        self.items
            .iter()
            .map(|(key, item)| (key.as_str(), item))
            .collect()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

/// The built-in lunch menu: four entrees, four sides, three accompaniments.
pub fn default_menu() -> StaticCatalog {
    let entries = [
        (
            "cauliflower",
            MenuItem::new("Cauliflower", Category::Entree, dec!(7.00))
                .with_description("Whole cauliflower, brined, roasted, and deep fried"),
        ),
        (
            "chili",
            MenuItem::new("Three Bean Chili", Category::Entree, dec!(4.00)).with_description(
                "Black beans, red beans, kidney beans, slow cooked, topped with onion",
            ),
        ),
        (
            "pasta",
            MenuItem::new("Mushroom Pasta", Category::Entree, dec!(5.50)).with_description(
                "Penne pasta, mushrooms, basil, with plum tomatoes cooked in garlic and olive oil",
            ),
        ),
        (
            "skillet",
            MenuItem::new("Spicy Black Bean Skillet", Category::Entree, dec!(5.50))
                .with_description(
                    "Seasonal vegetables, black beans, house spice blend, served with avocado and quick pickled onions",
                ),
        ),
        (
            "salad",
            MenuItem::new("Summer Salad", Category::Side, dec!(2.50)).with_description(
                "Heirloom tomatoes, butter lettuce, peaches, avocado, balsamic dressing",
            ),
        ),
        (
            "soup",
            MenuItem::new("Butternut Squash Soup", Category::Side, dec!(3.00))
                .with_description("Roasted butternut squash, roasted peppers, chili oil"),
        ),
        (
            "potatoes",
            MenuItem::new("Spicy Potatoes", Category::Side, dec!(2.00))
                .with_description("Marble potatoes, roasted, and fried in house spice blend"),
        ),
        (
            "rice",
            MenuItem::new("Lime Rice", Category::Side, dec!(1.50))
                .with_description("Rice, lime, cilantro, and spices"),
        ),
        (
            "bread",
            MenuItem::new("Lunch Roll", Category::Accompaniment, dec!(0.50))
                .with_description("Fresh baked roll made in house"),
        ),
        (
            "berries",
            MenuItem::new("Mixed Berries", Category::Accompaniment, dec!(1.00))
                .with_description("Strawberries, blueberries, raspberries, and huckleberries"),
        ),
        (
            "pickles",
            MenuItem::new("Pickled Veggies", Category::Accompaniment, dec!(0.50))
                .with_description("Pickled cucumbers and carrots, made in house"),
        ),
    ];

    // Keys above are unique and every price is non-negative.
    StaticCatalog {
        items: entries
            .into_iter()
            .map(|(key, item)| (key.to_string(), item))
            .collect(),
    }
}
