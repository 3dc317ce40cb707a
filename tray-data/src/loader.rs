use std::fs::File;
use std::io::Read;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use tray_core::{CatalogError, Category, MenuItem, StaticCatalog};

/// Errors that can occur when loading a menu.
#[derive(Debug, Error)]
pub enum MenuLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("cannot read menu file: {0}")]
    Io(#[from] std::io::Error),

    #[error("unrecognised category '{value}' on row {row}")]
    InvalidCategory { value: String, row: usize },

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

impl From<csv::Error> for MenuLoaderError {
    fn from(err: csv::Error) -> Self {
        MenuLoaderError::CsvParse(err.to_string())
    }
}

/// A single row of a menu CSV file.
///
/// - `key`: the name orders use to select the item (e.g. `cauliflower`)
/// - `name`: display name
/// - `category`: `entree`, `side` or `accompaniment`
/// - `price`: non-negative decimal (e.g. `7.00`)
/// - `description`: optional, may be left empty
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MenuItemRecord {
    pub key: String,
    pub name: String,
    pub category: String,
    #[serde(deserialize_with = "deserialize_decimal")]
    pub price: Decimal,
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub description: Option<String>,
}

/// Reads the cell as text so the price never passes through `f64`.
fn deserialize_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.trim()
        .parse::<Decimal>()
        .map_err(serde::de::Error::custom)
}

fn deserialize_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
}

/// Loader for menu catalogs stored as CSV.
///
/// Column order does not matter; headers are matched by name.
pub struct MenuLoader;

impl MenuLoader {
    /// Parse menu records from a CSV reader, in file order.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<MenuItemRecord>, MenuLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: MenuItemRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Turn parsed records into a catalog.
    ///
    /// Row numbers in errors are 1-based and count data rows only.
    pub fn build_catalog(records: Vec<MenuItemRecord>) -> Result<StaticCatalog, MenuLoaderError> {
        let mut entries = Vec::with_capacity(records.len());

        for (index, record) in records.into_iter().enumerate() {
            let category = Category::parse(&record.category).ok_or_else(|| {
                MenuLoaderError::InvalidCategory {
                    value: record.category.clone(),
                    row: index + 1,
                }
            })?;

            let mut item = MenuItem::new(record.name, category, record.price);
            item.description = record.description;
            entries.push((record.key, item));
        }

        Ok(StaticCatalog::new(entries)?)
    }

    /// Parse and build in one step.
    pub fn load<R: Read>(reader: R) -> Result<StaticCatalog, MenuLoaderError> {
        let records = Self::parse(reader)?;
        debug!(rows = records.len(), "parsed menu records");
        Self::build_catalog(records)
    }

    /// Load a catalog from a CSV file on disk.
    pub fn load_path(path: &Path) -> Result<StaticCatalog, MenuLoaderError> {
        let file = File::open(path)?;
        Self::load(file)
    }
}
