pub mod repository;
pub mod static_catalog;

pub use repository::{CatalogError, LookupError, MenuCatalog};
pub use static_catalog::{StaticCatalog, default_menu};
