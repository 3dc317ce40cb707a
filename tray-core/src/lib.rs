pub mod calculations;
pub mod catalog;
pub mod config;
pub mod models;
pub mod order;

pub use catalog::{CatalogError, LookupError, MenuCatalog, StaticCatalog, default_menu};
pub use config::{ConfigError, OrderConfig};
pub use models::*;
pub use order::{
    OrderChange, OrderError, OrderField, OrderListener, OrderPhase, OrderSnapshot, OrderState,
    SubscriptionId,
};
