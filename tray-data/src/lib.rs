//! Menu data loading for the lunch tray.

pub mod loader;

pub use loader::{MenuItemRecord, MenuLoader, MenuLoaderError};
