//! The in-progress order and its change notifications.

mod error;
pub mod events;
mod state;

pub use error::OrderError;
pub use events::{OrderChange, OrderField, OrderListener, OrderSnapshot, SubscriptionId};
pub use state::{OrderPhase, OrderState};
