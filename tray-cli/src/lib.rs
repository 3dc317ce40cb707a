pub mod app;
pub mod logging;
pub mod presenter;
pub mod utils;

pub use app::{SessionReport, Selections, format_menu, run_session};
pub use presenter::{OrderPresenter, OrderSummary, SummaryLine};
pub use utils::{CurrencyStyle, format_currency, parse_decimal};
