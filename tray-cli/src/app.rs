//! One ordering session, driven from the command line.

use std::sync::Arc;

use tracing::{info, warn};
use tray_core::{
    Category, ConfigError, MenuCatalog, OrderConfig, OrderError, OrderPhase, OrderState,
};

use crate::presenter::{OrderPresenter, OrderSummary};
use crate::utils::CurrencyStyle;

/// Catalog keys requested for each course. `None` leaves the course empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selections {
    pub entree: Option<String>,
    pub side: Option<String>,
    pub accompaniment: Option<String>,
}

impl Selections {
    /// Requested keys in course order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &str)> {
        [
            (Category::Entree, self.entree.as_deref()),
            (Category::Side, self.side.as_deref()),
            (Category::Accompaniment, self.accompaniment.as_deref()),
        ]
        .into_iter()
        .filter_map(|(course, key)| key.map(|key| (course, key)))
    }
}

/// Outcome of [`run_session`].
#[derive(Debug)]
pub struct SessionReport {
    pub summary: OrderSummary,
    pub rejected: Vec<OrderError>,
    pub phase: OrderPhase,
    pub complete: bool,
    /// Notifications the presenter saw; one per accepted selection.
    pub updates: usize,
}

/// Applies `selections` to a fresh order and returns the formatted result.
///
/// Rejected selections are collected rather than aborting the session, so
/// the remaining courses are still applied.
pub fn run_session(
    catalog: Arc<dyn MenuCatalog>,
    config: OrderConfig,
    selections: &Selections,
    style: CurrencyStyle,
) -> Result<SessionReport, ConfigError> {
    let mut order = OrderState::with_config(catalog, config)?;
    let presenter = OrderPresenter::attach(&mut order, style);
    let mut rejected = Vec::new();

    for (course, key) in selections.iter() {
        if let Err(error) = order.select(course, key) {
            warn!(%error, "selection skipped");
            rejected.push(error);
        }
    }

    info!(
        subtotal = %order.subtotal(),
        tax = %order.tax(),
        total = %order.total(),
        "order priced"
    );

    let report = SessionReport {
        summary: presenter.summary(),
        rejected,
        phase: order.phase(),
        complete: order.is_complete(),
        updates: presenter.updates(),
    };
    presenter.detach(&mut order);
    Ok(report)
}

/// Renders the catalog grouped by course, one `key  name  price` row each.
pub fn format_menu(
    catalog: &dyn MenuCatalog,
    style: &CurrencyStyle,
) -> String {
    let mut out = String::new();

    for course in Category::ALL {
        let entries = catalog.entries_in(course);
        if entries.is_empty() {
            continue;
        }
        out.push_str(course.label());
        out.push('\n');
        for (key, item) in entries {
            out.push_str(&format!(
                "  {key:<14}{:<28}{:>8}\n",
                item.name,
                style.format(item.price)
            ));
        }
    }

    out
}
