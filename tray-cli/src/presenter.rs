//! Display-side view of an order.
//!
//! [`OrderPresenter`] subscribes to an [`OrderState`] and keeps a formatted
//! [`OrderSummary`] current. All currency formatting happens here; the core
//! model only ever holds exact decimals.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tray_core::{Category, OrderChange, OrderSnapshot, OrderState, SubscriptionId};

use crate::utils::CurrencyStyle;

/// One selected item, ready to print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryLine {
    pub course: Category,
    pub name: String,
    pub price: String,
}

/// Formatted strings for every observable value on an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummary {
    pub lines: Vec<SummaryLine>,
    pub subtotal: String,
    pub tax: String,
    pub total: String,
}

impl OrderSummary {
    pub fn from_snapshot(
        snapshot: &OrderSnapshot,
        style: &CurrencyStyle,
    ) -> Self {
        let lines = Category::ALL
            .iter()
            .filter_map(|course| {
                snapshot.selection(*course).map(|item| SummaryLine {
                    course: *course,
                    name: item.name.clone(),
                    price: style.format(item.price),
                })
            })
            .collect();

        Self {
            lines,
            subtotal: style.format(snapshot.subtotal),
            tax: style.format(snapshot.tax),
            total: style.format(snapshot.total),
        }
    }

    pub fn line(
        &self,
        course: Category,
    ) -> Option<&SummaryLine> {
        self.lines.iter().find(|line| line.course == course)
    }
}

impl fmt::Display for OrderSummary {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        const WIDTH: usize = 40;

        if self.lines.is_empty() {
            writeln!(f, "(no items selected)")?;
        }
        for line in &self.lines {
            let label = format!("{}: {}", line.course.label(), line.name);
            writeln!(f, "{label:<w$}{:>10}", line.price, w = WIDTH - 10)?;
        }
        writeln!(f, "{}", "-".repeat(WIDTH))?;
        writeln!(f, "{:<w$}{:>10}", "Subtotal", self.subtotal, w = WIDTH - 10)?;
        writeln!(f, "{:<w$}{:>10}", "Tax", self.tax, w = WIDTH - 10)?;
        write!(f, "{:<w$}{:>10}", "Total", self.total, w = WIDTH - 10)
    }
}

#[derive(Debug)]
struct Latest {
    summary: OrderSummary,
    updates: usize,
}

/// Keeps an [`OrderSummary`] in sync with an order.
///
/// Shares its state with the listener it registers, so it must live on the
/// same thread as the order.
#[derive(Debug)]
pub struct OrderPresenter {
    latest: Rc<RefCell<Latest>>,
    subscription: SubscriptionId,
}

impl OrderPresenter {
    /// Seeds the summary from the order's current state and subscribes to
    /// future changes.
    pub fn attach(
        order: &mut OrderState,
        style: CurrencyStyle,
    ) -> Self {
        let latest = Rc::new(RefCell::new(Latest {
            summary: OrderSummary::from_snapshot(&order.snapshot(), &style),
            updates: 0,
        }));

        let sink = Rc::clone(&latest);
        let subscription = order.subscribe(move |change: &OrderChange| {
            let mut latest = sink.borrow_mut();
            latest.summary = OrderSummary::from_snapshot(&change.snapshot, &style);
            latest.updates += 1;
        });

        Self {
            latest,
            subscription,
        }
    }

    pub fn summary(&self) -> OrderSummary {
        self.latest.borrow().summary.clone()
    }

    /// Number of change notifications received since attaching.
    pub fn updates(&self) -> usize {
        self.latest.borrow().updates
    }

    /// Stops listening. Returns `false` if the order no longer knew about
    /// this presenter.
    pub fn detach(
        self,
        order: &mut OrderState,
    ) -> bool {
        order.unsubscribe(self.subscription)
    }
}
