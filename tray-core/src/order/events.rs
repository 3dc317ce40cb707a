//! Change notifications published by [`OrderState`](super::OrderState).
//!
//! Listeners receive an [`OrderChange`] after a mutator has finished, so the
//! snapshot they see always has subtotal, tax and total in agreement.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Category, MenuItem};

/// An observable value on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderField {
    Entree,
    Side,
    Accompaniment,
    Subtotal,
    Tax,
    Total,
}

impl OrderField {
    pub const ALL: [OrderField; 6] = [
        Self::Entree,
        Self::Side,
        Self::Accompaniment,
        Self::Subtotal,
        Self::Tax,
        Self::Total,
    ];

    /// Fields recomputed whenever any selection changes.
    pub const DERIVED: [OrderField; 3] = [Self::Subtotal, Self::Tax, Self::Total];

    pub fn is_derived(&self) -> bool {
        Self::DERIVED.contains(self)
    }
}

impl From<Category> for OrderField {
    fn from(category: Category) -> Self {
        match category {
            Category::Entree => Self::Entree,
            Category::Side => Self::Side,
            Category::Accompaniment => Self::Accompaniment,
        }
    }
}

/// A consistent, owned copy of every observable value on an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSnapshot {
    pub entree: Option<MenuItem>,
    pub side: Option<MenuItem>,
    pub accompaniment: Option<MenuItem>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl OrderSnapshot {
    pub fn selection(
        &self,
        course: Category,
    ) -> Option<&MenuItem> {
        match course {
            Category::Entree => self.entree.as_ref(),
            Category::Side => self.side.as_ref(),
            Category::Accompaniment => self.accompaniment.as_ref(),
        }
    }
}

/// What changed, and the order as it stands afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderChange {
    pub fields: Vec<OrderField>,
    pub snapshot: OrderSnapshot,
}

/// Receives order changes. Implemented for any `FnMut(&OrderChange)`.
pub trait OrderListener {
    fn on_change(
        &mut self,
        change: &OrderChange,
    );
}

impl<F> OrderListener for F
where
    F: FnMut(&OrderChange),
{
    fn on_change(
        &mut self,
        change: &OrderChange,
    ) {
        self(change)
    }
}

/// Handle returned by [`OrderState::subscribe`](super::OrderState::subscribe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Listener list, notified in subscription order.
#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u64,
    entries: Vec<(SubscriptionId, Box<dyn OrderListener>)>,
}

impl Listeners {
    pub(crate) fn add(
        &mut self,
        listener: Box<dyn OrderListener>,
    ) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.entries.push((id, listener));
        id
    }

    pub(crate) fn remove(
        &mut self,
        id: SubscriptionId,
    ) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(existing, _)| *existing != id);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn notify(
        &mut self,
        change: &OrderChange,
    ) {
        for (_, listener) in &mut self.entries {
            listener.on_change(change);
        }
    }
}
