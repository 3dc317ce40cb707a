use std::fmt;
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use super::error::OrderError;
use super::events::{Listeners, OrderChange, OrderField, OrderListener, OrderSnapshot, SubscriptionId};
use crate::calculations::{replace_price, tax_for, total_for};
use crate::catalog::MenuCatalog;
use crate::config::{ConfigError, OrderConfig};
use crate::models::{Category, MenuItem};

/// Where an order sits in its (two-state) lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderPhase {
    /// Nothing selected; all amounts are zero.
    Empty,
    /// At least one course selected.
    InProgress,
}

/// The single in-progress order for one ordering session.
///
/// Holds one optional item per course and keeps `subtotal`, `tax` and
/// `total` in step with them. Every successful mutator recomputes all three
/// before any listener runs. Failed mutators change nothing and notify no
/// one.
///
/// `OrderState` is confined to the thread that owns it: listeners are not
/// required to be `Send`.
pub struct OrderState {
    catalog: Arc<dyn MenuCatalog>,
    tax_rate: Decimal,

    entree: Option<MenuItem>,
    side: Option<MenuItem>,
    accompaniment: Option<MenuItem>,

    subtotal: Decimal,
    tax: Decimal,
    total: Decimal,

    listeners: Listeners,
}

impl OrderState {
    /// Creates an empty order priced with the default tax rate.
    pub fn new(catalog: Arc<dyn MenuCatalog>) -> Self {
        Self::build(catalog, OrderConfig::default())
    }

    /// Creates an empty order with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration fails validation.
    pub fn with_config(
        catalog: Arc<dyn MenuCatalog>,
        config: OrderConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(catalog, config))
    }

    fn build(
        catalog: Arc<dyn MenuCatalog>,
        config: OrderConfig,
    ) -> Self {
        Self {
            catalog,
            tax_rate: config.tax_rate,
            entree: None,
            side: None,
            accompaniment: None,
            subtotal: Decimal::ZERO,
            tax: Decimal::ZERO,
            total: Decimal::ZERO,
            listeners: Listeners::default(),
        }
    }

    // ─── mutators ──────────────────────────────────────────────────────────

    pub fn set_entree(
        &mut self,
        name: &str,
    ) -> Result<(), OrderError> {
        self.select(Category::Entree, name)
    }

    pub fn set_side(
        &mut self,
        name: &str,
    ) -> Result<(), OrderError> {
        self.select(Category::Side, name)
    }

    pub fn set_accompaniment(
        &mut self,
        name: &str,
    ) -> Result<(), OrderError> {
        self.select(Category::Accompaniment, name)
    }

    /// Puts the catalog item `name` into `course`, replacing any previous
    /// choice for that course.
    ///
    /// # Errors
    ///
    /// [`OrderError::InvalidSelection`] if `name` is not in the catalog or is
    /// listed under a different category; [`OrderError::AmountOutOfRange`] if
    /// the new amounts cannot be represented. Either way nothing changes.
    pub fn select(
        &mut self,
        course: Category,
        name: &str,
    ) -> Result<(), OrderError> {
        let item = self
            .catalog
            .lookup(name, course)
            .map(MenuItem::clone)
            .map_err(|reason| {
                warn!(%course, name, %reason, "rejected selection");
                OrderError::InvalidSelection {
                    name: name.to_string(),
                    course,
                    reason,
                }
            })?;

        let previous = self.slot(course).map(|current| current.price);
        let priced = replace_price(self.subtotal, previous, Some(item.price)).and_then(
            |replacement| {
                let (tax, total) = self.recompute_tax_and_total(replacement.subtotal)?;
                Some((replacement, tax, total))
            },
        );
        let Some((replacement, tax, total)) = priced else {
            warn!(%course, name, price = %item.price, "order amounts out of range");
            return Err(OrderError::AmountOutOfRange {
                name: name.to_string(),
                course,
            });
        };
        if replacement.clamped {
            warn!(
                %course,
                subtotal = %self.subtotal,
                previous = ?previous,
                "subtotal would go negative; clamped to zero"
            );
        }

        debug!(%course, item = %item.name, price = %item.price, "selected");
        *self.slot_mut(course) = Some(item);
        self.subtotal = replacement.subtotal;
        self.tax = tax;
        self.total = total;

        self.publish(vec![
            OrderField::from(course),
            OrderField::Subtotal,
            OrderField::Tax,
            OrderField::Total,
        ]);
        Ok(())
    }

    /// Clears every course and zeroes all amounts.
    pub fn reset_order(&mut self) {
        self.entree = None;
        self.side = None;
        self.accompaniment = None;
        self.subtotal = Decimal::ZERO;
        self.tax = Decimal::ZERO;
        self.total = Decimal::ZERO;

        info!("order reset");
        self.publish(OrderField::ALL.to_vec());
    }

    /// Tax and total for `subtotal` at this order's rate.
    fn recompute_tax_and_total(
        &self,
        subtotal: Decimal,
    ) -> Option<(Decimal, Decimal)> {
        let tax = tax_for(subtotal, self.tax_rate)?;
        Some((tax, total_for(subtotal, tax)?))
    }

    // ─── observation ───────────────────────────────────────────────────────

    /// Registers a listener that is called after every successful mutation.
    pub fn subscribe<L>(
        &mut self,
        listener: L,
    ) -> SubscriptionId
    where
        L: OrderListener + 'static,
    {
        self.listeners.add(Box::new(listener))
    }

    /// Removes a listener. Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(
        &mut self,
        id: SubscriptionId,
    ) -> bool {
        self.listeners.remove(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn entree(&self) -> Option<&MenuItem> {
        self.entree.as_ref()
    }

    pub fn side(&self) -> Option<&MenuItem> {
        self.side.as_ref()
    }

    pub fn accompaniment(&self) -> Option<&MenuItem> {
        self.accompaniment.as_ref()
    }

    pub fn selection(
        &self,
        course: Category,
    ) -> Option<&MenuItem> {
        self.slot(course)
    }

    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    pub fn tax(&self) -> Decimal {
        self.tax
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    pub fn catalog(&self) -> &dyn MenuCatalog {
        self.catalog.as_ref()
    }

    pub fn phase(&self) -> OrderPhase {
        if Category::ALL.iter().any(|course| self.slot(*course).is_some()) {
            OrderPhase::InProgress
        } else {
            OrderPhase::Empty
        }
    }

    /// True once every course has a selection.
    pub fn is_complete(&self) -> bool {
        Category::ALL.iter().all(|course| self.slot(*course).is_some())
    }

    pub fn snapshot(&self) -> OrderSnapshot {
        OrderSnapshot {
            entree: self.entree.clone(),
            side: self.side.clone(),
            accompaniment: self.accompaniment.clone(),
            subtotal: self.subtotal,
            tax: self.tax,
            total: self.total,
        }
    }

    // ─── internals ─────────────────────────────────────────────────────────

    fn slot(
        &self,
        course: Category,
    ) -> Option<&MenuItem> {
        match course {
            Category::Entree => self.entree.as_ref(),
            Category::Side => self.side.as_ref(),
            Category::Accompaniment => self.accompaniment.as_ref(),
        }
    }

    fn slot_mut(
        &mut self,
        course: Category,
    ) -> &mut Option<MenuItem> {
        match course {
            Category::Entree => &mut self.entree,
            Category::Side => &mut self.side,
            Category::Accompaniment => &mut self.accompaniment,
        }
    }

    fn publish(
        &mut self,
        fields: Vec<OrderField>,
    ) {
        let change = OrderChange {
            fields,
            snapshot: self.snapshot(),
        };
        self.listeners.notify(&change);
    }
}

impl fmt::Debug for OrderState {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("OrderState")
            .field("tax_rate", &self.tax_rate)
            .field("entree", &self.entree)
            .field("side", &self.side)
            .field("accompaniment", &self.accompaniment)
            .field("subtotal", &self.subtotal)
            .field("tax", &self.tax)
            .field("total", &self.total)
            .field("subscribers", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::io;
    use std::rc::Rc;
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::catalog::{LookupError, StaticCatalog, default_menu};

    /// Menu used by the worked example: every name is its own key.
    fn fixture_catalog() -> Arc<dyn MenuCatalog> {
        Arc::new(
            StaticCatalog::from_items([
                MenuItem::new("Cauliflower", Category::Entree, dec!(7.00)),
                MenuItem::new("A", Category::Entree, dec!(5.00)),
                MenuItem::new("B", Category::Entree, dec!(7.00)),
                MenuItem::new("Rice", Category::Side, dec!(2.50)),
                MenuItem::new("Potato Salad", Category::Side, dec!(3.00)),
                MenuItem::new("Eggroll", Category::Accompaniment, dec!(1.50)),
                MenuItem::new("Free Water", Category::Accompaniment, dec!(0.00)),
            ])
            .unwrap(),
        )
    }

    fn order() -> OrderState {
        OrderState::new(fixture_catalog())
    }

    fn expected_subtotal(state: &OrderState) -> Decimal {
        Category::ALL
            .iter()
            .filter_map(|course| state.selection(*course))
            .map(|item| item.price)
            .sum()
    }

    fn assert_consistent(state: &OrderState) {
        assert_eq!(state.subtotal(), expected_subtotal(state));
        assert_eq!(state.tax(), state.subtotal() * dec!(0.08));
        assert_eq!(state.total(), state.subtotal() + state.tax());
    }

    /// Collects every change a listener receives.
    fn recorder(state: &mut OrderState) -> Rc<RefCell<Vec<OrderChange>>> {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&changes);
        state.subscribe(move |change: &OrderChange| sink.borrow_mut().push(change.clone()));
        changes
    }

    /// Catalog with no price ceiling, like a third-party implementation.
    struct UnboundedCatalog(Vec<(String, MenuItem)>);

    impl MenuCatalog for UnboundedCatalog {
        fn get(
            &self,
            key: &str,
        ) -> Option<&MenuItem> {
            self.0.iter().find(|(k, _)| k == key).map(|(_, item)| item)
        }

        fn entries(&self) -> Vec<(&str, &MenuItem)> {
            self.0.iter().map(|(k, item)| (k.as_str(), item)).collect()
        }
    }

    /// Shared buffer that a test subscriber writes formatted events into.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(
            &mut self,
            buf: &[u8],
        ) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Runs `f` with WARN-level events captured, and returns what was logged.
    fn capture_warnings(f: impl FnOnce()) -> String {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, f);
        logs.contents()
    }

    // =========================================================================
    // construction tests
    // =========================================================================

    #[test]
    fn new_order_is_empty() {
        let state = order();

        assert_eq!(state.phase(), OrderPhase::Empty);
        assert_eq!(state.entree(), None);
        assert_eq!(state.side(), None);
        assert_eq!(state.accompaniment(), None);
        assert_eq!(state.subtotal(), dec!(0.00));
        assert_eq!(state.tax(), dec!(0.00));
        assert_eq!(state.total(), dec!(0.00));
        assert_eq!(state.tax_rate(), dec!(0.08));
    }

    #[test]
    fn with_config_rejects_invalid_rate() {
        let result = OrderState::with_config(fixture_catalog(), OrderConfig { tax_rate: dec!(2) });

        assert_eq!(result.unwrap_err(), ConfigError::TaxRateOutOfRange(dec!(2)));
    }

    #[test]
    fn with_config_uses_custom_rate() {
        let mut state = OrderState::with_config(
            fixture_catalog(),
            OrderConfig {
                tax_rate: dec!(0.10),
            },
        )
        .unwrap();

        state.set_entree("Cauliflower").unwrap();

        assert_eq!(state.tax(), dec!(0.70));
        assert_eq!(state.total(), dec!(7.70));
    }

    // =========================================================================
    // selection tests
    // =========================================================================

    #[test]
    fn selecting_every_course_sums_prices() {
        let mut state = order();

        state.set_entree("Cauliflower").unwrap();
        state.set_side("Rice").unwrap();
        state.set_accompaniment("Eggroll").unwrap();

        assert_eq!(state.subtotal(), dec!(11.00));
        assert_eq!(state.tax(), dec!(0.88));
        assert_eq!(state.total(), dec!(11.88));
        assert!(state.is_complete());
    }

    #[test]
    fn replacing_side_updates_all_amounts() {
        let mut state = order();
        state.set_entree("Cauliflower").unwrap();
        state.set_side("Rice").unwrap();
        state.set_accompaniment("Eggroll").unwrap();

        state.set_side("Potato Salad").unwrap();

        assert_eq!(state.side().map(|item| item.name.as_str()), Some("Potato Salad"));
        assert_eq!(state.subtotal(), dec!(11.50));
        assert_eq!(state.tax(), dec!(0.92));
        assert_eq!(state.total(), dec!(12.42));
    }

    #[test]
    fn replacing_entree_does_not_double_charge() {
        let mut state = order();

        state.set_entree("A").unwrap();
        state.set_entree("B").unwrap();

        assert_eq!(state.subtotal(), dec!(7.00));
    }

    #[test]
    fn reselecting_same_item_is_idempotent() {
        let mut state = order();
        state.set_entree("Cauliflower").unwrap();
        let before = state.snapshot();

        state.set_entree("Cauliflower").unwrap();

        assert_eq!(state.snapshot(), before);
    }

    #[test]
    fn free_item_moves_order_out_of_empty() {
        let mut state = order();

        state.set_accompaniment("Free Water").unwrap();

        assert_eq!(state.phase(), OrderPhase::InProgress);
        assert_eq!(state.subtotal(), dec!(0.00));
        assert!(!state.is_complete());
    }

    #[test]
    fn invariants_hold_across_a_long_sequence() {
        let mut state = order();
        let steps: [(Category, &str); 9] = [
            (Category::Side, "Rice"),
            (Category::Entree, "A"),
            (Category::Accompaniment, "Eggroll"),
            (Category::Entree, "B"),
            (Category::Side, "Potato Salad"),
            (Category::Entree, "Cauliflower"),
            (Category::Accompaniment, "Free Water"),
            (Category::Side, "Rice"),
            (Category::Entree, "A"),
        ];

        for (course, name) in steps {
            state.select(course, name).unwrap();
            assert_consistent(&state);
        }

        assert_eq!(state.subtotal(), dec!(7.50));
    }

    // =========================================================================
    // invalid selection tests
    // =========================================================================

    #[test]
    fn unknown_name_leaves_order_untouched() {
        let mut state = order();
        state.set_entree("Cauliflower").unwrap();
        state.set_side("Rice").unwrap();
        let before = state.snapshot();

        let result = state.set_side("NonexistentItem");

        assert_eq!(
            result,
            Err(OrderError::InvalidSelection {
                name: "NonexistentItem".to_string(),
                course: Category::Side,
                reason: LookupError::NotOnMenu,
            })
        );
        assert_eq!(state.snapshot(), before);
    }

    #[test]
    fn wrong_category_is_rejected() {
        let mut state = order();

        let result = state.set_entree("Rice");

        assert_eq!(
            result,
            Err(OrderError::InvalidSelection {
                name: "Rice".to_string(),
                course: Category::Entree,
                reason: LookupError::WrongCategory {
                    requested: Category::Entree,
                    actual: Category::Side,
                },
            })
        );
        assert_eq!(state.phase(), OrderPhase::Empty);
    }

    #[test]
    fn invalid_selection_message_names_course_and_item() {
        let mut state = order();

        let error = state.set_accompaniment("Dumpling").unwrap_err();

        assert_eq!(
            error.to_string(),
            "invalid accompaniment selection 'Dumpling': not on the menu"
        );
    }

    // =========================================================================
    // reset tests
    // =========================================================================

    #[test]
    fn reset_clears_selections_and_amounts() {
        let mut state = order();
        state.set_entree("Cauliflower").unwrap();
        state.set_side("Rice").unwrap();
        state.set_accompaniment("Eggroll").unwrap();

        state.reset_order();

        assert_eq!(state.snapshot(), OrderSnapshot::default());
        assert_eq!(state.phase(), OrderPhase::Empty);
    }

    #[test]
    fn order_is_reusable_after_reset() {
        let mut state = order();
        state.set_entree("B").unwrap();
        state.reset_order();

        state.set_side("Rice").unwrap();

        assert_eq!(state.subtotal(), dec!(2.50));
        assert_eq!(state.entree(), None);
        assert_consistent(&state);
    }

    // =========================================================================
    // notification tests
    // =========================================================================

    #[test]
    fn successful_select_notifies_course_and_amounts_once() {
        let mut state = order();
        let changes = recorder(&mut state);

        state.set_side("Rice").unwrap();

        let changes = changes.borrow();
        assert_eq!(changes.len(), 1);
        assert_eq!(
            changes[0].fields,
            vec![
                OrderField::Side,
                OrderField::Subtotal,
                OrderField::Tax,
                OrderField::Total,
            ]
        );
        assert_eq!(changes[0].snapshot.subtotal, dec!(2.50));
        assert_eq!(changes[0].snapshot.tax, dec!(0.20));
        assert_eq!(changes[0].snapshot.total, dec!(2.70));
    }

    #[test]
    fn failed_select_notifies_nobody() {
        let mut state = order();
        let changes = recorder(&mut state);

        let _ = state.set_entree("NonexistentItem");

        assert!(changes.borrow().is_empty());
    }

    #[test]
    fn reset_notifies_every_field() {
        let mut state = order();
        state.set_entree("A").unwrap();
        let changes = recorder(&mut state);

        state.reset_order();

        let changes = changes.borrow();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].fields, OrderField::ALL.to_vec());
        assert_eq!(changes[0].snapshot, OrderSnapshot::default());
    }

    #[test]
    fn every_published_snapshot_is_consistent() {
        let mut state = order();
        let changes = recorder(&mut state);

        state.set_entree("Cauliflower").unwrap();
        state.set_side("Potato Salad").unwrap();
        state.set_entree("A").unwrap();
        state.reset_order();
        state.set_accompaniment("Eggroll").unwrap();

        for change in changes.borrow().iter() {
            let snapshot = &change.snapshot;
            let selected: Decimal = Category::ALL
                .iter()
                .filter_map(|course| snapshot.selection(*course))
                .map(|item| item.price)
                .sum();
            assert_eq!(snapshot.subtotal, selected);
            assert_eq!(snapshot.tax, snapshot.subtotal * dec!(0.08));
            assert_eq!(snapshot.total, snapshot.subtotal + snapshot.tax);
        }
        assert_eq!(changes.borrow().len(), 5);
    }

    #[test]
    fn unsubscribed_listener_stops_receiving() {
        let mut state = order();
        let count = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&count);
        let id = state.subscribe(move |_: &OrderChange| *counter.borrow_mut() += 1);

        state.set_entree("A").unwrap();
        assert!(state.unsubscribe(id));
        state.set_entree("B").unwrap();

        assert_eq!(*count.borrow(), 1);
        assert_eq!(state.subscriber_count(), 0);
    }

    // =========================================================================
    // arithmetic domain tests
    // =========================================================================

    #[test]
    fn drifted_subtotal_is_clamped_not_negative() {
        let mut state = order();
        state.set_entree("B").unwrap();
        // Simulate bookkeeping drift.
        state.subtotal = dec!(1.00);

        let logged = capture_warnings(|| state.set_entree("A").unwrap());

        assert_eq!(state.subtotal(), dec!(5.00));
        assert_eq!(state.tax(), dec!(0.40));
        assert_eq!(state.total(), dec!(5.40));
        assert!(logged.contains("WARN"), "got: {logged}");
        assert!(logged.contains("clamped to zero"), "got: {logged}");
    }

    #[test]
    fn consistent_replacement_logs_no_warning() {
        let mut state = order();
        state.set_entree("B").unwrap();

        let logged = capture_warnings(|| state.set_entree("A").unwrap());

        assert_eq!(logged, "");
    }

    #[test]
    fn out_of_range_total_is_rejected_without_change() {
        let catalog = UnboundedCatalog(vec![
            (
                "Big".to_string(),
                MenuItem::new("Big", Category::Entree, dec!(50000000000000000000000000000)),
            ),
            (
                "Big2".to_string(),
                MenuItem::new("Big2", Category::Side, dec!(30000000000000000000000000000)),
            ),
        ]);
        let mut state = OrderState::new(Arc::new(catalog));
        state.set_entree("Big").unwrap();
        let before = state.snapshot();
        let changes = recorder(&mut state);

        let result = state.set_side("Big2");

        assert_eq!(
            result,
            Err(OrderError::AmountOutOfRange {
                name: "Big2".to_string(),
                course: Category::Side,
            })
        );
        assert_eq!(state.snapshot(), before);
        assert!(changes.borrow().is_empty());
    }

    // =========================================================================
    // default menu tests
    // =========================================================================

    #[test]
    fn default_menu_full_order() {
        let mut state = OrderState::new(Arc::new(default_menu()));

        state.set_entree("pasta").unwrap();
        state.set_side("soup").unwrap();
        state.set_accompaniment("berries").unwrap();

        assert_eq!(state.subtotal(), dec!(9.50));
        assert_eq!(state.tax(), dec!(0.76));
        assert_eq!(state.total(), dec!(10.26));
        assert_eq!(state.catalog().len(), 11);
    }
}
