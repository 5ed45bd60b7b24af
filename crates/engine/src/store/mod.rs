//! The budget store.
//!
//! [`BudgetState`] groups one slice per domain area. Slices are updated by
//! pure reducers (`state + action -> state`); the only way to change the state
//! held by a [`StoreHandle`] is [`StoreHandle::dispatch`], which applies one
//! action at a time and then tells every observer and subscriber which kind
//! of action was applied.

use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use api_types::{
    budget::BudgetSnapshot, debts::DebtsState, expenses::ExpensesState, income::IncomeState,
    savings::SavingsState, ui::UiState,
};
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use crate::MoneyCents;

pub use action::{Action, CategoryChanges, DebtChanges, GoalChanges, kinds};

mod action;
pub mod debts;
pub mod expenses;
pub mod income;
pub mod savings;
pub mod ui;

/// A partition of the store with its own reducer.
///
/// Reducers never fail: actions that target unknown ids leave the slice as
/// it is.
pub trait Slice: Sized {
    fn reduce(self, action: &Action) -> Self;
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BudgetState {
    pub income: IncomeState,
    pub expenses: ExpensesState,
    pub savings: SavingsState,
    pub debts: DebtsState,
    pub ui: UiState,
}

impl Slice for BudgetState {
    fn reduce(self, action: &Action) -> Self {
        Self {
            income: self.income.reduce(action),
            expenses: self.expenses.reduce(action),
            savings: self.savings.reduce(action),
            debts: self.debts.reduce(action),
            ui: self.ui.reduce(action),
        }
    }
}

impl BudgetState {
    /// Build the complete snapshot persisted by the gateways.
    pub fn to_snapshot(&self, last_updated: DateTime<Utc>) -> BudgetSnapshot {
        BudgetSnapshot {
            income: self.income.clone(),
            expenses: self.expenses.clone(),
            savings: self.savings.clone(),
            debts: self.debts.clone(),
            ui: self.ui.clone(),
            last_updated,
        }
    }

    pub fn total_income(&self) -> MoneyCents {
        income::total(&self.income)
    }

    pub fn total_debt(&self) -> MoneyCents {
        debts::total_balance(&self.debts)
    }

    /// What is left each month after budgeted expenses and minimum debt
    /// payments. Negative when the budget does not balance.
    pub fn monthly_remainder(&self) -> MoneyCents {
        self.total_income()
            - expenses::totals(&self.expenses).budgeted
            - debts::total_minimum_payments(&self.debts)
    }
}

/// Notification sent to subscribers after an action has been applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreEvent {
    Applied { kind: &'static str },
}

/// Callback run inside [`StoreHandle::dispatch`], right after the action is
/// applied.
type Observer = Box<dyn Fn(&StoreEvent) + Send + Sync>;

struct Store {
    state: BudgetState,
    observers: Vec<Observer>,
    subscribers: Vec<mpsc::UnboundedSender<StoreEvent>>,
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("observers", &self.observers.len())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// Shared handle on a budget store.
///
/// Cloning the handle shares the same store; there is no process-wide
/// instance, each owner creates its own and passes it to the controllers.
#[derive(Clone, Debug)]
pub struct StoreHandle {
    inner: Arc<Mutex<Store>>,
}

impl Default for StoreHandle {
    fn default() -> Self {
        Self::new(BudgetState::default())
    }
}

impl StoreHandle {
    pub fn new(state: BudgetState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Store {
                state,
                observers: Vec::new(),
                subscribers: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        // Reducers are pure, a poisoned lock still holds a consistent state.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `action`, run the observers and notify subscribers.
    ///
    /// The lock is held until every observer has returned and every
    /// subscriber has been notified, so events are seen in dispatch order.
    pub fn dispatch(&self, action: Action) {
        let event = StoreEvent::Applied {
            kind: action.kind(),
        };
        let mut store = self.lock();
        let state = std::mem::take(&mut store.state);
        store.state = state.reduce(&action);
        for observer in &store.observers {
            observer(&event);
        }
        store.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        tracing::trace!(kind = action.kind(), "action applied");
    }

    /// Run `observer` synchronously for every action dispatched from now on.
    ///
    /// Observers run with the store locked: they must not dispatch or read
    /// the store themselves.
    pub fn observe(&self, observer: impl Fn(&StoreEvent) + Send + Sync + 'static) {
        self.lock().observers.push(Box::new(observer));
    }

    /// Receive a [`StoreEvent`] for every action dispatched from now on.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<StoreEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock().subscribers.push(tx);
        rx
    }

    /// Run a selector against the current state.
    pub fn select<T>(&self, selector: impl FnOnce(&BudgetState) -> T) -> T {
        selector(&self.lock().state)
    }

    pub fn state(&self) -> BudgetState {
        self.select(BudgetState::clone)
    }

    pub fn snapshot(&self, last_updated: DateTime<Utc>) -> BudgetSnapshot {
        self.select(|state| state.to_snapshot(last_updated))
    }
}

#[cfg(test)]
mod tests {
    use api_types::budget::SnapshotPayload;

    use super::*;

    #[test]
    fn dispatch_applies_and_notifies_in_order() {
        let store = StoreHandle::default();
        let mut events = store.subscribe();

        store.dispatch(Action::UpdateMonthlyIncome {
            amount_minor: 250_000,
        });
        store.dispatch(Action::SetSelectedMonth {
            month: "2025-02".to_string(),
        });

        assert_eq!(
            events.try_recv().unwrap(),
            StoreEvent::Applied {
                kind: kinds::UPDATE_MONTHLY_INCOME
            }
        );
        assert_eq!(
            events.try_recv().unwrap(),
            StoreEvent::Applied {
                kind: kinds::SET_SELECTED_MONTH
            }
        );
        assert!(events.try_recv().is_err());
        assert_eq!(store.select(BudgetState::total_income), MoneyCents::new(250_000));
    }

    #[test]
    fn observers_run_before_dispatch_returns() {
        let store = StoreHandle::default();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        store.observe(move |StoreEvent::Applied { kind }| sink.lock().unwrap().push(*kind));

        store.dispatch(Action::add_category("Rent", 100_000, true));
        assert_eq!(*seen.lock().unwrap(), vec![kinds::ADD_CATEGORY]);

        store.dispatch(Action::Reset);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![kinds::ADD_CATEGORY, kinds::RESET]
        );
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let store = StoreHandle::default();
        drop(store.subscribe());
        store.dispatch(Action::Reset);
        assert!(store.lock().subscribers.is_empty());
    }

    #[test]
    fn snapshot_round_trips_through_hydrate() {
        let store = StoreHandle::default();
        store.dispatch(Action::UpdateMonthlyIncome {
            amount_minor: 400_000,
        });
        store.dispatch(Action::add_category("Rent", 120_000, true));
        store.dispatch(Action::add_goal("Emergency", 500_000, None));
        store.dispatch(Action::add_debt("Card", 80_000, 1_999, 4_000));
        store.dispatch(Action::ToggleSection {
            section: "debts".to_string(),
        });
        let snapshot = store.snapshot(Utc::now());

        let other = StoreHandle::default();
        other.dispatch(Action::hydrate(SnapshotPayload::from(snapshot)));
        assert_eq!(other.state(), store.state());
    }

    #[test]
    fn remainder_accounts_for_expenses_and_minimums() {
        let state = BudgetState::default()
            .reduce(&Action::UpdateMonthlyIncome {
                amount_minor: 300_000,
            })
            .reduce(&Action::add_category("Rent", 100_000, true))
            .reduce(&Action::add_debt("Card", 50_000, 2_000, 10_000));
        assert_eq!(state.monthly_remainder(), MoneyCents::new(190_000));
        assert_eq!(state.total_debt(), MoneyCents::new(50_000));
    }
}
