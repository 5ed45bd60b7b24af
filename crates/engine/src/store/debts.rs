use api_types::debts::{Debt, DebtsPatch, DebtsState};
use uuid::Uuid;

use super::{Action, Slice};
use crate::MoneyCents;

impl Slice for DebtsState {
    fn reduce(mut self, action: &Action) -> Self {
        match action {
            Action::AddDebt(debt) => self.debts.push(debt.clone()),
            Action::UpdateDebt { id, changes } => {
                if let Some(debt) = debt_mut(&mut self.debts, *id) {
                    if let Some(name) = &changes.name {
                        debt.name = name.clone();
                    }
                    if let Some(balance) = changes.balance_minor {
                        debt.balance_minor = balance;
                    }
                    if let Some(rate) = changes.interest_rate_bps {
                        debt.interest_rate_bps = rate;
                    }
                    if let Some(minimum) = changes.minimum_payment_minor {
                        debt.minimum_payment_minor = minimum;
                    }
                }
            }
            Action::DeleteDebt { id } => self.debts.retain(|d| d.id != *id),
            Action::RecordPayment { id, payment } => {
                if let Some(debt) = debt_mut(&mut self.debts, *id) {
                    // A payment larger than the balance closes the debt.
                    debt.balance_minor = debt.balance_minor.saturating_sub(payment.amount_minor).max(0);
                    debt.payments.push(payment.clone());
                }
            }
            Action::Hydrate(payload) => {
                if let Some(DebtsPatch { debts: Some(debts) }) = &payload.debts {
                    self.debts = debts.clone();
                }
            }
            Action::Reset => return Self::default(),
            _ => {}
        }
        self
    }
}

fn debt_mut(debts: &mut [Debt], id: Uuid) -> Option<&mut Debt> {
    debts.iter_mut().find(|d| d.id == id)
}

pub fn total_balance(state: &DebtsState) -> MoneyCents {
    state.debts.iter().map(|d| MoneyCents::new(d.balance_minor)).sum()
}

pub fn total_minimum_payments(state: &DebtsState) -> MoneyCents {
    state
        .debts
        .iter()
        .filter(|d| d.balance_minor > 0)
        .map(|d| MoneyCents::new(d.minimum_payment_minor))
        .sum()
}

/// Debts ordered for the avalanche strategy (highest interest first).
pub fn by_interest_desc(state: &DebtsState) -> Vec<&Debt> {
    let mut debts: Vec<&Debt> = state.debts.iter().filter(|d| d.balance_minor > 0).collect();
    debts.sort_by(|a, b| b.interest_rate_bps.cmp(&a.interest_rate_bps));
    debts
}
