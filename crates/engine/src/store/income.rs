use api_types::income::{IncomePatch, IncomeState};

use super::{Action, Slice};
use crate::MoneyCents;

impl Slice for IncomeState {
    fn reduce(mut self, action: &Action) -> Self {
        match action {
            Action::UpdateMonthlyIncome { amount_minor } => {
                self.monthly_income_minor = *amount_minor;
            }
            Action::AddIncomeSource(source) => {
                self.sources.push(source.clone());
            }
            Action::UpdateIncomeSource {
                id,
                name,
                amount_minor,
            } => {
                if let Some(source) = self.sources.iter_mut().find(|s| s.id == *id) {
                    if let Some(name) = name {
                        source.name = name.clone();
                    }
                    if let Some(amount_minor) = amount_minor {
                        source.amount_minor = *amount_minor;
                    }
                }
            }
            Action::RemoveIncomeSource { id } => {
                self.sources.retain(|s| s.id != *id);
            }
            Action::Hydrate(payload) => {
                if let Some(patch) = &payload.income {
                    return hydrate(self, patch.clone());
                }
            }
            Action::Reset => return Self::default(),
            _ => {}
        }
        self
    }
}

fn hydrate(mut state: IncomeState, patch: IncomePatch) -> IncomeState {
    if let Some(monthly) = patch.monthly_income_minor {
        state.monthly_income_minor = monthly;
    }
    if let Some(sources) = patch.sources {
        state.sources = sources;
    }
    state
}

/// Monthly income plus every additional source.
pub fn total(state: &IncomeState) -> MoneyCents {
    MoneyCents::new(state.monthly_income_minor)
        + state
            .sources
            .iter()
            .map(|s| MoneyCents::new(s.amount_minor))
            .sum::<MoneyCents>()
}
