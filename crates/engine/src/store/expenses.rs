use api_types::expenses::{ExpenseCategory, ExpensesPatch, ExpensesState};

use super::{Action, Slice};
use crate::MoneyCents;

impl Slice for ExpensesState {
    fn reduce(mut self, action: &Action) -> Self {
        match action {
            Action::AddCategory(category) => {
                self.categories.push(category.clone());
            }
            Action::UpdateCategory { id, changes } => {
                if let Some(category) = self.categories.iter_mut().find(|c| c.id == *id) {
                    if let Some(name) = &changes.name {
                        category.name = name.clone();
                    }
                    if let Some(budgeted) = changes.budgeted_minor {
                        category.budgeted_minor = budgeted;
                    }
                    if let Some(spent) = changes.spent_minor {
                        category.spent_minor = spent;
                    }
                    if let Some(essential) = changes.essential {
                        category.essential = essential;
                    }
                }
            }
            Action::DeleteCategory { id } => {
                self.categories.retain(|c| c.id != *id);
            }
            Action::ToggleEssential { id } => {
                if let Some(category) = self.categories.iter_mut().find(|c| c.id == *id) {
                    category.essential = !category.essential;
                }
            }
            Action::Hydrate(payload) => {
                if let Some(ExpensesPatch {
                    categories: Some(categories),
                }) = &payload.expenses
                {
                    self.categories = categories.clone();
                }
            }
            Action::Reset => return Self::default(),
            _ => {}
        }
        self
    }
}

/// Budgeted and spent totals split by essential/flexible.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExpenseTotals {
    pub budgeted: MoneyCents,
    pub spent: MoneyCents,
    pub essential_budgeted: MoneyCents,
    pub flexible_budgeted: MoneyCents,
}

pub fn totals(state: &ExpensesState) -> ExpenseTotals {
    state
        .categories
        .iter()
        .fold(ExpenseTotals::default(), |mut acc, category| {
            let budgeted = MoneyCents::new(category.budgeted_minor);
            acc.budgeted += budgeted;
            acc.spent += MoneyCents::new(category.spent_minor);
            if category.essential {
                acc.essential_budgeted += budgeted;
            } else {
                acc.flexible_budgeted += budgeted;
            }
            acc
        })
}

/// Categories where more was spent than budgeted.
pub fn over_budget(state: &ExpensesState) -> impl Iterator<Item = &ExpenseCategory> {
    state
        .categories
        .iter()
        .filter(|c| c.spent_minor > c.budgeted_minor)
}

#[cfg(test)]
mod tests {
    use api_types::budget::SnapshotPayload;

    use super::*;
    use crate::store::CategoryChanges;

    fn with_categories() -> ExpensesState {
        ExpensesState::default()
            .reduce(&Action::add_category("Rent", 90_000, true))
            .reduce(&Action::add_category("Dining out", 20_000, false))
    }

    #[test]
    fn add_update_toggle_delete() {
        let state = with_categories();
        let rent = state.categories[0].id;
        let dining = state.categories[1].id;

        let state = state.reduce(&Action::UpdateCategory {
            id: dining,
            changes: CategoryChanges {
                spent_minor: Some(25_000),
                ..CategoryChanges::default()
            },
        });
        assert_eq!(state.categories[1].name, "Dining out");
        assert_eq!(state.categories[1].spent_minor, 25_000);
        assert_eq!(
            over_budget(&state).map(|c| c.id).collect::<Vec<_>>(),
            vec![dining]
        );

        let state = state.reduce(&Action::ToggleEssential { id: rent });
        assert!(!state.categories[0].essential);

        let state = state.reduce(&Action::DeleteCategory { id: rent });
        assert_eq!(state.categories.len(), 1);
    }

    #[test]
    fn totals_split_essential_and_flexible() {
        let totals = totals(&with_categories());
        assert_eq!(totals.budgeted, MoneyCents::new(110_000));
        assert_eq!(totals.essential_budgeted, MoneyCents::new(90_000));
        assert_eq!(totals.flexible_budgeted, MoneyCents::new(20_000));
        assert_eq!(totals.spent, MoneyCents::ZERO);
    }

    #[test]
    fn hydrate_replaces_categories_wholesale() {
        let state = with_categories();
        let incoming = ExpensesState::default().reduce(&Action::add_category("Gym", 3_000, false));
        let payload = SnapshotPayload {
            expenses: Some(ExpensesPatch {
                categories: Some(incoming.categories.clone()),
            }),
            ..SnapshotPayload::default()
        };
        let hydrated = state.reduce(&Action::hydrate(payload));
        assert_eq!(hydrated, incoming);
    }

    #[test]
    fn reset_clears_categories() {
        assert_eq!(with_categories().reduce(&Action::Reset), ExpensesState::default());
    }
}
