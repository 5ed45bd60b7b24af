use std::fmt;

use chrono::{DateTime, Utc};
use engine::{
    BudgetState, MoneyCents, SyncStatus,
    store::{debts, expenses, savings},
};

/// Plain text dashboard printed after every command.
pub struct Report<'a> {
    pub state: &'a BudgetState,
    pub status: &'a SyncStatus,
    pub now: DateTime<Utc>,
}

fn rate(bps: u32) -> String {
    format!("{}.{:02}%", bps / 100, bps % 100)
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state;
        let totals = expenses::totals(&state.expenses);

        writeln!(f, "Budget {}", state.ui.selected_month)?;
        writeln!(
            f,
            "  Income     {} ({} monthly, {} sources)",
            state.total_income(),
            MoneyCents::new(state.income.monthly_income_minor),
            state.income.sources.len()
        )?;
        writeln!(
            f,
            "  Expenses   {} budgeted, {} spent ({} essential, {} flexible)",
            totals.budgeted, totals.spent, totals.essential_budgeted, totals.flexible_budgeted
        )?;
        writeln!(
            f,
            "  Savings    {} saved in {} goals",
            savings::total_saved(&state.savings),
            state.savings.goals.len()
        )?;
        writeln!(
            f,
            "  Debts      {} owed, {} minimum payments",
            state.total_debt(),
            debts::total_minimum_payments(&state.debts)
        )?;
        writeln!(f, "  Remainder  {}", state.monthly_remainder())?;

        let over: Vec<_> = expenses::over_budget(&state.expenses).collect();
        if !over.is_empty() {
            writeln!(f, "Over budget:")?;
            for category in over {
                let excess = MoneyCents::new(category.spent_minor)
                    - MoneyCents::new(category.budgeted_minor);
                writeln!(f, "  {} ({excess} over)", category.name)?;
            }
        }

        if !state.savings.goals.is_empty() {
            writeln!(f, "Goals:")?;
            for goal in &state.savings.goals {
                write!(
                    f,
                    "  {} {} / {} ({}%)",
                    goal.name,
                    MoneyCents::new(goal.saved_minor),
                    MoneyCents::new(goal.target_minor),
                    savings::progress(goal)
                )?;
                match goal.target_date {
                    Some(date) => writeln!(f, " by {date}")?,
                    None => writeln!(f)?,
                }
            }
        }

        let open_debts = debts::by_interest_desc(&state.debts);
        if !open_debts.is_empty() {
            writeln!(f, "Debts by interest:")?;
            for debt in open_debts {
                writeln!(
                    f,
                    "  {} {} at {}, minimum {}",
                    debt.name,
                    MoneyCents::new(debt.balance_minor),
                    rate(debt.interest_rate_bps),
                    MoneyCents::new(debt.minimum_payment_minor)
                )?;
            }
        }

        let status = self.status;
        write!(
            f,
            "Status: {} (last saved {})",
            status.phase().label(),
            status.last_saved_label(self.now)
        )?;
        if !status.auto_save_enabled {
            write!(f, ", auto-save off")?;
        }
        writeln!(f)?;
        if let Some(err) = &status.load_error {
            writeln!(f, "Load error: {err}")?;
        }
        if let Some(err) = &status.save_error {
            writeln!(f, "Save error: {err}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use engine::{Slice, store::Action};

    use super::*;

    fn render(state: &BudgetState, status: &SyncStatus) -> String {
        Report {
            state,
            status,
            now: Utc::now(),
        }
        .to_string()
    }

    #[test]
    fn summarizes_every_slice() {
        let state = [
            Action::UpdateMonthlyIncome {
                amount_minor: 300_000,
            },
            Action::add_category("Rent", 100_000, true),
            Action::add_debt("Card", 50_000, 1999, 2_500),
        ]
        .iter()
        .fold(BudgetState::default(), |state, action| state.reduce(action));

        let out = render(&state, &SyncStatus::default());

        assert!(out.contains("Income     3000.00"));
        assert!(out.contains("100.00 essential"));
        assert!(out.contains("Card 500.00 at 19.99%, minimum 25.00"));
        assert!(out.contains("Remainder  1975.00"));
        assert!(out.contains("Status: Not saved yet (last saved never)"));
    }

    #[test]
    fn lists_overspent_categories() {
        let state = BudgetState::default().reduce(&Action::add_category("Fun", 1_000, false));
        let id = state.expenses.categories[0].id;
        let state = state.reduce(&Action::UpdateCategory {
            id,
            changes: engine::store::CategoryChanges {
                spent_minor: Some(1_500),
                ..Default::default()
            },
        });

        let out = render(&state, &SyncStatus::default());

        assert!(out.contains("Over budget:\n  Fun (5.00 over)"));
    }

    #[test]
    fn shows_errors_and_disabled_auto_save() {
        let status = SyncStatus {
            last_saved: Some(Utc::now() - Duration::minutes(5)),
            save_error: Some("Failed to save budget data".to_string()),
            auto_save_enabled: false,
            ..SyncStatus::default()
        };

        let out = render(&BudgetState::default(), &status);

        assert!(out.contains("Status: Save failed (last saved 5 minutes ago), auto-save off"));
        assert!(out.contains("Save error: Failed to save budget data"));
    }
}
