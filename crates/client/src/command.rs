//! Command line subcommands and the store actions they translate to.
//!
//! Entries are addressed by name (case-insensitive) since ids are not
//! something one types on a command line.

use api_types::debts::DebtPayment;
use chrono::NaiveDate;
use clap::Subcommand;
use engine::{
    BudgetState, MoneyCents,
    store::{Action, CategoryChanges},
};
use uuid::Uuid;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the budget and the save status.
    Show,
    /// Set the monthly income.
    SetIncome { amount: MoneyCents },
    /// Add an extra income source.
    AddSource { name: String, amount: MoneyCents },
    RemoveSource { name: String },
    /// Add an expense category with its monthly budget.
    AddExpense {
        name: String,
        budgeted: MoneyCents,
        #[arg(long)]
        essential: bool,
    },
    /// Record spending against a category.
    Spend { name: String, amount: MoneyCents },
    ToggleEssential { name: String },
    RemoveExpense { name: String },
    /// Add a savings goal.
    AddGoal {
        name: String,
        target: MoneyCents,
        /// Target date (YYYY-MM-DD).
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    Contribute { name: String, amount: MoneyCents },
    RemoveGoal { name: String },
    /// Add a debt.
    AddDebt {
        name: String,
        balance: MoneyCents,
        /// Yearly interest in basis points (1999 = 19.99%).
        #[arg(long, default_value_t = 0)]
        rate_bps: u32,
        #[arg(long, default_value_t = MoneyCents::ZERO)]
        minimum: MoneyCents,
    },
    /// Record a payment towards a debt.
    PayDebt {
        name: String,
        amount: MoneyCents,
        /// Payment date (YYYY-MM-DD), today when omitted.
        #[arg(long)]
        on: Option<NaiveDate>,
    },
    RemoveDebt { name: String },
    /// Select the month shown (YYYY-MM).
    Month { month: String },
    /// Expand or collapse a dashboard section.
    ToggleSection { section: String },
    /// Save right away, bypassing the debounce.
    Save,
    /// Delete the stored budget and start over.
    Reset,
    /// Load the stored budget again.
    Reload,
}

/// What `main` has to do for a command.
#[derive(Debug, PartialEq, Eq)]
pub enum Plan {
    Dispatch(Action),
    Save,
    Reset,
    Reload,
    Show,
}

impl Command {
    pub fn plan(self, state: &BudgetState, today: NaiveDate) -> Result<Plan> {
        let action = match self {
            Command::Show => return Ok(Plan::Show),
            Command::Save => return Ok(Plan::Save),
            Command::Reset => return Ok(Plan::Reset),
            Command::Reload => return Ok(Plan::Reload),

            Command::SetIncome { amount } => Action::UpdateMonthlyIncome {
                amount_minor: non_negative(amount)?,
            },
            Command::AddSource { name, amount } => {
                Action::add_income_source(name, non_negative(amount)?)
            }
            Command::RemoveSource { name } => Action::RemoveIncomeSource {
                id: find(
                    "income source",
                    &name,
                    state.income.sources.iter().map(|s| (s.id, s.name.as_str())),
                )?,
            },

            Command::AddExpense {
                name,
                budgeted,
                essential,
            } => Action::add_category(name, non_negative(budgeted)?, essential),
            Command::Spend { name, amount } => {
                let amount = positive(amount)?;
                let category = state
                    .expenses
                    .categories
                    .iter()
                    .find(|c| c.name.eq_ignore_ascii_case(&name))
                    .ok_or(AppError::NotFound {
                        kind: "expense category",
                        name,
                    })?;
                Action::UpdateCategory {
                    id: category.id,
                    changes: CategoryChanges {
                        spent_minor: Some(category.spent_minor.saturating_add(amount)),
                        ..CategoryChanges::default()
                    },
                }
            }
            Command::ToggleEssential { name } => Action::ToggleEssential {
                id: category_id(state, &name)?,
            },
            Command::RemoveExpense { name } => Action::DeleteCategory {
                id: category_id(state, &name)?,
            },

            Command::AddGoal { name, target, date } => {
                Action::add_goal(name, positive(target)?, date)
            }
            Command::Contribute { name, amount } => Action::Contribute {
                id: goal_id(state, &name)?,
                amount_minor: positive(amount)?,
            },
            Command::RemoveGoal { name } => Action::DeleteGoal {
                id: goal_id(state, &name)?,
            },

            Command::AddDebt {
                name,
                balance,
                rate_bps,
                minimum,
            } => Action::add_debt(
                name,
                non_negative(balance)?,
                rate_bps,
                non_negative(minimum)?,
            ),
            Command::PayDebt { name, amount, on } => Action::RecordPayment {
                id: debt_id(state, &name)?,
                payment: DebtPayment {
                    amount_minor: positive(amount)?,
                    paid_on: on.unwrap_or(today),
                },
            },
            Command::RemoveDebt { name } => Action::DeleteDebt {
                id: debt_id(state, &name)?,
            },

            Command::Month { month } => {
                if NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d").is_err() {
                    return Err(AppError::InvalidMonth(month));
                }
                Action::SetSelectedMonth { month }
            }
            Command::ToggleSection { section } => Action::ToggleSection { section },
        };

        Ok(Plan::Dispatch(action))
    }
}

fn non_negative(amount: MoneyCents) -> Result<i64> {
    if amount.is_negative() {
        return Err(AppError::InvalidAmount(format!("{amount} is negative")));
    }
    Ok(amount.cents())
}

fn positive(amount: MoneyCents) -> Result<i64> {
    match non_negative(amount)? {
        0 => Err(AppError::InvalidAmount("amount must be > 0".to_string())),
        cents => Ok(cents),
    }
}

fn find<'a>(
    kind: &'static str,
    name: &str,
    mut entries: impl Iterator<Item = (Uuid, &'a str)>,
) -> Result<Uuid> {
    entries
        .find(|(_, entry)| entry.eq_ignore_ascii_case(name))
        .map(|(id, _)| id)
        .ok_or_else(|| AppError::NotFound {
            kind,
            name: name.to_string(),
        })
}

fn category_id(state: &BudgetState, name: &str) -> Result<Uuid> {
    let entries = state.expenses.categories.iter();
    find("expense category", name, entries.map(|c| (c.id, c.name.as_str())))
}

fn goal_id(state: &BudgetState, name: &str) -> Result<Uuid> {
    let entries = state.savings.goals.iter();
    find("savings goal", name, entries.map(|g| (g.id, g.name.as_str())))
}

fn debt_id(state: &BudgetState, name: &str) -> Result<Uuid> {
    let entries = state.debts.debts.iter();
    find("debt", name, entries.map(|d| (d.id, d.name.as_str())))
}

#[cfg(test)]
mod tests {
    use engine::Slice;

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 20).unwrap()
    }

    fn state_with(actions: &[Action]) -> BudgetState {
        actions
            .iter()
            .fold(BudgetState::default(), |state, action| state.reduce(action))
    }

    fn dispatched(plan: Plan) -> Action {
        match plan {
            Plan::Dispatch(action) => action,
            other => panic!("expected an action, got {other:?}"),
        }
    }

    #[test]
    fn set_income_translates_to_monthly_income_update() {
        let plan = Command::SetIncome {
            amount: "5200".parse().unwrap(),
        }
        .plan(&BudgetState::default(), today())
        .unwrap();

        assert_eq!(
            plan,
            Plan::Dispatch(Action::UpdateMonthlyIncome {
                amount_minor: 520_000
            })
        );
    }

    #[test]
    fn spend_adds_to_what_was_already_spent() {
        let state = state_with(&[Action::add_category("Groceries", 40_000, true)]);
        let id = state.expenses.categories[0].id;
        let state = state.reduce(&Action::UpdateCategory {
            id,
            changes: CategoryChanges {
                spent_minor: Some(10_000),
                ..CategoryChanges::default()
            },
        });

        let action = dispatched(
            Command::Spend {
                name: "groceries".to_string(),
                amount: "25.50".parse().unwrap(),
            }
            .plan(&state, today())
            .unwrap(),
        );

        let state = state.reduce(&action);
        assert_eq!(state.expenses.categories[0].spent_minor, 12_550);
    }

    #[test]
    fn unknown_name_is_reported() {
        let err = Command::Contribute {
            name: "Holiday".to_string(),
            amount: MoneyCents::new(100),
        }
        .plan(&BudgetState::default(), today())
        .unwrap_err();

        assert!(matches!(
            err,
            AppError::NotFound { kind: "savings goal", ref name } if name == "Holiday"
        ));
    }

    #[test]
    fn pay_debt_defaults_to_today() {
        let state = state_with(&[Action::add_debt("Card", 100_000, 1999, 5_000)]);

        let action = dispatched(
            Command::PayDebt {
                name: "card".to_string(),
                amount: MoneyCents::new(20_000),
                on: None,
            }
            .plan(&state, today())
            .unwrap(),
        );

        let Action::RecordPayment { payment, .. } = action else {
            panic!("expected a payment");
        };
        assert_eq!(payment.paid_on, today());
        assert_eq!(payment.amount_minor, 20_000);
    }

    #[test]
    fn amounts_are_validated() {
        let err = Command::SetIncome {
            amount: MoneyCents::new(-1),
        }
        .plan(&BudgetState::default(), today())
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidAmount(_)));

        let err = Command::AddGoal {
            name: "Car".to_string(),
            target: MoneyCents::ZERO,
            date: None,
        }
        .plan(&BudgetState::default(), today())
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidAmount(_)));
    }

    #[test]
    fn month_must_be_year_and_month() {
        let ok = Command::Month {
            month: "2025-11".to_string(),
        }
        .plan(&BudgetState::default(), today());
        assert!(ok.is_ok());

        let err = Command::Month {
            month: "2025-13".to_string(),
        }
        .plan(&BudgetState::default(), today())
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidMonth(_)));
    }

    #[test]
    fn storage_commands_do_not_dispatch() {
        let state = BudgetState::default();
        assert_eq!(Command::Save.plan(&state, today()).unwrap(), Plan::Save);
        assert_eq!(Command::Reset.plan(&state, today()).unwrap(), Plan::Reset);
        assert_eq!(Command::Reload.plan(&state, today()).unwrap(), Plan::Reload);
        assert_eq!(Command::Show.plan(&state, today()).unwrap(), Plan::Show);
    }
}
