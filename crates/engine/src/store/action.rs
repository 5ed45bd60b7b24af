//! Mutations the budget store understands.
//!
//! Every action has a stable kind string (`slice/verb`) used by subscribers,
//! most notably by the auto-save allow-list. Constructors that create new
//! items mint their ids here so reducers stay pure.

use api_types::{
    budget::SnapshotPayload,
    debts::{Debt, DebtPayment},
    expenses::ExpenseCategory,
    income::IncomeSource,
    savings::SavingsGoal,
};
use chrono::NaiveDate;
use uuid::Uuid;

pub mod kinds {
    pub const UPDATE_MONTHLY_INCOME: &str = "income/updateMonthlyIncome";
    pub const ADD_INCOME_SOURCE: &str = "income/addSource";
    pub const UPDATE_INCOME_SOURCE: &str = "income/updateSource";
    pub const REMOVE_INCOME_SOURCE: &str = "income/removeSource";

    pub const ADD_CATEGORY: &str = "expenses/addCategory";
    pub const UPDATE_CATEGORY: &str = "expenses/updateCategory";
    pub const DELETE_CATEGORY: &str = "expenses/deleteCategory";
    pub const TOGGLE_ESSENTIAL: &str = "expenses/toggleEssential";

    pub const ADD_GOAL: &str = "savings/addGoal";
    pub const UPDATE_GOAL: &str = "savings/updateGoal";
    pub const DELETE_GOAL: &str = "savings/deleteGoal";
    pub const CONTRIBUTE: &str = "savings/contribute";

    pub const ADD_DEBT: &str = "debts/addDebt";
    pub const UPDATE_DEBT: &str = "debts/updateDebt";
    pub const DELETE_DEBT: &str = "debts/deleteDebt";
    pub const RECORD_PAYMENT: &str = "debts/recordPayment";

    pub const SET_SELECTED_MONTH: &str = "ui/setSelectedMonth";
    pub const TOGGLE_SECTION: &str = "ui/toggleSection";

    pub const HYDRATE: &str = "budget/hydrate";
    pub const RESET: &str = "budget/reset";

    /// Kinds whose application is worth persisting.
    ///
    /// UI navigation, hydration and reset never trigger a save on their own;
    /// the UI slice still travels inside every snapshot.
    pub const PERSISTABLE: &[&str] = &[
        UPDATE_MONTHLY_INCOME,
        ADD_INCOME_SOURCE,
        UPDATE_INCOME_SOURCE,
        REMOVE_INCOME_SOURCE,
        ADD_CATEGORY,
        UPDATE_CATEGORY,
        DELETE_CATEGORY,
        TOGGLE_ESSENTIAL,
        ADD_GOAL,
        UPDATE_GOAL,
        DELETE_GOAL,
        CONTRIBUTE,
        ADD_DEBT,
        UPDATE_DEBT,
        DELETE_DEBT,
        RECORD_PAYMENT,
    ];
}

/// Partial update of an expense category; `None` keeps the current value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub budgeted_minor: Option<i64>,
    pub spent_minor: Option<i64>,
    pub essential: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GoalChanges {
    pub name: Option<String>,
    pub target_minor: Option<i64>,
    pub saved_minor: Option<i64>,
    pub target_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DebtChanges {
    pub name: Option<String>,
    pub balance_minor: Option<i64>,
    pub interest_rate_bps: Option<u32>,
    pub minimum_payment_minor: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    UpdateMonthlyIncome {
        amount_minor: i64,
    },
    AddIncomeSource(IncomeSource),
    UpdateIncomeSource {
        id: Uuid,
        name: Option<String>,
        amount_minor: Option<i64>,
    },
    RemoveIncomeSource {
        id: Uuid,
    },

    AddCategory(ExpenseCategory),
    UpdateCategory {
        id: Uuid,
        changes: CategoryChanges,
    },
    DeleteCategory {
        id: Uuid,
    },
    ToggleEssential {
        id: Uuid,
    },

    AddGoal(SavingsGoal),
    UpdateGoal {
        id: Uuid,
        changes: GoalChanges,
    },
    DeleteGoal {
        id: Uuid,
    },
    Contribute {
        id: Uuid,
        amount_minor: i64,
    },

    AddDebt(Debt),
    UpdateDebt {
        id: Uuid,
        changes: DebtChanges,
    },
    DeleteDebt {
        id: Uuid,
    },
    RecordPayment {
        id: Uuid,
        payment: DebtPayment,
    },

    SetSelectedMonth {
        month: String,
    },
    ToggleSection {
        section: String,
    },

    /// Replace slices with a previously persisted snapshot.
    Hydrate(Box<SnapshotPayload>),
    /// Return every slice to its defaults.
    Reset,
}

impl Action {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UpdateMonthlyIncome { .. } => kinds::UPDATE_MONTHLY_INCOME,
            Self::AddIncomeSource(_) => kinds::ADD_INCOME_SOURCE,
            Self::UpdateIncomeSource { .. } => kinds::UPDATE_INCOME_SOURCE,
            Self::RemoveIncomeSource { .. } => kinds::REMOVE_INCOME_SOURCE,
            Self::AddCategory(_) => kinds::ADD_CATEGORY,
            Self::UpdateCategory { .. } => kinds::UPDATE_CATEGORY,
            Self::DeleteCategory { .. } => kinds::DELETE_CATEGORY,
            Self::ToggleEssential { .. } => kinds::TOGGLE_ESSENTIAL,
            Self::AddGoal(_) => kinds::ADD_GOAL,
            Self::UpdateGoal { .. } => kinds::UPDATE_GOAL,
            Self::DeleteGoal { .. } => kinds::DELETE_GOAL,
            Self::Contribute { .. } => kinds::CONTRIBUTE,
            Self::AddDebt(_) => kinds::ADD_DEBT,
            Self::UpdateDebt { .. } => kinds::UPDATE_DEBT,
            Self::DeleteDebt { .. } => kinds::DELETE_DEBT,
            Self::RecordPayment { .. } => kinds::RECORD_PAYMENT,
            Self::SetSelectedMonth { .. } => kinds::SET_SELECTED_MONTH,
            Self::ToggleSection { .. } => kinds::TOGGLE_SECTION,
            Self::Hydrate(_) => kinds::HYDRATE,
            Self::Reset => kinds::RESET,
        }
    }

    pub fn add_income_source(name: impl Into<String>, amount_minor: i64) -> Self {
        Self::AddIncomeSource(IncomeSource {
            id: Uuid::new_v4(),
            name: name.into(),
            amount_minor,
        })
    }

    pub fn add_category(name: impl Into<String>, budgeted_minor: i64, essential: bool) -> Self {
        Self::AddCategory(ExpenseCategory {
            id: Uuid::new_v4(),
            name: name.into(),
            budgeted_minor,
            spent_minor: 0,
            essential,
        })
    }

    pub fn add_goal(
        name: impl Into<String>,
        target_minor: i64,
        target_date: Option<NaiveDate>,
    ) -> Self {
        Self::AddGoal(SavingsGoal {
            id: Uuid::new_v4(),
            name: name.into(),
            target_minor,
            saved_minor: 0,
            target_date,
        })
    }

    pub fn add_debt(
        name: impl Into<String>,
        balance_minor: i64,
        interest_rate_bps: u32,
        minimum_payment_minor: i64,
    ) -> Self {
        Self::AddDebt(Debt {
            id: Uuid::new_v4(),
            name: name.into(),
            balance_minor,
            interest_rate_bps,
            minimum_payment_minor,
            payments: Vec::new(),
        })
    }

    pub fn hydrate(payload: SnapshotPayload) -> Self {
        Self::Hydrate(Box::new(payload))
    }

    /// Whether this action belongs to the auto-save allow-list.
    pub fn is_persistable(&self) -> bool {
        kinds::PERSISTABLE.contains(&self.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_edits_are_persistable() {
        assert!(Action::UpdateMonthlyIncome { amount_minor: 1 }.is_persistable());
        assert!(Action::add_category("Rent", 100_000, true).is_persistable());
        assert!(
            Action::ToggleEssential { id: Uuid::new_v4() }.is_persistable()
        );
        assert!(
            Action::RecordPayment {
                id: Uuid::new_v4(),
                payment: DebtPayment {
                    amount_minor: 100,
                    paid_on: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                },
            }
            .is_persistable()
        );
    }

    #[test]
    fn ui_and_lifecycle_actions_are_not_persistable() {
        assert!(!Action::SetSelectedMonth {
            month: "2025-02".to_string()
        }
        .is_persistable());
        assert!(!Action::ToggleSection {
            section: "debts".to_string()
        }
        .is_persistable());
        assert!(!Action::hydrate(SnapshotPayload::default()).is_persistable());
        assert!(!Action::Reset.is_persistable());
    }

    #[test]
    fn kinds_are_namespaced_by_slice() {
        assert_eq!(
            Action::UpdateMonthlyIncome { amount_minor: 0 }.kind(),
            "income/updateMonthlyIncome"
        );
        assert_eq!(
            Action::UpdateCategory {
                id: Uuid::new_v4(),
                changes: CategoryChanges::default()
            }
            .kind(),
            "expenses/updateCategory"
        );
    }
}
