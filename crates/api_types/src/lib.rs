use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error {
    use super::*;

    /// Error body returned by the budget backend on non-success responses.
    ///
    /// Older backends reply with `message` instead of `error`; both are accepted.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ErrorBody {
        #[serde(alias = "message")]
        pub error: String,
    }
}

pub mod income {
    use super::*;

    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct IncomeState {
        pub monthly_income_minor: i64,
        pub sources: Vec<IncomeSource>,
    }

    /// Extra income on top of the monthly salary (side jobs, rents, ...).
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct IncomeSource {
        pub id: Uuid,
        pub name: String,
        pub amount_minor: i64,
    }

    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct IncomePatch {
        pub monthly_income_minor: Option<i64>,
        pub sources: Option<Vec<IncomeSource>>,
    }
}

pub mod expenses {
    use super::*;

    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpensesState {
        pub categories: Vec<ExpenseCategory>,
    }

    /// A budgeted spending category.
    ///
    /// `essential` separates fixed costs (rent, utilities) from flexible ones.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseCategory {
        pub id: Uuid,
        pub name: String,
        pub budgeted_minor: i64,
        pub spent_minor: i64,
        pub essential: bool,
    }

    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpensesPatch {
        pub categories: Option<Vec<ExpenseCategory>>,
    }
}

pub mod savings {
    use super::*;

    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SavingsState {
        pub goals: Vec<SavingsGoal>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SavingsGoal {
        pub id: Uuid,
        pub name: String,
        pub target_minor: i64,
        pub saved_minor: i64,
        pub target_date: Option<NaiveDate>,
    }

    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SavingsPatch {
        pub goals: Option<Vec<SavingsGoal>>,
    }
}

pub mod debts {
    use super::*;

    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DebtsState {
        pub debts: Vec<Debt>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Debt {
        pub id: Uuid,
        pub name: String,
        pub balance_minor: i64,
        /// Yearly interest rate in basis points (1250 = 12.50%).
        pub interest_rate_bps: u32,
        pub minimum_payment_minor: i64,
        #[serde(default)]
        pub payments: Vec<DebtPayment>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DebtPayment {
        pub amount_minor: i64,
        pub paid_on: NaiveDate,
    }

    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DebtsPatch {
        pub debts: Option<Vec<Debt>>,
    }
}

pub mod ui {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UiState {
        /// Month shown by the dashboard, formatted as `YYYY-MM`.
        pub selected_month: String,
        pub expanded_sections: Vec<String>,
    }

    impl Default for UiState {
        fn default() -> Self {
            Self {
                selected_month: Utc::now().format("%Y-%m").to_string(),
                expanded_sections: Vec::new(),
            }
        }
    }

    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UiPatch {
        pub selected_month: Option<String>,
        pub expanded_sections: Option<Vec<String>>,
    }
}

pub mod budget {
    use serde::{Deserializer, de::DeserializeOwned};
    use serde_json::Value;

    use super::*;
    use crate::{
        debts::{DebtsPatch, DebtsState},
        expenses::{ExpensesPatch, ExpensesState},
        income::{IncomePatch, IncomeState},
        savings::{SavingsPatch, SavingsState},
        ui::{UiPatch, UiState},
    };

    /// The unit of persistence: every slice plus the persisted part of the UI.
    ///
    /// A snapshot is always complete. It is what clients `POST /budget` and
    /// what the backend stores.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetSnapshot {
        pub income: IncomeState,
        pub expenses: ExpensesState,
        pub savings: SavingsState,
        pub debts: DebtsState,
        pub ui: UiState,
        /// RFC3339 timestamp set by the client when the snapshot is built.
        pub last_updated: DateTime<Utc>,
    }

    /// A previously persisted snapshot, as read back from storage.
    ///
    /// Every slice is optional. A slice that is missing, is not a JSON object
    /// or does not match its patch shape is dropped (`None`) instead of
    /// rejecting the whole payload, so one corrupted slice never prevents the
    /// others from hydrating.
    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SnapshotPayload {
        #[serde(default, deserialize_with = "lenient_slice", skip_serializing_if = "Option::is_none")]
        pub income: Option<IncomePatch>,
        #[serde(default, deserialize_with = "lenient_slice", skip_serializing_if = "Option::is_none")]
        pub expenses: Option<ExpensesPatch>,
        #[serde(default, deserialize_with = "lenient_slice", skip_serializing_if = "Option::is_none")]
        pub savings: Option<SavingsPatch>,
        #[serde(default, deserialize_with = "lenient_slice", skip_serializing_if = "Option::is_none")]
        pub debts: Option<DebtsPatch>,
        #[serde(default, deserialize_with = "lenient_slice", skip_serializing_if = "Option::is_none")]
        pub ui: Option<UiPatch>,
        #[serde(default, deserialize_with = "lenient_timestamp", skip_serializing_if = "Option::is_none")]
        pub last_updated: Option<DateTime<Utc>>,
    }

    impl From<BudgetSnapshot> for SnapshotPayload {
        fn from(snapshot: BudgetSnapshot) -> Self {
            Self {
                income: Some(IncomePatch {
                    monthly_income_minor: Some(snapshot.income.monthly_income_minor),
                    sources: Some(snapshot.income.sources),
                }),
                expenses: Some(ExpensesPatch {
                    categories: Some(snapshot.expenses.categories),
                }),
                savings: Some(SavingsPatch {
                    goals: Some(snapshot.savings.goals),
                }),
                debts: Some(DebtsPatch {
                    debts: Some(snapshot.debts.debts),
                }),
                ui: Some(UiPatch {
                    selected_month: Some(snapshot.ui.selected_month),
                    expanded_sections: Some(snapshot.ui.expanded_sections),
                }),
                last_updated: Some(snapshot.last_updated),
            }
        }
    }

    impl SnapshotPayload {
        /// Parse a stored payload. `null` means nothing has been saved yet.
        pub fn from_value(value: Value) -> Option<Self> {
            if !value.is_object() {
                return None;
            }
            serde_json::from_value(value).ok()
        }
    }

    fn lenient_slice<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Value::deserialize(deserializer)?;
        if !value.is_object() {
            return Ok(None);
        }
        match serde_json::from_value(value) {
            Ok(patch) => Ok(Some(patch)),
            Err(err) => {
                tracing::warn!("ignoring malformed slice in stored budget: {err}");
                Ok(None)
            }
        }
    }

    fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(value
            .as_str()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|ts| ts.with_timezone(&Utc)))
    }

}
