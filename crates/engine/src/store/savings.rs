use api_types::savings::{SavingsGoal, SavingsPatch, SavingsState};
use uuid::Uuid;

use super::{Action, Slice};
use crate::MoneyCents;

impl Slice for SavingsState {
    fn reduce(mut self, action: &Action) -> Self {
        match action {
            Action::AddGoal(goal) => self.goals.push(goal.clone()),
            Action::UpdateGoal { id, changes } => {
                if let Some(goal) = goal_mut(&mut self.goals, *id) {
                    if let Some(name) = &changes.name {
                        goal.name = name.clone();
                    }
                    if let Some(target) = changes.target_minor {
                        goal.target_minor = target;
                    }
                    if let Some(saved) = changes.saved_minor {
                        goal.saved_minor = saved;
                    }
                    if changes.target_date.is_some() {
                        goal.target_date = changes.target_date;
                    }
                }
            }
            Action::DeleteGoal { id } => self.goals.retain(|g| g.id != *id),
            Action::Contribute { id, amount_minor } => {
                if let Some(goal) = goal_mut(&mut self.goals, *id) {
                    goal.saved_minor = goal.saved_minor.saturating_add(*amount_minor);
                }
            }
            Action::Hydrate(payload) => {
                if let Some(SavingsPatch { goals: Some(goals) }) = &payload.savings {
                    self.goals = goals.clone();
                }
            }
            Action::Reset => return Self::default(),
            _ => {}
        }
        self
    }
}

fn goal_mut(goals: &mut [SavingsGoal], id: Uuid) -> Option<&mut SavingsGoal> {
    goals.iter_mut().find(|g| g.id == id)
}

/// Completion of a goal in percent, as drawn by the progress rings.
pub fn progress(goal: &SavingsGoal) -> u8 {
    MoneyCents::new(goal.saved_minor).percent_of(MoneyCents::new(goal.target_minor))
}

pub fn total_saved(state: &SavingsState) -> MoneyCents {
    state.goals.iter().map(|g| MoneyCents::new(g.saved_minor)).sum()
}

#[cfg(test)]
mod tests {
    use api_types::budget::SnapshotPayload;
    use chrono::NaiveDate;

    use super::*;
    use crate::store::GoalChanges;

    #[test]
    fn contributions_drive_progress() {
        let state = SavingsState::default().reduce(&Action::add_goal("Emergency fund", 600_000, None));
        let id = state.goals[0].id;

        let state = state
            .reduce(&Action::Contribute {
                id,
                amount_minor: 150_000,
            })
            .reduce(&Action::Contribute {
                id,
                amount_minor: 150_000,
            });
        assert_eq!(progress(&state.goals[0]), 50);
        assert_eq!(total_saved(&state), MoneyCents::new(300_000));
    }

    #[test]
    fn update_keeps_unset_fields() {
        let date = NaiveDate::from_ymd_opt(2026, 6, 30).unwrap();
        let state = SavingsState::default().reduce(&Action::add_goal("Trip", 200_000, Some(date)));
        let id = state.goals[0].id;

        let state = state.reduce(&Action::UpdateGoal {
            id,
            changes: GoalChanges {
                target_minor: Some(250_000),
                ..GoalChanges::default()
            },
        });
        assert_eq!(state.goals[0].target_minor, 250_000);
        assert_eq!(state.goals[0].target_date, Some(date));
        assert_eq!(state.goals[0].name, "Trip");

        let state = state.reduce(&Action::DeleteGoal { id });
        assert!(state.goals.is_empty());
    }

    #[test]
    fn hydrate_with_empty_patch_keeps_goals() {
        let state = SavingsState::default().reduce(&Action::add_goal("Car", 1, None));
        let payload = SnapshotPayload {
            savings: Some(SavingsPatch { goals: None }),
            ..SnapshotPayload::default()
        };
        assert_eq!(state.clone().reduce(&Action::hydrate(payload)), state);
    }
}
