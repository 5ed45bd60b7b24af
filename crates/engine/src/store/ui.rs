use api_types::ui::UiState;

use super::{Action, Slice};

impl Slice for UiState {
    fn reduce(mut self, action: &Action) -> Self {
        match action {
            Action::SetSelectedMonth { month } => {
                self.selected_month = month.clone();
            }
            Action::ToggleSection { section } => {
                if let Some(index) = self.expanded_sections.iter().position(|s| s == section) {
                    self.expanded_sections.remove(index);
                } else {
                    self.expanded_sections.push(section.clone());
                }
            }
            // UI only merges the two persisted fields; anything else in the
            // patch is ignored.
            Action::Hydrate(payload) => {
                if let Some(patch) = &payload.ui {
                    if let Some(month) = &patch.selected_month {
                        self.selected_month = month.clone();
                    }
                    if let Some(sections) = &patch.expanded_sections {
                        self.expanded_sections = sections.clone();
                    }
                }
            }
            Action::Reset => return Self::default(),
            _ => {}
        }
        self
    }
}

pub fn is_expanded(state: &UiState, section: &str) -> bool {
    state.expanded_sections.iter().any(|s| s == section)
}

#[cfg(test)]
mod tests {
    use api_types::{budget::SnapshotPayload, ui::UiPatch};

    use super::*;

    fn ui() -> UiState {
        UiState {
            selected_month: "2025-01".to_string(),
            expanded_sections: Vec::new(),
        }
    }

    #[test]
    fn toggle_section_twice_collapses() {
        let section = Action::ToggleSection {
            section: "debts".to_string(),
        };
        let state = ui().reduce(&section);
        assert!(is_expanded(&state, "debts"));
        let state = state.reduce(&section);
        assert!(!is_expanded(&state, "debts"));
    }

    #[test]
    fn hydrate_merges_selected_month_only_when_present() {
        let state = ui().reduce(&Action::ToggleSection {
            section: "savings".to_string(),
        });
        let payload = SnapshotPayload {
            ui: Some(UiPatch {
                selected_month: Some("2024-12".to_string()),
                expanded_sections: None,
            }),
            ..SnapshotPayload::default()
        };
        let state = state.reduce(&Action::hydrate(payload));
        assert_eq!(state.selected_month, "2024-12");
        assert!(is_expanded(&state, "savings"));
    }
}
