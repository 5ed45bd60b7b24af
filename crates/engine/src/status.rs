//! Save/load status shared by the synchronization and hydration controllers.
//!
//! [`SyncStatus`] is the read-only view handed to presentation code;
//! [`StatusHandle`] is the shared cell both controllers update.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncStatus {
    pub is_saving: bool,
    pub is_loading: bool,
    pub last_saved: Option<DateTime<Utc>>,
    pub save_error: Option<String>,
    pub load_error: Option<String>,
    pub auto_save_enabled: bool,
    pub data_loaded: bool,
}

impl Default for SyncStatus {
    fn default() -> Self {
        Self {
            is_saving: false,
            is_loading: false,
            last_saved: None,
            save_error: None,
            load_error: None,
            auto_save_enabled: true,
            data_loaded: false,
        }
    }
}

/// What the save indicator should show.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SavePhase {
    Loading,
    Saving,
    Error,
    Saved,
    Idle,
}

impl SavePhase {
    pub fn label(self) -> &'static str {
        match self {
            Self::Loading => "Loading",
            Self::Saving => "Saving",
            Self::Error => "Save failed",
            Self::Saved => "Saved",
            Self::Idle => "Not saved yet",
        }
    }
}

impl SyncStatus {
    pub fn phase(&self) -> SavePhase {
        if self.is_loading {
            SavePhase::Loading
        } else if self.is_saving {
            SavePhase::Saving
        } else if self.save_error.is_some() {
            SavePhase::Error
        } else if self.last_saved.is_some() {
            SavePhase::Saved
        } else {
            SavePhase::Idle
        }
    }

    /// Whether the last settled save (or load) left the remote copy in sync.
    pub fn is_in_sync(&self) -> bool {
        self.phase() == SavePhase::Saved
    }

    /// Human readable age of the last save relative to `now`.
    pub fn last_saved_label(&self, now: DateTime<Utc>) -> String {
        let Some(saved) = self.last_saved else {
            return "never".to_string();
        };
        let age = now.signed_duration_since(saved);
        if age < Duration::minutes(1) {
            "just now".to_string()
        } else if age < Duration::hours(1) {
            match age.num_minutes() {
                1 => "1 minute ago".to_string(),
                minutes => format!("{minutes} minutes ago"),
            }
        } else {
            saved.format("%H:%M UTC").to_string()
        }
    }
}

#[derive(Debug, Default)]
struct StatusCell {
    status: SyncStatus,
    saves_in_flight: usize,
}

#[derive(Clone, Debug, Default)]
pub struct StatusHandle {
    inner: Arc<Mutex<StatusCell>>,
}

impl StatusHandle {
    pub fn new(auto_save_enabled: bool) -> Self {
        let handle = Self::default();
        handle.lock().status.auto_save_enabled = auto_save_enabled;
        handle
    }

    fn lock(&self) -> MutexGuard<'_, StatusCell> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> SyncStatus {
        self.lock().status.clone()
    }

    pub fn auto_save_enabled(&self) -> bool {
        self.lock().status.auto_save_enabled
    }

    pub fn set_auto_save(&self, enabled: bool) {
        self.lock().status.auto_save_enabled = enabled;
    }

    pub(crate) fn begin_save(&self) {
        let mut cell = self.lock();
        cell.saves_in_flight += 1;
        cell.status.is_saving = true;
    }

    pub(crate) fn save_succeeded(&self, at: DateTime<Utc>) {
        let mut cell = self.lock();
        cell.settle_save();
        cell.status.last_saved = Some(at);
        cell.status.save_error = None;
    }

    pub(crate) fn save_failed(&self, message: String) {
        let mut cell = self.lock();
        cell.settle_save();
        cell.status.save_error = Some(message);
    }

    /// Remote copy deleted: nothing is saved anymore.
    pub(crate) fn cleared(&self) {
        let mut cell = self.lock();
        cell.status.last_saved = None;
        cell.status.save_error = None;
    }

    pub(crate) fn clear_failed(&self, message: String) {
        self.lock().status.save_error = Some(message);
    }

    pub(crate) fn begin_load(&self) {
        let mut cell = self.lock();
        cell.status.is_loading = true;
        cell.status.load_error = None;
    }

    pub(crate) fn load_succeeded(&self, last_saved: DateTime<Utc>) {
        let mut cell = self.lock();
        cell.status.is_loading = false;
        cell.status.data_loaded = true;
        cell.status.load_error = None;
        cell.status.last_saved = Some(last_saved);
    }

    pub(crate) fn load_failed(&self, message: String) {
        let mut cell = self.lock();
        cell.status.is_loading = false;
        cell.status.load_error = Some(message);
    }
}

impl StatusCell {
    fn settle_save(&mut self) {
        self.saves_in_flight = self.saves_in_flight.saturating_sub(1);
        self.status.is_saving = self.saves_in_flight > 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn save_transitions() {
        let status = StatusHandle::new(true);
        assert_eq!(status.snapshot().phase(), SavePhase::Idle);

        status.begin_save();
        assert_eq!(status.snapshot().phase(), SavePhase::Saving);

        status.save_failed("Quota exceeded".to_string());
        let snapshot = status.snapshot();
        assert!(!snapshot.is_saving);
        assert_eq!(snapshot.phase(), SavePhase::Error);
        assert_eq!(snapshot.last_saved, None);

        status.begin_save();
        status.save_succeeded(at("2025-01-01T10:00:00Z"));
        let snapshot = status.snapshot();
        assert_eq!(snapshot.phase(), SavePhase::Saved);
        assert_eq!(snapshot.save_error, None);
        assert!(snapshot.is_in_sync());
    }

    #[test]
    fn overlapping_saves_keep_saving_flag() {
        let status = StatusHandle::new(true);
        status.begin_save();
        status.begin_save();
        status.save_succeeded(Utc::now());
        assert!(status.snapshot().is_saving);
        status.save_failed("boom".to_string());
        assert!(!status.snapshot().is_saving);
    }

    #[test]
    fn load_failure_keeps_data_unloaded() {
        let status = StatusHandle::new(true);
        status.begin_load();
        assert_eq!(status.snapshot().phase(), SavePhase::Loading);
        status.load_failed("Network unreachable".to_string());
        let snapshot = status.snapshot();
        assert!(!snapshot.data_loaded);
        assert!(!snapshot.is_loading);
        assert_eq!(snapshot.load_error.as_deref(), Some("Network unreachable"));
    }

    #[test]
    fn last_saved_labels() {
        let now = at("2025-01-01T12:00:00Z");
        let mut status = SyncStatus::default();
        assert_eq!(status.last_saved_label(now), "never");

        status.last_saved = Some(at("2025-01-01T11:59:30Z"));
        assert_eq!(status.last_saved_label(now), "just now");

        status.last_saved = Some(at("2025-01-01T11:59:00Z"));
        assert_eq!(status.last_saved_label(now), "1 minute ago");

        status.last_saved = Some(at("2025-01-01T11:35:00Z"));
        assert_eq!(status.last_saved_label(now), "25 minutes ago");

        status.last_saved = Some(at("2025-01-01T08:15:00Z"));
        assert_eq!(status.last_saved_label(now), "08:15 UTC");
    }
}
