//! Auto-save.
//!
//! The [`SyncController`] observes the store. Whether an action is queued is
//! decided while it is dispatched, against the allow-list and the auto-save
//! flag as they are at that moment. The first persistable action of a burst
//! arms a single debounce deadline; actions arriving while it is armed are
//! only queued. When the deadline passes the worker captures a snapshot of
//! the store *at that instant*, clears the queue and saves the snapshot in
//! its own task, so actions applied while that save is in flight arm the
//! next cycle.

use std::{
    collections::HashSet,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use api_types::budget::BudgetSnapshot;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, Instant},
};

use crate::{
    error::{GatewayResult, SAVE_FALLBACK_MESSAGE},
    gateway::PersistenceGateway,
    status::StatusHandle,
    store::{StoreEvent, StoreHandle, kinds},
};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(2000);

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Debounce window in milliseconds.
    pub debounce_ms: u64,
    pub auto_save: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce_ms: millis(DEFAULT_DEBOUNCE),
            auto_save: true,
        }
    }
}

impl SyncConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Audit record of an action waiting to be saved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaveQueueEntry {
    pub timestamp: DateTime<Utc>,
    pub action_kind: &'static str,
}

#[derive(Debug, Default)]
struct SaveQueue {
    entries: Vec<SaveQueueEntry>,
    armed: bool,
}

/// State shared by the store observer, the worker and the save tasks.
///
/// Holds no [`StoreHandle`]: the store owns the observer, which owns this.
#[derive(Debug)]
struct Intake {
    queue: Mutex<SaveQueue>,
    allow_list: HashSet<&'static str>,
    debounce: Duration,
    status: StatusHandle,
    /// Deadline of the armed burst, read by the worker.
    deadline: watch::Sender<Option<Instant>>,
    /// `true` when nothing is armed and no save is in flight.
    idle: watch::Sender<bool>,
}

impl Intake {
    fn queue(&self) -> MutexGuard<'_, SaveQueue> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record `kind` if it should be saved, arming the deadline for the
    /// first action of a burst. Runs inside the dispatch of that action.
    fn enqueue(&self, kind: &'static str) {
        if !self.allow_list.contains(kind) {
            return;
        }
        if !self.status.auto_save_enabled() {
            tracing::debug!(kind, "auto-save disabled, not queueing");
            return;
        }

        {
            let mut queue = self.queue();
            queue.entries.push(SaveQueueEntry {
                timestamp: Utc::now(),
                action_kind: kind,
            });
            if queue.armed {
                return;
            }
            queue.armed = true;
        }
        self.deadline.send_replace(Some(Instant::now() + self.debounce));
        self.refresh_idle();
        tracing::debug!(kind, debounce_ms = millis(self.debounce), "auto-save armed");
    }

    /// Recompute the idle flag. Done under the watch lock so concurrent
    /// refreshes cannot publish out of order.
    fn refresh_idle(&self) {
        self.idle.send_if_modified(|idle| {
            let now = !self.queue().armed && !self.status.snapshot().is_saving;
            std::mem::replace(idle, now) != now
        });
    }
}

pub struct SyncController<G> {
    store: StoreHandle,
    gateway: Arc<G>,
    intake: Arc<Intake>,
}

impl<G> Clone for SyncController<G> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            gateway: self.gateway.clone(),
            intake: self.intake.clone(),
        }
    }
}

impl<G: PersistenceGateway> SyncController<G> {
    pub fn new(
        store: StoreHandle,
        gateway: Arc<G>,
        status: StatusHandle,
        debounce: Duration,
    ) -> Self {
        let intake = Arc::new(Intake {
            queue: Mutex::default(),
            allow_list: kinds::PERSISTABLE.iter().copied().collect(),
            debounce,
            status,
            deadline: watch::Sender::new(None),
            idle: watch::Sender::new(true),
        });
        Self {
            store,
            gateway,
            intake,
        }
    }

    fn queue(&self) -> MutexGuard<'_, SaveQueue> {
        self.intake.queue()
    }

    /// Observe the store and start the auto-save worker.
    ///
    /// The observer is registered before this returns, so every action
    /// dispatched afterwards is considered.
    pub fn spawn(&self) -> JoinHandle<()> {
        let intake = self.intake.clone();
        let deadlines = intake.deadline.subscribe();
        self.store
            .observe(move |StoreEvent::Applied { kind }| intake.enqueue(*kind));
        tokio::spawn(self.clone().run(deadlines))
    }

    async fn run(self, mut deadlines: watch::Receiver<Option<Instant>>) {
        let mut deadline: Option<Instant> = None;
        loop {
            tokio::select! {
                changed = deadlines.changed() => {
                    if changed.is_err() {
                        tracing::debug!("deadline channel closed, auto-save worker stopping");
                        break;
                    }
                    if let Some(at) = *deadlines.borrow_and_update() {
                        deadline = Some(at);
                    }
                }
                () = time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    deadline = None;
                    self.flush();
                }
            }
        }
    }

    fn flush(&self) {
        let entries = {
            let mut queue = self.queue();
            if !queue.armed {
                return;
            }
            queue.armed = false;
            // Counted as in flight before the queue reads as disarmed.
            self.intake.status.begin_save();
            std::mem::take(&mut queue.entries)
        };
        let snapshot = self.store.snapshot(Utc::now());
        tracing::info!(actions = entries.len(), "auto-saving budget");
        self.intake.refresh_idle();
        let this = self.clone();
        tokio::spawn(async move {
            // Outcome is reported through the status.
            let _ = this.complete_save(snapshot).await;
        });
    }

    /// Hand `snapshot` to the gateway and settle the save status. The caller
    /// has already marked the save as started.
    async fn complete_save(&self, snapshot: BudgetSnapshot) -> GatewayResult<BudgetSnapshot> {
        let status = &self.intake.status;
        let result = match self.gateway.save(snapshot).await {
            Ok(stored) => {
                status.save_succeeded(Utc::now());
                tracing::info!("budget saved");
                Ok(stored)
            }
            Err(err) => {
                let message = err.user_message(SAVE_FALLBACK_MESSAGE);
                tracing::warn!("budget save failed: {err}");
                status.save_failed(message);
                Err(err)
            }
        };
        self.intake.refresh_idle();
        result
    }

    /// Save the current state right away, skipping allow-list and debounce.
    ///
    /// Used for "save now" and "retry". Not serialized with auto-saves.
    pub async fn save_now(&self) -> GatewayResult<BudgetSnapshot> {
        let snapshot = self.store.snapshot(Utc::now());
        self.intake.status.begin_save();
        self.intake.refresh_idle();
        self.complete_save(snapshot).await
    }

    /// Enable or disable queueing for actions dispatched from now on. An
    /// armed deadline or a save in flight is not affected.
    pub fn set_auto_save(&self, enabled: bool) {
        tracing::info!(enabled, "auto-save toggled");
        self.intake.status.set_auto_save(enabled);
    }

    pub fn pending(&self) -> Vec<SaveQueueEntry> {
        self.queue().entries.clone()
    }

    pub fn is_armed(&self) -> bool {
        self.queue().armed
    }

    /// Wait until no deadline is armed and no save is in flight.
    pub async fn settled(&self) {
        let mut idle = self.intake.idle.subscribe();
        // The sender lives in `self.intake`, so this cannot fail.
        let _ = idle.wait_for(|idle| *idle).await;
    }
}
