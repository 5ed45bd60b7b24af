//! Budget synchronization core.
//!
//! A [`StoreHandle`] owns the budget slices. [`BudgetSync`] attaches the two
//! controllers to it: the auto-save worker ([`SyncController`]) and the
//! loader ([`HydrationController`]), both talking to storage through a
//! [`PersistenceGateway`].

use std::sync::Arc;

use api_types::budget::{BudgetSnapshot, SnapshotPayload};
use tokio::task::JoinHandle;

pub use error::{GatewayError, GatewayResult};
pub use gateway::{FileGateway, HttpGateway, MemoryGateway, PersistenceGateway};
pub use hydration::HydrationController;
pub use money::{MoneyCents, MoneyError};
pub use status::{SavePhase, StatusHandle, SyncStatus};
pub use store::{Action, BudgetState, Slice, StoreEvent, StoreHandle};
pub use sync::{DEFAULT_DEBOUNCE, SaveQueueEntry, SyncConfig, SyncController};

pub mod error;
pub mod gateway;
mod hydration;
mod money;
mod status;
pub mod store;
mod sync;

/// Store, gateway and both controllers wired together.
///
/// Must be created inside a tokio runtime: the auto-save worker is spawned on
/// construction and aborted when the value is dropped.
pub struct BudgetSync<G: PersistenceGateway> {
    store: StoreHandle,
    gateway: Arc<G>,
    status: StatusHandle,
    sync: SyncController<G>,
    hydration: HydrationController<G>,
    worker: JoinHandle<()>,
}

impl<G: PersistenceGateway> BudgetSync<G> {
    /// Wire the controllers without loading anything.
    pub fn new(store: StoreHandle, gateway: G, config: &SyncConfig) -> Self {
        let gateway = Arc::new(gateway);
        let status = StatusHandle::new(config.auto_save);
        let sync = SyncController::new(
            store.clone(),
            gateway.clone(),
            status.clone(),
            config.debounce(),
        );
        let hydration = HydrationController::new(store.clone(), gateway.clone(), status.clone());
        let worker = sync.spawn();

        Self {
            store,
            gateway,
            status,
            sync,
            hydration,
            worker,
        }
    }

    /// Wire the controllers and perform the initial load.
    ///
    /// A failed load is not fatal: it is reported in [`SyncStatus::load_error`]
    /// and the store keeps its defaults.
    pub async fn start(store: StoreHandle, gateway: G, config: &SyncConfig) -> Self {
        let this = Self::new(store, gateway, config);
        // Outcome is reported through the status.
        let _ = this.reload().await;
        this
    }

    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn dispatch(&self, action: Action) {
        self.store.dispatch(action);
    }

    pub fn status(&self) -> SyncStatus {
        self.status.snapshot()
    }

    pub fn pending_saves(&self) -> Vec<SaveQueueEntry> {
        self.sync.pending()
    }

    pub fn auto_save_armed(&self) -> bool {
        self.sync.is_armed()
    }

    pub fn set_auto_save(&self, enabled: bool) {
        self.sync.set_auto_save(enabled);
    }

    /// Manual save / retry.
    pub async fn save_now(&self) -> GatewayResult<BudgetSnapshot> {
        self.sync.save_now().await
    }

    /// Explicit reload, identical to the initial load.
    pub async fn reload(&self) -> GatewayResult<Option<SnapshotPayload>> {
        self.hydration.load().await
    }

    /// Delete the stored snapshot and return the store to its defaults.
    ///
    /// When the gateway fails the store is left as it is and the error is
    /// reported in [`SyncStatus::save_error`].
    pub async fn reset(&self) -> GatewayResult<()> {
        match self.gateway.clear().await {
            Ok(()) => {
                self.store.dispatch(Action::Reset);
                self.status.cleared();
                tracing::info!("budget reset");
                Ok(())
            }
            Err(err) => {
                tracing::warn!("budget reset failed: {err}");
                self.status
                    .clear_failed(err.user_message(error::CLEAR_FALLBACK_MESSAGE));
                Err(err)
            }
        }
    }

    /// Wait for the armed auto-save (if any) and every save in flight.
    pub async fn settled(&self) {
        self.sync.settled().await;
    }

    /// Let the armed auto-save and every save in flight finish, then stop the
    /// worker.
    pub async fn shutdown(self) {
        self.settled().await;
        tracing::debug!(
            pending = self.sync.pending().len(),
            "auto-save worker stopping"
        );
    }
}

impl<G: PersistenceGateway> Drop for BudgetSync<G> {
    fn drop(&mut self) {
        self.worker.abort();
    }
}
