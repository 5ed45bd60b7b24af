//! Initial load and explicit reloads.

use std::sync::Arc;

use api_types::budget::SnapshotPayload;
use chrono::Utc;

use crate::{
    error::{GatewayResult, LOAD_FALLBACK_MESSAGE},
    gateway::PersistenceGateway,
    status::StatusHandle,
    store::{Action, StoreHandle},
};

pub struct HydrationController<G> {
    store: StoreHandle,
    gateway: Arc<G>,
    status: StatusHandle,
}

impl<G: PersistenceGateway> HydrationController<G> {
    pub fn new(store: StoreHandle, gateway: Arc<G>, status: StatusHandle) -> Self {
        Self {
            store,
            gateway,
            status,
        }
    }

    /// Load the stored snapshot and hydrate the store with it.
    ///
    /// Every call behaves the same, the first one at start-up included:
    /// - stored data: one `budget/hydrate` is dispatched and `last_saved` is
    ///   taken from the payload's `lastUpdated` (now when missing);
    /// - nothing stored: the store keeps its defaults, `last_saved` is now;
    /// - failure: `load_error` is set and the store is left untouched.
    pub async fn load(&self) -> GatewayResult<Option<SnapshotPayload>> {
        self.status.begin_load();
        match self.gateway.load().await {
            Ok(Some(payload)) => {
                let last_saved = payload.last_updated.unwrap_or_else(Utc::now);
                self.store.dispatch(Action::hydrate(payload.clone()));
                self.status.load_succeeded(last_saved);
                tracing::info!(%last_saved, "budget hydrated from storage");
                Ok(Some(payload))
            }
            Ok(None) => {
                self.status.load_succeeded(Utc::now());
                tracing::info!("no stored budget, keeping defaults");
                Ok(None)
            }
            Err(err) => {
                let message = err.user_message(LOAD_FALLBACK_MESSAGE);
                tracing::warn!("budget load failed: {err}");
                self.status.load_failed(message);
                Err(err)
            }
        }
    }
}
