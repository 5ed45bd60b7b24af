use std::{
    sync::{Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use api_types::budget::{BudgetSnapshot, SnapshotPayload};

use super::PersistenceGateway;
use crate::error::{GatewayError, GatewayResult};

/// In-process gateway.
///
/// Keeps the stored snapshot in memory and records every call, which makes
/// it the gateway of choice for embedding the core without a backend and for
/// exercising the controllers. Failures and latency can be injected.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    inner: Mutex<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    stored: Option<BudgetSnapshot>,
    saves: Vec<BudgetSnapshot>,
    loads: usize,
    clears: usize,
    fail_save: Option<GatewayError>,
    fail_load: Option<GatewayError>,
    latency: Duration,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: BudgetSnapshot) -> Self {
        let gateway = Self::default();
        gateway.lock().stored = Some(snapshot);
        gateway
    }

    fn lock(&self) -> MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make the next `save` call fail with `err`.
    pub fn fail_next_save(&self, err: GatewayError) {
        self.lock().fail_save = Some(err);
    }

    /// Make the next `load` call fail with `err`.
    pub fn fail_next_load(&self, err: GatewayError) {
        self.lock().fail_load = Some(err);
    }

    /// Delay every call by `latency` (tokio time, so paused clocks apply).
    pub fn set_latency(&self, latency: Duration) {
        self.lock().latency = latency;
    }

    /// Every snapshot passed to `save`, failed attempts included.
    pub fn saves(&self) -> Vec<BudgetSnapshot> {
        self.lock().saves.clone()
    }

    pub fn save_count(&self) -> usize {
        self.lock().saves.len()
    }

    pub fn load_count(&self) -> usize {
        self.lock().loads
    }

    pub fn clear_count(&self) -> usize {
        self.lock().clears
    }

    pub fn stored(&self) -> Option<BudgetSnapshot> {
        self.lock().stored.clone()
    }

    async fn delay(&self) {
        let latency = self.lock().latency;
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }
}

impl PersistenceGateway for MemoryGateway {
    async fn save(&self, snapshot: BudgetSnapshot) -> GatewayResult<BudgetSnapshot> {
        self.lock().saves.push(snapshot.clone());
        self.delay().await;

        let mut inner = self.lock();
        if let Some(err) = inner.fail_save.take() {
            return Err(err);
        }
        inner.stored = Some(snapshot.clone());
        Ok(snapshot)
    }

    async fn load(&self) -> GatewayResult<Option<SnapshotPayload>> {
        self.lock().loads += 1;
        self.delay().await;

        let mut inner = self.lock();
        if let Some(err) = inner.fail_load.take() {
            return Err(err);
        }
        Ok(inner.stored.clone().map(SnapshotPayload::from))
    }

    async fn clear(&self) -> GatewayResult<()> {
        self.delay().await;
        let mut inner = self.lock();
        inner.clears += 1;
        inner.stored = None;
        Ok(())
    }
}
