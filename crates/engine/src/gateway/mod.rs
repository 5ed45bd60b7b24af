//! Remote persistence of budget snapshots.
//!
//! A gateway stores one complete [`BudgetSnapshot`] at a time: `save` always
//! overwrites, `load` returns whatever was saved last (or `None` on first
//! run) and `clear` removes it. Gateways do not retry.

use std::future::Future;

use api_types::budget::{BudgetSnapshot, SnapshotPayload};

use crate::error::GatewayResult;

pub use file::FileGateway;
pub use http::HttpGateway;
pub use memory::MemoryGateway;

mod file;
mod http;
mod memory;

pub trait PersistenceGateway: Send + Sync + 'static {
    /// Persist `snapshot`, returning the stored representation.
    fn save(
        &self,
        snapshot: BudgetSnapshot,
    ) -> impl Future<Output = GatewayResult<BudgetSnapshot>> + Send;

    /// Fetch the last stored snapshot, `None` when nothing was saved yet.
    fn load(&self) -> impl Future<Output = GatewayResult<Option<SnapshotPayload>>> + Send;

    fn clear(&self) -> impl Future<Output = GatewayResult<()>> + Send;
}
