use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use api_types::budget::{BudgetSnapshot, SnapshotPayload};
use serde_json::Value;
use tokio::fs;

use super::PersistenceGateway;
use crate::error::GatewayResult;

/// Gateway keeping the snapshot in a local JSON file.
///
/// A missing file means nothing was saved yet.
#[derive(Clone, Debug)]
pub struct FileGateway {
    path: PathBuf,
}

impl FileGateway {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistenceGateway for FileGateway {
    async fn save(&self, snapshot: BudgetSnapshot) -> GatewayResult<BudgetSnapshot> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let payload = serde_json::to_string_pretty(&snapshot)?;
        fs::write(&self.path, payload).await?;
        Ok(snapshot)
    }

    async fn load(&self) -> GatewayResult<Option<SnapshotPayload>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        if content.trim().is_empty() {
            return Ok(None);
        }
        let value: Value = serde_json::from_str(&content)?;
        Ok(SnapshotPayload::from_value(value))
    }

    async fn clear(&self) -> GatewayResult<()> {
        match fs::remove_file(&self.path).await {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}
