//! One client invocation: the initial load, then the planned command.

use engine::{BudgetSync, GatewayError, PersistenceGateway, StoreHandle, SyncConfig};

use crate::{
    command::Plan,
    error::{AppError, Result},
};

/// A [`BudgetSync`] that remembers whether the stored budget was loaded.
///
/// While the last load failed the store only holds defaults, so commands that
/// would write it back are refused instead of replacing the stored budget.
pub struct Session<G: PersistenceGateway> {
    pub sync: BudgetSync<G>,
    load_error: Option<GatewayError>,
}

impl<G: PersistenceGateway> Session<G> {
    pub async fn open(gateway: G, config: &SyncConfig) -> Self {
        let sync = BudgetSync::new(StoreHandle::default(), gateway, config);
        let load_error = sync.reload().await.err();
        Self { sync, load_error }
    }

    pub async fn execute(&mut self, plan: Plan) -> Result<()> {
        if let (Plan::Dispatch(_) | Plan::Save, Some(err)) = (&plan, &self.load_error) {
            tracing::warn!("stored budget was not loaded, refusing to overwrite it");
            return Err(AppError::Gateway(err.clone()));
        }

        match plan {
            Plan::Dispatch(action) => {
                self.sync.dispatch(action);
                self.sync.settled().await;
                Ok(())
            }
            Plan::Save => self.sync.save_now().await.map(|_| ()).map_err(Into::into),
            Plan::Reset => self.sync.reset().await.map_err(Into::into),
            Plan::Reload => match self.sync.reload().await {
                Ok(_) => {
                    self.load_error = None;
                    Ok(())
                }
                Err(err) => {
                    self.load_error = Some(err.clone());
                    Err(err.into())
                }
            },
            Plan::Show => Ok(()),
        }
    }

    pub async fn shutdown(self) {
        self.sync.shutdown().await;
    }
}
