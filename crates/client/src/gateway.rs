use api_types::budget::{BudgetSnapshot, SnapshotPayload};
use engine::{FileGateway, GatewayResult, HttpGateway, PersistenceGateway};

use crate::config::{AppConfig, Backend};

/// Gateway selected at start-up from the configuration.
#[derive(Debug)]
pub enum ClientGateway {
    Http(HttpGateway),
    File(FileGateway),
}

impl ClientGateway {
    pub fn from_config(config: &AppConfig) -> Self {
        match config.backend {
            Backend::Http => Self::Http(HttpGateway::new(config.base_url.clone())),
            Backend::File => Self::File(FileGateway::new(config.state_path.clone())),
        }
    }
}

impl PersistenceGateway for ClientGateway {
    async fn save(&self, snapshot: BudgetSnapshot) -> GatewayResult<BudgetSnapshot> {
        match self {
            Self::Http(gateway) => gateway.save(snapshot).await,
            Self::File(gateway) => gateway.save(snapshot).await,
        }
    }

    async fn load(&self) -> GatewayResult<Option<SnapshotPayload>> {
        match self {
            Self::Http(gateway) => gateway.load().await,
            Self::File(gateway) => gateway.load().await,
        }
    }

    async fn clear(&self) -> GatewayResult<()> {
        match self {
            Self::Http(gateway) => gateway.clear().await,
            Self::File(gateway) => gateway.clear().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_selects_gateway() {
        let mut config = AppConfig::default();
        assert!(matches!(
            ClientGateway::from_config(&config),
            ClientGateway::Http(_)
        ));

        config.backend = Backend::File;
        let ClientGateway::File(gateway) = ClientGateway::from_config(&config) else {
            panic!("expected file gateway");
        };
        assert_eq!(gateway.path(), config.state_path.as_path());
    }
}
