use api_types::{
    budget::{BudgetSnapshot, SnapshotPayload},
    error::ErrorBody,
};
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;

use super::PersistenceGateway;
use crate::error::{GatewayError, GatewayResult};

const BUDGET_PATH: &str = "/budget";

/// Gateway talking to the budget backend over HTTP/JSON.
#[derive(Clone, Debug)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

async fn server_error(resp: Response) -> GatewayError {
    let status = resp.status().as_u16();
    let message = resp.json::<ErrorBody>().await.ok().map(|body| body.error);
    GatewayError::Server { status, message }
}

impl PersistenceGateway for HttpGateway {
    async fn save(&self, snapshot: BudgetSnapshot) -> GatewayResult<BudgetSnapshot> {
        let resp = self
            .client
            .post(self.url(BUDGET_PATH))
            .json(&snapshot)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(server_error(resp).await);
        }

        // The backend echoes what it stored; a success without a usable echo
        // still means the snapshot we sent is the stored one.
        let body = resp.bytes().await?;
        match serde_json::from_slice::<BudgetSnapshot>(&body) {
            Ok(stored) => Ok(stored),
            Err(err) => {
                tracing::debug!("save response is not a snapshot ({err}), keeping the sent one");
                Ok(snapshot)
            }
        }
    }

    async fn load(&self) -> GatewayResult<Option<SnapshotPayload>> {
        let resp = self.client.get(self.url(BUDGET_PATH)).send().await?;
        match resp.status() {
            StatusCode::NOT_FOUND | StatusCode::NO_CONTENT => return Ok(None),
            status if !status.is_success() => return Err(server_error(resp).await),
            _ => {}
        }

        let body = resp.bytes().await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        let value: Value = serde_json::from_slice(&body)?;
        Ok(SnapshotPayload::from_value(value))
    }

    async fn clear(&self) -> GatewayResult<()> {
        let resp = self.client.delete(self.url(BUDGET_PATH)).send().await?;
        let status = resp.status();
        if status.is_success() || status == StatusCode::NOT_FOUND {
            return Ok(());
        }
        Err(server_error(resp).await)
    }
}
