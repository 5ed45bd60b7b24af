mod command;
mod config;
mod error;
mod gateway;
mod report;
mod session;

use chrono::Utc;
use tracing_subscriber::EnvFilter;

use crate::{error::Result, gateway::ClientGateway, report::Report, session::Session};

#[tokio::main]
async fn main() -> Result<()> {
    let (config, command) = config::load()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "budget_client={level},engine={level}",
            level = config.level
        ))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let gateway = ClientGateway::from_config(&config);
    let mut session = Session::open(gateway, &config.sync()).await;

    let plan = command.plan(&session.sync.store().state(), Utc::now().date_naive())?;
    let outcome = session.execute(plan).await;

    let report = Report {
        state: &session.sync.store().state(),
        status: &session.sync.status(),
        now: Utc::now(),
    };
    print!("{report}");

    session.shutdown().await;
    outcome
}
