use sea_orm::Database;
use sea_orm_migration::prelude::*;

const DEFAULT_DATABASE_URL: &str = "sqlite:./budget.db?mode=rwc";
const USAGE: &str = "Usage: migration [up|down|fresh|refresh|status]";

/// `SPARAGNE_BUDGET_DATABASE_URL` wins over the conventional `DATABASE_URL`.
fn database_url() -> String {
    ["SPARAGNE_BUDGET_DATABASE_URL", "DATABASE_URL"]
        .into_iter()
        .find_map(|key| std::env::var(key).ok())
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cmd = std::env::args().nth(1).unwrap_or_else(|| "up".to_string());
    if !matches!(cmd.as_str(), "up" | "down" | "fresh" | "refresh" | "status") {
        eprintln!("{USAGE}");
        std::process::exit(2);
    }

    let db = Database::connect(database_url()).await?;

    match cmd.as_str() {
        "down" => migration::Migrator::down(&db, None).await?,
        "fresh" => migration::Migrator::fresh(&db).await?,
        "refresh" => migration::Migrator::refresh(&db).await?,
        "status" => migration::Migrator::status(&db).await?,
        _ => migration::Migrator::up(&db, None).await?,
    }

    Ok(())
}
