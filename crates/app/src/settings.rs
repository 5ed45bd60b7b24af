//! Backend settings.
//!
//! Read from `config/budget.toml` (optional) and overridden by
//! `SPARAGNE_BUDGET_*` environment variables, nested keys separated by `__`
//! (e.g. `SPARAGNE_BUDGET_SERVER__PORT=8080`).

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const CONFIG_PATH: &str = "config/budget";
const ENV_PREFIX: &str = "SPARAGNE_BUDGET";

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: String,
    pub port: u16,
    pub database: Database,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 3000,
            database: Database::Sqlite("budget.db".to_string()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub server: Server,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_sources(CONFIG_PATH, ENV_PREFIX)
    }

    fn from_sources(path: &str, env_prefix: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(env_prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_file_or_env() {
        let settings = Settings::from_sources("config/does_not_exist", "SPARAGNE_BUDGET_TEST_NONE")
            .unwrap();

        assert_eq!(settings.app.level, "info");
        assert_eq!(settings.server.bind, "127.0.0.1");
        assert_eq!(settings.server.port, 3000);
        assert_eq!(
            settings.server.database,
            Database::Sqlite("budget.db".to_string())
        );
    }

    #[test]
    fn database_variants_deserialize_from_toml() {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(
                "[server]\nport = 8080\ndatabase = \"memory\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.database, Database::Memory);

        let settings: Settings = Config::builder()
            .add_source(File::from_str(
                "[server.database]\nsqlite = \"data/budget.db\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(
            settings.server.database,
            Database::Sqlite("data/budget.db".to_string())
        );
    }
}
