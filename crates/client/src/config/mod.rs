use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use engine::SyncConfig;
use serde::Deserialize;

use crate::{command::Command, error::Result};

const DEFAULT_CONFIG_PATH: &str = "config/client.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Budget backend over HTTP.
    Http,
    /// Local JSON file.
    File,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub backend: Backend,
    pub state_path: PathBuf,
    pub debounce_ms: u64,
    pub auto_save: bool,
    pub level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let sync = SyncConfig::default();
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            backend: Backend::Http,
            state_path: PathBuf::from("config/budget_state.json"),
            debounce_ms: sync.debounce_ms,
            auto_save: sync.auto_save,
            level: "warn".to_string(),
        }
    }
}

impl AppConfig {
    pub fn sync(&self) -> SyncConfig {
        SyncConfig {
            debounce_ms: self.debounce_ms,
            auto_save: self.auto_save,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "budget_client", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:3000).
    #[arg(long)]
    base_url: Option<String>,
    /// Override the storage backend.
    #[arg(long, value_enum)]
    backend: Option<Backend>,
    /// Override the snapshot file used by the file backend.
    #[arg(long)]
    state_path: Option<PathBuf>,
    /// Override the auto-save debounce window (milliseconds).
    #[arg(long)]
    debounce_ms: Option<u64>,
    /// Override auto-save.
    #[arg(long)]
    auto_save: Option<bool>,
    #[command(subcommand)]
    command: Command,
}

pub fn load() -> Result<(AppConfig, Command)> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(
        config::Environment::with_prefix("SPARAGNE_BUDGET_CLIENT").try_parsing(true),
    );
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(backend) = args.backend {
        settings.backend = backend;
    }
    if let Some(state_path) = args.state_path {
        settings.state_path = state_path;
    }
    if let Some(debounce_ms) = args.debounce_ms {
        settings.debounce_ms = debounce_ms;
    }
    if let Some(auto_save) = args.auto_save {
        settings.auto_save = auto_save;
    }

    Ok((settings, args.command))
}
