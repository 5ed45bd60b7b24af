use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("{0}")]
    Gateway(#[from] engine::GatewayError),
    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },
    #[error("invalid month {0}, expected YYYY-MM")]
    InvalidMonth(String),
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}
