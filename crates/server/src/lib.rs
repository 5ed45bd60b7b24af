use axum::{Json, http::StatusCode, response::IntoResponse};
use sea_orm::DbErr;

use api_types::error::ErrorBody;
pub use server::{ServerState, router, run_with_listener, spawn_with_listener};

mod budget;
mod server;

pub mod types {
    pub mod budget {
        pub use api_types::budget::BudgetSnapshot;
    }
}

#[derive(Debug)]
pub enum ServerError {
    Database(DbErr),
    NotFound(String),
    /// Stored data that can no longer be read back.
    Internal(String),
    Generic(String),
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            ServerError::Database(_) | ServerError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Generic(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let error = match self {
            ServerError::Database(db_err) => {
                tracing::error!("database error: {db_err}");
                "internal server error".to_string()
            }
            ServerError::Internal(err) => {
                tracing::error!("{err}");
                "internal server error".to_string()
            }
            ServerError::NotFound(err) | ServerError::Generic(err) => err,
        };

        (status, Json(ErrorBody { error })).into_response()
    }
}

impl From<DbErr> for ServerError {
    fn from(value: DbErr) -> Self {
        Self::Database(value)
    }
}
