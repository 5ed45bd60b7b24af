//! The single stored budget snapshot.
//!
//! The backend keeps exactly one row: every `POST /budget` overwrites it.

use api_types::budget::BudgetSnapshot;
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use chrono::Utc;
use sea_orm::{ActiveValue, entity::prelude::*, sea_query::OnConflict};

use crate::{ServerError, server::ServerState};

const SNAPSHOT_ID: i32 = 1;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "budget_snapshots")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    #[sea_orm(column_type = "Text")]
    pub payload: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Return the stored snapshot.
pub async fn get(State(state): State<ServerState>) -> Result<Json<BudgetSnapshot>, ServerError> {
    let Some(model) = Entity::find_by_id(SNAPSHOT_ID).one(&state.db).await? else {
        return Err(ServerError::NotFound("no budget saved".to_string()));
    };

    let snapshot = serde_json::from_str(&model.payload).map_err(|err| {
        ServerError::Internal(format!("stored budget cannot be decoded: {err}"))
    })?;
    Ok(Json(snapshot))
}

/// Replace the stored snapshot with the request body and echo it back.
pub async fn save(
    State(state): State<ServerState>,
    payload: Result<Json<BudgetSnapshot>, JsonRejection>,
) -> Result<Json<BudgetSnapshot>, ServerError> {
    let Json(snapshot) = payload.map_err(|rejection| {
        tracing::debug!("rejected budget payload: {rejection}");
        ServerError::Generic(rejection.body_text())
    })?;

    let payload = serde_json::to_string(&snapshot)
        .map_err(|err| ServerError::Internal(format!("cannot encode budget: {err}")))?;
    let row = ActiveModel {
        id: ActiveValue::Set(SNAPSHOT_ID),
        payload: ActiveValue::Set(payload),
        updated_at: ActiveValue::Set(Utc::now().to_rfc3339()),
    };

    Entity::insert(row)
        .on_conflict(
            OnConflict::column(Column::Id)
                .update_columns([Column::Payload, Column::UpdatedAt])
                .to_owned(),
        )
        .exec(&state.db)
        .await?;

    tracing::info!(last_updated = %snapshot.last_updated, "budget stored");
    Ok(Json(snapshot))
}

/// Delete the stored snapshot. Deleting when nothing is stored succeeds too.
pub async fn clear(State(state): State<ServerState>) -> Result<StatusCode, ServerError> {
    let res = Entity::delete_by_id(SNAPSHOT_ID).exec(&state.db).await?;
    tracing::info!(rows = res.rows_affected, "budget cleared");
    Ok(StatusCode::NO_CONTENT)
}
