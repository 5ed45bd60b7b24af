//! Budget snapshot storage.
//!
//! The backend keeps a single row (`id = 1`) holding the last snapshot a
//! client saved, serialized as JSON. Saving overwrites the row.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum BudgetSnapshots {
    Table,
    Id,
    Payload,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BudgetSnapshots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BudgetSnapshots::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BudgetSnapshots::Payload).text().not_null())
                    .col(
                        ColumnDef::new(BudgetSnapshots::UpdatedAt)
                            .string()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BudgetSnapshots::Table).to_owned())
            .await
    }
}
