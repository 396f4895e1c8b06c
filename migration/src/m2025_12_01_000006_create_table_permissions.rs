//! Migration to create the table_permissions table.
//!
//! Each row encodes one rung of the action ladder for a table type. Rows are
//! deleted with their table type via the FK cascade.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TablePermissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TablePermissions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TablePermissions::TableTypeId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TablePermissions::Actions)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TablePermissions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_table_permissions_table_type_id")
                            .from(TablePermissions::Table, TablePermissions::TableTypeId)
                            .to(TableTypes::Table, TableTypes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One permission row per (table type, action set)
        manager
            .create_index(
                Index::create()
                    .name("idx_table_permissions_type_actions")
                    .table(TablePermissions::Table)
                    .col(TablePermissions::TableTypeId)
                    .col(TablePermissions::Actions)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TablePermissions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TablePermissions {
    Table,
    Id,
    TableTypeId,
    Actions,
    CreatedAt,
}

#[derive(DeriveIden)]
enum TableTypes {
    Table,
    Id,
}
