//! Migration to create the table_types table.
//!
//! A table type identifies a logical resource kind, unique on
//! (schema_name, name).

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TableTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TableTypes::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TableTypes::SchemaName).text().not_null())
                    .col(ColumnDef::new(TableTypes::Name).text().not_null())
                    .col(
                        ColumnDef::new(TableTypes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_table_types_schema_name")
                    .table(TableTypes::Table)
                    .col(TableTypes::SchemaName)
                    .col(TableTypes::Name)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TableTypes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TableTypes {
    Table,
    Id,
    SchemaName,
    Name,
    CreatedAt,
}
