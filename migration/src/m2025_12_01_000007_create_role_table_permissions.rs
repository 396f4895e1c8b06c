//! Migration to create the role_table_permissions association table.
//!
//! Grants a role the action set encoded by a table permission row. The
//! composite primary key makes duplicate grants impossible at the store
//! level, which is what keeps `grant` idempotent.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RoleTablePermissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RoleTablePermissions::RoleId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RoleTablePermissions::TablePermissionId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RoleTablePermissions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(RoleTablePermissions::RoleId)
                            .col(RoleTablePermissions::TablePermissionId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_role_table_permissions_role_id")
                            .from(RoleTablePermissions::Table, RoleTablePermissions::RoleId)
                            .to(Roles::Table, Roles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_role_table_permissions_permission_id")
                            .from(
                                RoleTablePermissions::Table,
                                RoleTablePermissions::TablePermissionId,
                            )
                            .to(TablePermissions::Table, TablePermissions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RoleTablePermissions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum RoleTablePermissions {
    Table,
    RoleId,
    TablePermissionId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Roles {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum TablePermissions {
    Table,
    Id,
}
