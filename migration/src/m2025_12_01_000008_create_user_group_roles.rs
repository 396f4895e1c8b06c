//! Migration to create the user_group_roles association table.
//!
//! The actual grant: this user, acting within this group, holds this role.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserGroupRoles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserGroupRoles::UserId).uuid().not_null())
                    .col(ColumnDef::new(UserGroupRoles::GroupId).uuid().not_null())
                    .col(ColumnDef::new(UserGroupRoles::RoleId).uuid().not_null())
                    .col(
                        ColumnDef::new(UserGroupRoles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(UserGroupRoles::UserId)
                            .col(UserGroupRoles::GroupId)
                            .col(UserGroupRoles::RoleId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_group_roles_user_id")
                            .from(UserGroupRoles::Table, UserGroupRoles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_group_roles_group_id")
                            .from(UserGroupRoles::Table, UserGroupRoles::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_group_roles_role_id")
                            .from(UserGroupRoles::Table, UserGroupRoles::RoleId)
                            .to(Roles::Table, Roles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Resolution always filters by user first
        manager
            .create_index(
                Index::create()
                    .name("idx_user_group_roles_user_id")
                    .table(UserGroupRoles::Table)
                    .col(UserGroupRoles::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserGroupRoles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum UserGroupRoles {
    Table,
    UserId,
    GroupId,
    RoleId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Groups {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Roles {
    Table,
    Id,
}
