//! Database migrations for the rowguard authorization engine.
//!
//! This module contains all database migrations using SeaORM Migration.

pub use sea_orm_migration::prelude::*;

mod m2025_12_01_000001_create_tenants;
mod m2025_12_01_000002_create_groups;
mod m2025_12_01_000003_create_users;
mod m2025_12_01_000004_create_roles;
mod m2025_12_01_000005_create_table_types;
mod m2025_12_01_000006_create_table_permissions;
mod m2025_12_01_000007_create_role_table_permissions;
mod m2025_12_01_000008_create_user_group_roles;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2025_12_01_000001_create_tenants::Migration),
            Box::new(m2025_12_01_000002_create_groups::Migration),
            Box::new(m2025_12_01_000003_create_users::Migration),
            Box::new(m2025_12_01_000004_create_roles::Migration),
            Box::new(m2025_12_01_000005_create_table_types::Migration),
            Box::new(m2025_12_01_000006_create_table_permissions::Migration),
            Box::new(m2025_12_01_000007_create_role_table_permissions::Migration),
            Box::new(m2025_12_01_000008_create_user_group_roles::Migration),
        ]
    }
}
