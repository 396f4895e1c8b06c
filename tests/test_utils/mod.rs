//! Test utilities for database testing.
//!
//! Sets up in-memory SQLite databases with migrations applied, plus fixture
//! helpers for the common tenant/user/permission shapes the suites share.

use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use uuid::Uuid;

use rowguard::config::QuotaConfig;
use rowguard::models::TenantType;
use rowguard::quota::TenantLocks;
use rowguard::repositories::tenant::{CreateTenantRequest, TenantRepository};
use rowguard::repositories::user::{CreateUserRequest, UserRepository};

/// Sets up an in-memory SQLite database with all migrations applied.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

/// Arc-wrapped variant for suites that spawn tasks.
#[allow(dead_code)]
pub async fn setup_test_db_arc() -> Result<Arc<DatabaseConnection>> {
    let db = setup_test_db().await?;
    Ok(Arc::new(db))
}

/// Creates a tenant, returning (tenant_id, default_group_id).
#[allow(dead_code)]
pub async fn create_test_tenant(
    db: &DatabaseConnection,
    name: &str,
    tenant_type: TenantType,
) -> Result<(Uuid, Uuid)> {
    let created = TenantRepository::new(db)
        .create_tenant(CreateTenantRequest {
            name: name.to_string(),
            tenant_type,
        })
        .await?;
    Ok((created.tenant.id, created.default_group.id))
}

/// Creates a regular tenant member, returning their id.
#[allow(dead_code)]
pub async fn create_test_member(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    group_id: Uuid,
    email: &str,
) -> Result<Uuid> {
    let quotas = QuotaConfig::default();
    let locks = TenantLocks::new();
    let user = UserRepository::new(db, &quotas, &locks)
        .create_user(CreateUserRequest {
            email: email.to_string(),
            handle: email.split('@').next().unwrap_or("user").to_string(),
            full_name: "Test User".to_string(),
            tenant_id: Some(tenant_id),
            default_group_id: Some(group_id),
            is_superuser: false,
            is_tenant_admin: false,
        })
        .await?;
    Ok(user.id)
}

/// Creates a superuser, returning their id.
#[allow(dead_code)]
pub async fn create_test_superuser(db: &DatabaseConnection, email: &str) -> Result<Uuid> {
    let quotas = QuotaConfig::default();
    let locks = TenantLocks::new();
    let user = UserRepository::new(db, &quotas, &locks)
        .create_user(CreateUserRequest {
            email: email.to_string(),
            handle: email.split('@').next().unwrap_or("root").to_string(),
            full_name: "Root".to_string(),
            tenant_id: None,
            default_group_id: None,
            is_superuser: true,
            is_tenant_admin: false,
        })
        .await?;
    Ok(user.id)
}
