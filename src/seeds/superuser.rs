//! Superuser seeding functionality
//!
//! Seeds the initial superuser from configuration. The superuser carries no
//! tenant and no default group; it exists so the system has an identity
//! capable of registering tenants and table types before anything else does.

use anyhow::Result;
use sea_orm::DatabaseConnection;

use crate::config::{QuotaConfig, SuperuserConfig};
use crate::models::user;
use crate::quota::TenantLocks;
use crate::repositories::user::{CreateUserRequest, UserRepository};

/// Seeds the superuser from configuration if one does not exist yet.
///
/// Idempotent: when a user with the configured email already exists, seeding
/// is skipped. When no superuser email is configured, seeding is skipped
/// entirely.
///
/// # Arguments
///
/// * `db` - Database connection
/// * `config` - Superuser identity from `ROWGUARD_SUPERUSER_*`
///
/// # Returns
///
/// Returns the seeded (or pre-existing) superuser, or None when no
/// superuser is configured.
pub async fn seed_superuser(
    db: &DatabaseConnection,
    config: &SuperuserConfig,
) -> Result<Option<user::Model>> {
    let Some(email) = config.email.as_deref() else {
        log::info!("No superuser configured, skipping seeding");
        return Ok(None);
    };

    // Quotas never apply to superusers, but the repository wants them
    let quotas = QuotaConfig::default();
    let locks = TenantLocks::new();
    let repo = UserRepository::new(db, &quotas, &locks);

    if let Some(existing) = repo.get_user_by_email(email).await? {
        log::info!("Superuser '{}' already exists, skipping", email);
        return Ok(Some(existing));
    }

    log::info!("Creating superuser: {}", email);

    let handle = config
        .handle
        .clone()
        .or_else(|| email.split('@').next().map(str::to_string))
        .unwrap_or_else(|| "admin".to_string());
    let full_name = config
        .full_name
        .clone()
        .unwrap_or_else(|| handle.clone());

    let created = repo
        .create_user(CreateUserRequest {
            email: email.to_string(),
            handle,
            full_name,
            tenant_id: None,
            default_group_id: None,
            is_superuser: true,
            is_tenant_admin: false,
        })
        .await?;

    log::info!("Successfully created superuser: {}", created.email);
    Ok(Some(created))
}
