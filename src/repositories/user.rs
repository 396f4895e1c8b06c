//! # User Repository
//!
//! Enforces the superuser invariants before anything reaches the store:
//! superusers carry no tenant and no default group, everyone else must have
//! both, and the default group must belong to the user's tenant. Tenant
//! members are quota-guarded the same way groups are.

use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    ModelTrait, QueryFilter, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::config::QuotaConfig;
use crate::error::{AuthzError, Result};
use crate::models::group::Entity as Group;
use crate::models::tenant::Entity as Tenant;
use crate::models::user::{self, ActiveModel as UserActiveModel, Entity as User};
use crate::quota::{self, Resource, TenantLocks};

/// Request data for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub email: String,
    pub handle: String,
    pub full_name: String,
    /// Owning tenant; must be None for superusers, Some otherwise
    pub tenant_id: Option<Uuid>,
    /// Default group; must be None for superusers, Some otherwise
    pub default_group_id: Option<Uuid>,
    pub is_superuser: bool,
    pub is_tenant_admin: bool,
}

/// Repository for User database operations
pub struct UserRepository<'a> {
    db: &'a DatabaseConnection,
    quotas: &'a QuotaConfig,
    locks: &'a TenantLocks,
}

impl<'a> UserRepository<'a> {
    pub fn new(db: &'a DatabaseConnection, quotas: &'a QuotaConfig, locks: &'a TenantLocks) -> Self {
        Self { db, quotas, locks }
    }

    /// Create a new user.
    ///
    /// Superusers skip the tenant lock and quota check since they belong to
    /// no tenant. Everyone else counts against their tenant's user cap.
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<user::Model> {
        validate_user_shape(&request)?;

        if request.is_superuser {
            return self.insert_user(self.db, request).await;
        }

        // validate_user_shape guarantees both ids are present here
        let tenant_id = request
            .tenant_id
            .ok_or_else(|| AuthzError::invariant("non-superuser without tenant"))?;
        let default_group_id = request
            .default_group_id
            .ok_or_else(|| AuthzError::invariant("non-superuser without default group"))?;

        let _guard = self.locks.acquire(tenant_id).await;

        let txn = self.db.begin().await?;

        let tenant = Tenant::find_by_id(tenant_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AuthzError::not_found("tenant", tenant_id))?;

        let group = Group::find_by_id(default_group_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AuthzError::not_found("group", default_group_id))?;
        if group.tenant_id != tenant_id {
            return Err(AuthzError::invariant(format!(
                "default group {default_group_id} belongs to tenant {}, not {tenant_id}",
                group.tenant_id
            )));
        }

        let current = quota::count_resource(&txn, tenant_id, Resource::Users).await?;
        if let Some(cap) =
            quota::exceeded_cap(self.quotas, tenant.tenant_type, Resource::Users, current)
        {
            return Err(AuthzError::QuotaExceeded {
                tenant_id,
                resource: Resource::Users,
                cap,
            });
        }

        let created = self.insert_user(&txn, request).await?;
        txn.commit().await?;

        Ok(created)
    }

    async fn insert_user<C: ConnectionTrait>(
        &self,
        conn: &C,
        request: CreateUserRequest,
    ) -> Result<user::Model> {
        let now = Utc::now();
        let created = UserActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(request.email),
            handle: Set(request.handle),
            full_name: Set(request.full_name),
            tenant_id: Set(request.tenant_id),
            default_group_id: Set(request.default_group_id),
            is_superuser: Set(request.is_superuser),
            is_tenant_admin: Set(request.is_tenant_admin),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(conn)
        .await?;

        tracing::info!(email = %created.email, user_id = %created.id, "created user");
        Ok(created)
    }

    /// Get user by ID
    pub async fn get_user_by_id(&self, user_id: Uuid) -> Result<Option<user::Model>> {
        let found = User::find_by_id(user_id).one(self.db).await?;
        Ok(found)
    }

    /// Get user by email
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<user::Model>> {
        let found = User::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db)
            .await?;
        Ok(found)
    }

    /// List all users owned by a tenant
    pub async fn list_users(&self, tenant_id: Uuid) -> Result<Vec<user::Model>> {
        let users = User::find()
            .filter(user::Column::TenantId.eq(tenant_id))
            .all(self.db)
            .await?;
        Ok(users)
    }

    /// Deactivate a user without deleting their rows or grants.
    pub async fn deactivate_user(&self, user_id: Uuid) -> Result<user::Model> {
        let found = User::find_by_id(user_id)
            .one(self.db)
            .await?
            .ok_or_else(|| AuthzError::not_found("user", user_id))?;

        let mut active = found.into_active_model();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(self.db).await?;
        Ok(updated)
    }

    /// Delete a user; their grants cascade with them.
    pub async fn delete_user(&self, user_id: Uuid) -> Result<()> {
        let found = User::find_by_id(user_id)
            .one(self.db)
            .await?
            .ok_or_else(|| AuthzError::not_found("user", user_id))?;

        found.delete(self.db).await?;
        Ok(())
    }
}

/// Checks the tenant/group/flag shape of a user before any store access.
fn validate_user_shape(request: &CreateUserRequest) -> Result<()> {
    if request.email.trim().is_empty() || !request.email.contains('@') {
        return Err(AuthzError::validation("User email must be a valid address"));
    }
    if request.handle.trim().is_empty() {
        return Err(AuthzError::validation("User handle cannot be empty"));
    }

    if request.is_superuser {
        if request.is_tenant_admin {
            return Err(AuthzError::invariant(
                "a superuser cannot also be a tenant admin",
            ));
        }
        if request.tenant_id.is_some() || request.default_group_id.is_some() {
            return Err(AuthzError::invariant(
                "a superuser carries no tenant and no default group",
            ));
        }
    } else if request.tenant_id.is_none() || request.default_group_id.is_none() {
        return Err(AuthzError::invariant(
            "a non-superuser must have a tenant and a default group",
        ));
    }

    Ok(())
}
