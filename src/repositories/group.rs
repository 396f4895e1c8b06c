//! # Group Repository
//!
//! Group creation is quota-guarded: the count and the insert run inside one
//! transaction while the tenant's advisory lock is held, so two concurrent
//! creations cannot both observe count < cap.

use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::config::QuotaConfig;
use crate::error::{AuthzError, Result};
use crate::models::group::{self, ActiveModel as GroupActiveModel, Entity as Group};
use crate::models::tenant::Entity as Tenant;
use crate::quota::{self, Resource, TenantLocks};

/// Repository for Group database operations
pub struct GroupRepository<'a> {
    db: &'a DatabaseConnection,
    quotas: &'a QuotaConfig,
    locks: &'a TenantLocks,
}

impl<'a> GroupRepository<'a> {
    pub fn new(db: &'a DatabaseConnection, quotas: &'a QuotaConfig, locks: &'a TenantLocks) -> Self {
        Self { db, quotas, locks }
    }

    /// Create a group for the tenant, enforcing the tenant-type group cap.
    pub async fn create_group(&self, tenant_id: Uuid, name: String) -> Result<group::Model> {
        if name.trim().is_empty() {
            return Err(AuthzError::validation("Group name cannot be empty"));
        }
        if name.len() > 255 {
            return Err(AuthzError::validation(
                "Group name cannot exceed 255 characters",
            ));
        }

        // Held until the transaction below commits
        let _guard = self.locks.acquire(tenant_id).await;

        let txn = self.db.begin().await?;

        let tenant = Tenant::find_by_id(tenant_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AuthzError::not_found("tenant", tenant_id))?;

        let current = quota::count_resource(&txn, tenant_id, Resource::Groups).await?;
        if let Some(cap) =
            quota::exceeded_cap(self.quotas, tenant.tenant_type, Resource::Groups, current)
        {
            return Err(AuthzError::QuotaExceeded {
                tenant_id,
                resource: Resource::Groups,
                cap,
            });
        }

        let now = Utc::now();
        let created = GroupActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(tenant_id),
            name: Set(name),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        Ok(created)
    }

    /// Get group by ID
    pub async fn get_group_by_id(&self, group_id: Uuid) -> Result<Option<group::Model>> {
        let found = Group::find_by_id(group_id).one(self.db).await?;
        Ok(found)
    }

    /// List all groups owned by a tenant
    pub async fn list_groups(&self, tenant_id: Uuid) -> Result<Vec<group::Model>> {
        let groups = Group::find()
            .filter(group::Column::TenantId.eq(tenant_id))
            .all(self.db)
            .await?;
        Ok(groups)
    }

    /// Delete a group
    pub async fn delete_group(&self, group_id: Uuid) -> Result<()> {
        let found = Group::find_by_id(group_id)
            .one(self.db)
            .await?
            .ok_or_else(|| AuthzError::not_found("group", group_id))?;

        found.delete(self.db).await?;
        Ok(())
    }
}
