//! # Role Repository

use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::error::{AuthzError, Result};
use crate::models::role::{self, ActiveModel as RoleActiveModel, Entity as Role};
use crate::models::tenant::Entity as Tenant;

/// Repository for Role database operations
pub struct RoleRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> RoleRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a role owned by the tenant. Role names are unique per tenant;
    /// a duplicate surfaces as `Conflict`.
    pub async fn create_role(
        &self,
        tenant_id: Uuid,
        name: String,
        description: Option<String>,
    ) -> Result<role::Model> {
        if name.trim().is_empty() {
            return Err(AuthzError::validation("Role name cannot be empty"));
        }
        if name.len() > 255 {
            return Err(AuthzError::validation(
                "Role name cannot exceed 255 characters",
            ));
        }

        Tenant::find_by_id(tenant_id)
            .one(self.db)
            .await?
            .ok_or_else(|| AuthzError::not_found("tenant", tenant_id))?;

        let now = Utc::now();
        let created = RoleActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(tenant_id),
            name: Set(name),
            description: Set(description),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(self.db)
        .await?;

        Ok(created)
    }

    /// Get role by ID
    pub async fn get_role_by_id(&self, role_id: Uuid) -> Result<Option<role::Model>> {
        let found = Role::find_by_id(role_id).one(self.db).await?;
        Ok(found)
    }

    /// Find a role by name within a tenant
    pub async fn find_role_by_name(
        &self,
        tenant_id: Uuid,
        name: &str,
    ) -> Result<Option<role::Model>> {
        let found = Role::find()
            .filter(role::Column::TenantId.eq(tenant_id))
            .filter(role::Column::Name.eq(name))
            .one(self.db)
            .await?;
        Ok(found)
    }

    /// List all roles owned by a tenant
    pub async fn list_roles(&self, tenant_id: Uuid) -> Result<Vec<role::Model>> {
        let roles = Role::find()
            .filter(role::Column::TenantId.eq(tenant_id))
            .all(self.db)
            .await?;
        Ok(roles)
    }

    /// Delete a role; its permission links and user grants cascade with it.
    pub async fn delete_role(&self, role_id: Uuid) -> Result<()> {
        let found = Role::find_by_id(role_id)
            .one(self.db)
            .await?
            .ok_or_else(|| AuthzError::not_found("role", role_id))?;

        found.delete(self.db).await?;
        Ok(())
    }
}
