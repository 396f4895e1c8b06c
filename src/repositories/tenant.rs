//! # Tenant Repository
//!
//! Creation of a tenant and its default group is one transaction: there is
//! never a committed tenant without exactly one group.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::error::{AuthzError, Result};
use crate::models::enums::TenantType;
use crate::models::group::{self, ActiveModel as GroupActiveModel};
use crate::models::tenant::{
    ActiveModel as TenantActiveModel, Entity as Tenant, Model as TenantModel,
};

/// Request data for creating a new tenant
#[derive(Debug, Clone)]
pub struct CreateTenantRequest {
    /// Display name for the tenant
    pub name: String,
    /// Tenant classification driving quotas
    pub tenant_type: TenantType,
}

/// A freshly created tenant together with its default group.
#[derive(Debug, Clone)]
pub struct CreatedTenant {
    pub tenant: TenantModel,
    pub default_group: group::Model,
}

/// Repository for Tenant database operations
pub struct TenantRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TenantRepository<'a> {
    /// Create a new TenantRepository with the given database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a new tenant and its default group atomically.
    ///
    /// The default group carries the tenant's name. Quotas do not apply to
    /// the default group: every tenant type allows at least one.
    pub async fn create_tenant(&self, request: CreateTenantRequest) -> Result<CreatedTenant> {
        self.validate_tenant_name(&request.name)?;

        let now = Utc::now();
        let tenant_id = Uuid::new_v4();

        let txn = self.db.begin().await?;

        let tenant = TenantActiveModel {
            id: Set(tenant_id),
            name: Set(request.name.clone()),
            tenant_type: Set(request.tenant_type),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&txn)
        .await?;

        let default_group = GroupActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(tenant_id),
            name: Set(request.name),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        tracing::info!(tenant = %tenant.name, %tenant_id, "created tenant with default group");

        Ok(CreatedTenant {
            tenant,
            default_group,
        })
    }

    /// Get tenant by ID
    pub async fn get_tenant_by_id(&self, tenant_id: Uuid) -> Result<Option<TenantModel>> {
        let tenant = Tenant::find_by_id(tenant_id).one(self.db).await?;
        Ok(tenant)
    }

    /// List all tenants
    pub async fn list_tenants(&self) -> Result<Vec<TenantModel>> {
        let tenants = Tenant::find().all(self.db).await?;
        Ok(tenants)
    }

    /// Update tenant name
    pub async fn update_tenant_name(&self, tenant_id: Uuid, name: String) -> Result<TenantModel> {
        self.validate_tenant_name(&name)?;

        let tenant = self
            .get_tenant_by_id(tenant_id)
            .await?
            .ok_or_else(|| AuthzError::not_found("tenant", tenant_id))?;

        let mut active_tenant = tenant.into_active_model();
        active_tenant.name = Set(name);
        active_tenant.updated_at = Set(Utc::now().into());

        let result = active_tenant.update(self.db).await?;
        Ok(result)
    }

    /// Delete a tenant; groups, users and roles cascade with it.
    pub async fn delete_tenant(&self, tenant_id: Uuid) -> Result<()> {
        let tenant = Tenant::find_by_id(tenant_id)
            .one(self.db)
            .await?
            .ok_or_else(|| AuthzError::not_found("tenant", tenant_id))?;

        tenant.delete(self.db).await?;
        Ok(())
    }

    /// Check if a tenant exists
    pub async fn tenant_exists(&self, tenant_id: Uuid) -> Result<bool> {
        Ok(self.get_tenant_by_id(tenant_id).await?.is_some())
    }

    /// Validate tenant name according to business rules
    fn validate_tenant_name(&self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(AuthzError::validation("Tenant name cannot be empty"));
        }

        if name.len() > 255 {
            return Err(AuthzError::validation(
                "Tenant name cannot exceed 255 characters",
            ));
        }

        if !name
            .chars()
            .all(|c| c.is_alphanumeric() || c.is_whitespace() || c == '-' || c == '_')
        {
            return Err(AuthzError::validation(
                "Tenant name can only contain letters, numbers, spaces, hyphens, and underscores",
            ));
        }

        Ok(())
    }
}
