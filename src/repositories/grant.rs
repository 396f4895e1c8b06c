//! # Grant Repository
//!
//! Links roles to permission rungs and users to (group, role) pairs.
//! Granting is idempotent; assignment enforces that the user, the group,
//! and the role all live in the same tenant.

use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::error::{AuthzError, Result};
use crate::models::group::Entity as Group;
use crate::models::role::Entity as Role;
use crate::models::role_table_permission::{
    self, ActiveModel as RoleTablePermissionActiveModel, Entity as RoleTablePermission,
};
use crate::models::table_permission::Entity as TablePermission;
use crate::models::user::Entity as User;
use crate::models::user_group_role::{
    self, ActiveModel as UserGroupRoleActiveModel, Entity as UserGroupRole,
};

/// Repository for permission grants and role assignments
pub struct GrantRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> GrantRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Grant a permission rung to a role. Granting twice is a no-op.
    pub async fn grant(&self, role_id: Uuid, table_permission_id: Uuid) -> Result<()> {
        Role::find_by_id(role_id)
            .one(self.db)
            .await?
            .ok_or_else(|| AuthzError::not_found("role", role_id))?;
        TablePermission::find_by_id(table_permission_id)
            .one(self.db)
            .await?
            .ok_or_else(|| AuthzError::not_found("table permission", table_permission_id))?;

        let link = RoleTablePermissionActiveModel {
            role_id: Set(role_id),
            table_permission_id: Set(table_permission_id),
            created_at: Set(Utc::now().into()),
        };

        RoleTablePermission::insert(link)
            .on_conflict(
                OnConflict::columns([
                    role_table_permission::Column::RoleId,
                    role_table_permission::Column::TablePermissionId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(self.db)
            .await?;

        Ok(())
    }

    /// Remove a permission rung from a role.
    pub async fn revoke(&self, role_id: Uuid, table_permission_id: Uuid) -> Result<()> {
        let deleted = RoleTablePermission::delete_by_id((role_id, table_permission_id))
            .exec(self.db)
            .await?;
        if deleted.rows_affected == 0 {
            return Err(AuthzError::not_found("role grant", role_id));
        }
        Ok(())
    }

    /// Assign a role to a user within a group. Assigning twice is a no-op.
    ///
    /// The group and the role must belong to the same tenant, and the user
    /// must belong to it too. Superusers take no assignments; their access
    /// is total already.
    pub async fn assign(&self, user_id: Uuid, group_id: Uuid, role_id: Uuid) -> Result<()> {
        let user = User::find_by_id(user_id)
            .one(self.db)
            .await?
            .ok_or_else(|| AuthzError::not_found("user", user_id))?;
        let group = Group::find_by_id(group_id)
            .one(self.db)
            .await?
            .ok_or_else(|| AuthzError::not_found("group", group_id))?;
        let role = Role::find_by_id(role_id)
            .one(self.db)
            .await?
            .ok_or_else(|| AuthzError::not_found("role", role_id))?;

        if user.is_superuser {
            return Err(AuthzError::invariant(
                "superusers do not take role assignments",
            ));
        }
        if group.tenant_id != role.tenant_id {
            return Err(AuthzError::invariant(format!(
                "group {group_id} and role {role_id} belong to different tenants"
            )));
        }
        if user.tenant_id != Some(group.tenant_id) {
            return Err(AuthzError::invariant(format!(
                "user {user_id} does not belong to the group's tenant"
            )));
        }

        let assignment = UserGroupRoleActiveModel {
            user_id: Set(user_id),
            group_id: Set(group_id),
            role_id: Set(role_id),
            created_at: Set(Utc::now().into()),
        };

        UserGroupRole::insert(assignment)
            .on_conflict(
                OnConflict::columns([
                    user_group_role::Column::UserId,
                    user_group_role::Column::GroupId,
                    user_group_role::Column::RoleId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(self.db)
            .await?;

        tracing::info!(%user_id, %group_id, %role_id, "assigned role");
        Ok(())
    }

    /// Remove a (user, group, role) assignment.
    pub async fn unassign(&self, user_id: Uuid, group_id: Uuid, role_id: Uuid) -> Result<()> {
        let deleted = UserGroupRole::delete_by_id((user_id, group_id, role_id))
            .exec(self.db)
            .await?;
        if deleted.rows_affected == 0 {
            return Err(AuthzError::not_found("role assignment", user_id));
        }
        Ok(())
    }

    /// List a user's assignments.
    pub async fn list_assignments(&self, user_id: Uuid) -> Result<Vec<user_group_role::Model>> {
        let assignments = UserGroupRole::find()
            .filter(user_group_role::Column::UserId.eq(user_id))
            .all(self.db)
            .await?;
        Ok(assignments)
    }

    /// List the permission rungs granted to a role.
    pub async fn list_role_grants(
        &self,
        role_id: Uuid,
    ) -> Result<Vec<role_table_permission::Model>> {
        let grants = RoleTablePermission::find()
            .filter(role_table_permission::Column::RoleId.eq(role_id))
            .all(self.db)
            .await?;
        Ok(grants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QuotaConfig;
    use crate::models::enums::TenantType;
    use crate::quota::TenantLocks;
    use crate::repositories::role::RoleRepository;
    use crate::repositories::table_type::TableTypeRepository;
    use crate::repositories::tenant::{CreateTenantRequest, TenantRepository};
    use crate::repositories::user::{CreateUserRequest, UserRepository};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    struct Fixture {
        db: DatabaseConnection,
        group_id: Uuid,
        user_id: Uuid,
        role_id: Uuid,
        permission_id: Uuid,
    }

    async fn setup() -> Fixture {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to open in-memory db");
        Migrator::up(&db, None).await.expect("Failed to migrate");

        let created = TenantRepository::new(&db)
            .create_tenant(CreateTenantRequest {
                name: "Acme".to_string(),
                tenant_type: TenantType::Corporate,
            })
            .await
            .unwrap();
        let tenant_id = created.tenant.id;
        let group_id = created.default_group.id;

        let quotas = QuotaConfig::default();
        let locks = TenantLocks::new();
        let user_id = UserRepository::new(&db, &quotas, &locks)
            .create_user(CreateUserRequest {
                email: "kit@acme.test".to_string(),
                handle: "kit".to_string(),
                full_name: "Kit".to_string(),
                tenant_id: Some(tenant_id),
                default_group_id: Some(group_id),
                is_superuser: false,
                is_tenant_admin: false,
            })
            .await
            .unwrap()
            .id;

        let role_id = RoleRepository::new(&db)
            .create_role(tenant_id, "editor".to_string(), None)
            .await
            .unwrap()
            .id;

        let table_type = TableTypeRepository::new(&db)
            .create_table_type("billing".to_string(), "invoice".to_string())
            .await
            .unwrap();
        let permission_id = table_type.permissions[0].id;

        Fixture {
            db,
            group_id,
            user_id,
            role_id,
            permission_id,
        }
    }

    #[tokio::test]
    async fn grant_is_idempotent() {
        let fx = setup().await;
        let repo = GrantRepository::new(&fx.db);

        repo.grant(fx.role_id, fx.permission_id).await.unwrap();
        repo.grant(fx.role_id, fx.permission_id).await.unwrap();

        let grants = repo.list_role_grants(fx.role_id).await.unwrap();
        assert_eq!(grants.len(), 1);
    }

    #[tokio::test]
    async fn assign_is_idempotent() {
        let fx = setup().await;
        let repo = GrantRepository::new(&fx.db);

        repo.assign(fx.user_id, fx.group_id, fx.role_id)
            .await
            .unwrap();
        repo.assign(fx.user_id, fx.group_id, fx.role_id)
            .await
            .unwrap();

        let assignments = repo.list_assignments(fx.user_id).await.unwrap();
        assert_eq!(assignments.len(), 1);
    }

    #[tokio::test]
    async fn assign_rejects_cross_tenant_role() {
        let fx = setup().await;
        let other_tenant = TenantRepository::new(&fx.db)
            .create_tenant(CreateTenantRequest {
                name: "Birdy".to_string(),
                tenant_type: TenantType::Corporate,
            })
            .await
            .unwrap();
        let foreign_role = RoleRepository::new(&fx.db)
            .create_role(other_tenant.tenant.id, "editor".to_string(), None)
            .await
            .unwrap();

        let result = GrantRepository::new(&fx.db)
            .assign(fx.user_id, fx.group_id, foreign_role.id)
            .await;
        assert!(matches!(result, Err(AuthzError::InvariantViolation(_))));
    }

    #[tokio::test]
    async fn assign_rejects_superuser() {
        let fx = setup().await;
        let quotas = QuotaConfig::default();
        let locks = TenantLocks::new();
        let root = UserRepository::new(&fx.db, &quotas, &locks)
            .create_user(CreateUserRequest {
                email: "root@rowguard.test".to_string(),
                handle: "root".to_string(),
                full_name: "Root".to_string(),
                tenant_id: None,
                default_group_id: None,
                is_superuser: true,
                is_tenant_admin: false,
            })
            .await
            .unwrap();

        let result = GrantRepository::new(&fx.db)
            .assign(root.id, fx.group_id, fx.role_id)
            .await;
        assert!(matches!(result, Err(AuthzError::InvariantViolation(_))));
    }

    #[tokio::test]
    async fn grant_with_dangling_ids_is_not_found() {
        let fx = setup().await;
        let repo = GrantRepository::new(&fx.db);

        let result = repo.grant(Uuid::new_v4(), fx.permission_id).await;
        assert!(matches!(result, Err(AuthzError::NotFound { .. })));

        let result = repo.grant(fx.role_id, Uuid::new_v4()).await;
        assert!(matches!(result, Err(AuthzError::NotFound { .. })));
    }

    #[tokio::test]
    async fn revoke_and_unassign_remove_links() {
        let fx = setup().await;
        let repo = GrantRepository::new(&fx.db);

        repo.grant(fx.role_id, fx.permission_id).await.unwrap();
        repo.assign(fx.user_id, fx.group_id, fx.role_id)
            .await
            .unwrap();

        repo.revoke(fx.role_id, fx.permission_id).await.unwrap();
        repo.unassign(fx.user_id, fx.group_id, fx.role_id)
            .await
            .unwrap();

        assert!(repo.list_role_grants(fx.role_id).await.unwrap().is_empty());
        assert!(repo.list_assignments(fx.user_id).await.unwrap().is_empty());

        // A second removal has nothing to delete
        let result = repo.revoke(fx.role_id, fx.permission_id).await;
        assert!(matches!(result, Err(AuthzError::NotFound { .. })));
    }
}
