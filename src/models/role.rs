//! Role entity model
//!
//! Roles are tenant-scoped bundles of table permissions.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "roles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Owning tenant; a role never grants anything outside it
    pub tenant_id: Uuid,

    /// Role name, unique within the tenant
    pub name: String,

    pub description: Option<String>,

    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tenant::Entity",
        from = "Column::TenantId",
        to = "super::tenant::Column::Id",
        on_delete = "Cascade"
    )]
    Tenant,
    #[sea_orm(has_many = "super::role_table_permission::Entity")]
    RoleTablePermissions,
    #[sea_orm(has_many = "super::user_group_role::Entity")]
    UserGroupRoles,
}

impl Related<super::tenant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenant.def()
    }
}

impl Related<super::role_table_permission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RoleTablePermissions.def()
    }
}

impl Related<super::user_group_role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserGroupRoles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
