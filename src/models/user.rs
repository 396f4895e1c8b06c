//! User entity model
//!
//! Superusers carry no tenant or default group; every other user must have
//! both. The rule is enforced by the user repository before insert.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Email address, used as login ID (unique)
    pub email: String,

    /// Displayed name and alternate login ID (unique)
    pub handle: String,

    pub full_name: String,

    /// Owning tenant; None only for superusers
    pub tenant_id: Option<Uuid>,

    /// Group new rows land in by default; None only for superusers
    pub default_group_id: Option<Uuid>,

    pub is_superuser: bool,
    pub is_tenant_admin: bool,
    pub is_active: bool,

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
    #[sea_orm(
        belongs_to = "super::group::Entity",
        from = "Column::DefaultGroupId",
        to = "super::group::Column::Id",
        on_delete = "SetNull"
    )]
    DefaultGroup,
    #[sea_orm(has_many = "super::user_group_role::Entity")]
    UserGroupRoles,
}

impl Related<super::tenant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenant.def()
    }
}

impl Related<super::user_group_role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserGroupRoles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
