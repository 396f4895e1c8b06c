//! TablePermission entity model
//!
//! One rung of the action ladder for a table type. Cascade-deleted with its
//! table type.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

use super::enums::ActionSet;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "table_permissions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub table_type_id: Uuid,

    /// Granted actions, stored as a JSON array
    #[sea_orm(column_type = "JsonBinary")]
    pub actions: ActionSet,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::table_type::Entity",
        from = "Column::TableTypeId",
        to = "super::table_type::Column::Id",
        on_delete = "Cascade"
    )]
    TableType,
    #[sea_orm(has_many = "super::role_table_permission::Entity")]
    RoleTablePermissions,
}

impl Related<super::table_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TableType.def()
    }
}

impl Related<super::role_table_permission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RoleTablePermissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
