//! TableType entity model
//!
//! Identifies a logical resource kind, unique on (schema_name, name).
//! Creating a table type also creates its five ladder permission rows.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "table_types")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub schema_name: String,
    pub name: String,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::table_permission::Entity")]
    TablePermissions,
}

impl Related<super::table_permission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TablePermissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
