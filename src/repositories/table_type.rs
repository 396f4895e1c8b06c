//! # Table Type Repository
//!
//! Registering a table type seeds its five permission rungs in the same
//! transaction, so a committed table type always has its full ladder.

use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::error::{AuthzError, Result};
use crate::models::enums::ActionSet;
use crate::models::table_permission::{
    self, ActiveModel as TablePermissionActiveModel, Entity as TablePermission,
};
use crate::models::table_type::{
    self, ActiveModel as TableTypeActiveModel, Entity as TableType,
};

/// A table type together with its permission ladder.
#[derive(Debug, Clone)]
pub struct TableTypeWithPermissions {
    pub table_type: table_type::Model,
    pub permissions: Vec<table_permission::Model>,
}

/// Repository for TableType database operations
pub struct TableTypeRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TableTypeRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Register a table type and seed its permission ladder atomically.
    ///
    /// A duplicate (schema_name, name) pair surfaces as `Conflict`.
    pub async fn create_table_type(
        &self,
        schema_name: String,
        name: String,
    ) -> Result<TableTypeWithPermissions> {
        validate_identifier("schema name", &schema_name)?;
        validate_identifier("table name", &name)?;

        let now = Utc::now();
        let table_type_id = Uuid::new_v4();

        let txn = self.db.begin().await?;

        let created = TableTypeActiveModel {
            id: Set(table_type_id),
            schema_name: Set(schema_name),
            name: Set(name),
            created_at: Set(now.into()),
        }
        .insert(&txn)
        .await?;

        let mut permissions = Vec::with_capacity(5);
        for rung in ActionSet::ladder() {
            let permission = TablePermissionActiveModel {
                id: Set(Uuid::new_v4()),
                table_type_id: Set(table_type_id),
                actions: Set(rung),
                created_at: Set(now.into()),
            }
            .insert(&txn)
            .await?;
            permissions.push(permission);
        }

        txn.commit().await?;

        tracing::info!(
            schema = %created.schema_name,
            table = %created.name,
            "registered table type with permission ladder"
        );

        Ok(TableTypeWithPermissions {
            table_type: created,
            permissions,
        })
    }

    /// Get table type by ID
    pub async fn get_table_type_by_id(
        &self,
        table_type_id: Uuid,
    ) -> Result<Option<table_type::Model>> {
        let found = TableType::find_by_id(table_type_id).one(self.db).await?;
        Ok(found)
    }

    /// Find a table type by its (schema_name, name) pair
    pub async fn find_by_name(
        &self,
        schema_name: &str,
        name: &str,
    ) -> Result<Option<table_type::Model>> {
        let found = TableType::find()
            .filter(table_type::Column::SchemaName.eq(schema_name))
            .filter(table_type::Column::Name.eq(name))
            .one(self.db)
            .await?;
        Ok(found)
    }

    /// List all registered table types
    pub async fn list_table_types(&self) -> Result<Vec<table_type::Model>> {
        let types = TableType::find().all(self.db).await?;
        Ok(types)
    }

    /// List the permission rungs of a table type
    pub async fn list_permissions(
        &self,
        table_type_id: Uuid,
    ) -> Result<Vec<table_permission::Model>> {
        let permissions = TablePermission::find()
            .filter(table_permission::Column::TableTypeId.eq(table_type_id))
            .all(self.db)
            .await?;
        Ok(permissions)
    }

    /// Delete a table type; its permission rows and role links cascade.
    pub async fn delete_table_type(&self, table_type_id: Uuid) -> Result<()> {
        let found = TableType::find_by_id(table_type_id)
            .one(self.db)
            .await?
            .ok_or_else(|| AuthzError::not_found("table type", table_type_id))?;

        found.delete(self.db).await?;
        Ok(())
    }
}

fn validate_identifier(what: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AuthzError::validation(format!("{what} cannot be empty")));
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(AuthzError::validation(format!(
            "{what} can only contain ascii letters, digits, and underscores"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::Action;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    async fn setup() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to open in-memory db");
        Migrator::up(&db, None).await.expect("Failed to migrate");
        db
    }

    #[tokio::test]
    async fn create_table_type_seeds_the_ladder() {
        let db = setup().await;
        let repo = TableTypeRepository::new(&db);

        let created = repo
            .create_table_type("billing".to_string(), "invoice".to_string())
            .await
            .unwrap();

        assert_eq!(created.permissions.len(), 5);
        for permission in &created.permissions {
            assert!(permission.actions.iter().any(|a| a == Action::Select));
        }

        let stored = repo
            .list_permissions(created.table_type.id)
            .await
            .unwrap();
        assert_eq!(stored.len(), 5);
    }

    #[tokio::test]
    async fn duplicate_table_type_is_a_conflict() {
        let db = setup().await;
        let repo = TableTypeRepository::new(&db);

        repo.create_table_type("billing".to_string(), "invoice".to_string())
            .await
            .unwrap();
        let dup = repo
            .create_table_type("billing".to_string(), "invoice".to_string())
            .await;
        assert!(matches!(dup, Err(AuthzError::Conflict)));
    }

    #[tokio::test]
    async fn same_name_in_another_schema_is_fine() {
        let db = setup().await;
        let repo = TableTypeRepository::new(&db);

        repo.create_table_type("billing".to_string(), "invoice".to_string())
            .await
            .unwrap();
        repo.create_table_type("archive".to_string(), "invoice".to_string())
            .await
            .unwrap();

        assert!(repo.find_by_name("archive", "invoice").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn bad_identifiers_are_rejected() {
        let db = setup().await;
        let repo = TableTypeRepository::new(&db);

        for (schema, name) in [("", "invoice"), ("billing", "in voice"), ("bil;ling", "x")] {
            let result = repo
                .create_table_type(schema.to_string(), name.to_string())
                .await;
            assert!(matches!(result, Err(AuthzError::Validation(_))));
        }
    }
}
