//! # Policy Resolution Engine
//!
//! Deterministically computes, for a (user, table type) pair, the union of
//! actions the user may perform and the set of groups through which access
//! is granted. Grants combine by union: a user holding several roles across
//! several groups gets everything any of them grants, and nothing more.
//! There is no explicit deny; no matching grant means empty actions and
//! empty groups.

use std::collections::{BTreeSet, HashMap, HashSet};

use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, QueryFilter};
use uuid::Uuid;

use crate::error::{AuthzError, Result};
use crate::models::{
    Action, role_table_permission, table_permission, table_type, user, user_group_role,
};

/// The groups whose rows are visible to a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupScope {
    /// Superuser sentinel: every group in the system.
    All,
    /// The specific groups that contributed a matching grant.
    Groups(BTreeSet<Uuid>),
}

impl GroupScope {
    pub fn is_all(&self) -> bool {
        matches!(self, GroupScope::All)
    }

    /// Whether rows owned by `group_id` are visible under this scope.
    pub fn covers(&self, group_id: Uuid) -> bool {
        match self {
            GroupScope::All => true,
            GroupScope::Groups(groups) => groups.contains(&group_id),
        }
    }
}

/// The outcome of resolving a user against a table type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub groups: GroupScope,
    pub actions: BTreeSet<Action>,
}

impl Resolution {
    fn empty() -> Self {
        Self {
            groups: GroupScope::Groups(BTreeSet::new()),
            actions: BTreeSet::new(),
        }
    }

    fn superuser() -> Self {
        Self {
            groups: GroupScope::All,
            actions: Action::ALL.into_iter().collect(),
        }
    }

    pub fn permits(&self, action: Action) -> bool {
        self.actions.contains(&action)
    }
}

/// Read-only resolver walking UserGroupRole -> RoleTablePermission ->
/// TablePermission.
pub struct PolicyResolver<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> PolicyResolver<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Resolves the effective permissions of `user_id` against
    /// `table_type_id`.
    ///
    /// Superusers bypass group scoping entirely. Unknown user or table type
    /// ids are `NotFound`; an inactive user or a user with no matching
    /// grants resolves to empty actions and empty groups (default-deny),
    /// which is not an error.
    pub async fn resolve(&self, user_id: Uuid, table_type_id: Uuid) -> Result<Resolution> {
        let user = user::Entity::find_by_id(user_id)
            .one(self.conn)
            .await?
            .ok_or_else(|| AuthzError::not_found("user", user_id))?;

        let table_type = table_type::Entity::find_by_id(table_type_id)
            .one(self.conn)
            .await?
            .ok_or_else(|| AuthzError::not_found("table type", table_type_id))?;

        if !user.is_active {
            tracing::debug!(user = %user.email, "inactive user resolves to nothing");
            return Ok(Resolution::empty());
        }

        if user.is_superuser {
            tracing::debug!(user = %user.email, "superuser bypasses group scoping");
            return Ok(Resolution::superuser());
        }

        let grants = user_group_role::Entity::find()
            .filter(user_group_role::Column::UserId.eq(user_id))
            .all(self.conn)
            .await?;
        if grants.is_empty() {
            return Ok(Resolution::empty());
        }

        let role_ids: HashSet<Uuid> = grants.iter().map(|g| g.role_id).collect();

        // Permission rungs defined for this table type, keyed by id
        let rungs: HashMap<Uuid, table_permission::Model> = table_permission::Entity::find()
            .filter(table_permission::Column::TableTypeId.eq(table_type.id))
            .all(self.conn)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let role_grants = role_table_permission::Entity::find()
            .filter(
                role_table_permission::Column::RoleId.is_in(role_ids.iter().copied()),
            )
            .all(self.conn)
            .await?;

        let mut actions: BTreeSet<Action> = BTreeSet::new();
        let mut matched_roles: HashSet<Uuid> = HashSet::new();
        for rg in &role_grants {
            if let Some(permission) = rungs.get(&rg.table_permission_id) {
                actions.extend(permission.actions.iter());
                matched_roles.insert(rg.role_id);
            }
        }

        // Only grants that contributed a match widen the visible group set
        let groups: BTreeSet<Uuid> = grants
            .iter()
            .filter(|g| matched_roles.contains(&g.role_id))
            .map(|g| g.group_id)
            .collect();

        Ok(Resolution {
            groups: GroupScope::Groups(groups),
            actions,
        })
    }

    /// Resolves against a table type addressed by (schema_name, name).
    pub async fn resolve_by_name(
        &self,
        user_id: Uuid,
        schema_name: &str,
        name: &str,
    ) -> Result<Resolution> {
        let table_type = table_type::Entity::find()
            .filter(table_type::Column::SchemaName.eq(schema_name))
            .filter(table_type::Column::Name.eq(name))
            .one(self.conn)
            .await?
            .ok_or_else(|| {
                AuthzError::not_found("table type", format!("{schema_name}.{name}"))
            })?;

        self.resolve(user_id, table_type.id).await
    }
}
