//! Row-level-security DDL generation.
//!
//! Emits the Postgres statements that enforce the policy model inside the
//! database itself: ENABLE/FORCE ROW LEVEL SECURITY plus one policy per
//! operation, reading the session variables (`rls_var.*`) an authenticated
//! connection sets. Generation is pure string assembly; applying the DDL is
//! the caller's concern.

use std::fmt;
use std::fmt::Write as _;

use crate::models::Action;

/// The policy family applied to a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    /// Superusers see everything, tenant admins their tenant, regular
    /// users the rows owned by their permissible groups.
    GroupScoped,
    /// Superusers see everything, everyone else only their own tenant's
    /// rows; writes are restricted to superusers and tenant admins.
    TenantScoped,
    /// Superusers and tenant admins only.
    AdminOnly,
    /// Superusers only.
    SuperuserOnly,
    /// Anyone may read; only superusers may write.
    PublicReadSuperuserWrite,
}

/// Builds the RLS DDL for one table.
#[derive(Debug, Clone)]
pub struct RlsEmitter {
    schema_name: String,
    table_name: String,
    kind: PolicyKind,
    force_rls: bool,
}

impl RlsEmitter {
    pub fn new(schema_name: impl Into<String>, table_name: impl Into<String>, kind: PolicyKind) -> Self {
        Self {
            schema_name: schema_name.into(),
            table_name: table_name.into(),
            kind,
            force_rls: true,
        }
    }

    /// Skip FORCE ROW LEVEL SECURITY, leaving the table owner unrestricted.
    pub fn without_force(mut self) -> Self {
        self.force_rls = false;
        self
    }

    fn qualified(&self) -> String {
        format!("{}.{}", self.schema_name, self.table_name)
    }

    /// The full DDL script: enable, optionally force, then one policy per
    /// operation.
    pub fn emit(&self) -> String {
        let mut sql = String::new();
        let table = self.qualified();

        // Writes into a String are infallible
        let _ = writeln!(sql, "ALTER TABLE {table} ENABLE ROW LEVEL SECURITY;");
        if self.force_rls {
            let _ = writeln!(sql, "ALTER TABLE {table} FORCE ROW LEVEL SECURITY;");
        }
        for action in Action::ALL {
            let _ = writeln!(sql, "{}", self.policy_for(action));
        }

        sql
    }

    /// One CREATE POLICY statement for the given operation.
    pub fn policy_for(&self, action: Action) -> String {
        let table = self.qualified();
        let name = policy_name(&self.table_name, action);
        let predicate = self.predicate_for(action);

        match action {
            // INSERT policies constrain new rows, not visible ones
            Action::Insert => format!(
                "CREATE POLICY {name}\n    ON {table} FOR INSERT\n    WITH CHECK ({predicate});"
            ),
            _ => format!(
                "CREATE POLICY {name}\n    ON {table} FOR {action}\n    USING ({predicate});"
            ),
        }
    }

    fn predicate_for(&self, action: Action) -> Predicate {
        match (self.kind, action) {
            (PolicyKind::GroupScoped, _) => Predicate::GroupScoped(action),
            (PolicyKind::TenantScoped, Action::Select) => Predicate::SuperuserOrTenantMember,
            (PolicyKind::TenantScoped, _) => Predicate::SuperuserOrTenantAdmin,
            (PolicyKind::AdminOnly, _) => Predicate::SuperuserOrTenantAdmin,
            (PolicyKind::SuperuserOnly, _) => Predicate::Superuser,
            (PolicyKind::PublicReadSuperuserWrite, Action::Select) => Predicate::Everyone,
            (PolicyKind::PublicReadSuperuserWrite, _) => Predicate::Superuser,
        }
    }
}

fn policy_name(table_name: &str, action: Action) -> String {
    format!("{}_{}_policy", table_name, action.to_string().to_lowercase())
}

/// The USING / WITH CHECK expressions, built from `rls_var.*` session
/// variables set at connection authorization time.
enum Predicate {
    Everyone,
    Superuser,
    SuperuserOrTenantAdmin,
    SuperuserOrTenantMember,
    GroupScoped(Action),
}

const IS_SUPERUSER: &str = "current_setting('rls_var.is_superuser', true)::BOOLEAN";
const IS_TENANT_ADMIN: &str = "current_setting('rls_var.is_tenant_admin', true)::BOOLEAN";
const TENANT_MATCH: &str = "tenant_id = current_setting('rls_var.tenant_id', true)::TEXT";
const OWNER_MATCH: &str = "owned_by_id = current_setting('rls_var.user_id', true)::TEXT";

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Everyone => f.write_str("true"),
            Predicate::Superuser => f.write_str(IS_SUPERUSER),
            Predicate::SuperuserOrTenantAdmin => {
                write!(f, "{IS_SUPERUSER} OR ({IS_TENANT_ADMIN} AND {TENANT_MATCH})")
            }
            Predicate::SuperuserOrTenantMember => {
                write!(f, "{IS_SUPERUSER} OR {TENANT_MATCH}")
            }
            Predicate::GroupScoped(action) => {
                write!(
                    f,
                    "{IS_SUPERUSER} OR ({IS_TENANT_ADMIN} AND {TENANT_MATCH}) OR \
                     ({OWNER_MATCH} OR group_id IN \
                     (SELECT id FROM permissible_groups('{action}')))"
                )
            }
        }
    }
}
