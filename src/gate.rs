//! # Enforcement Gate
//!
//! The single choke point every data-access path calls before performing a
//! read or mutation. Denials are decision values, never errors: the gate
//! raises only for structurally invalid input (unknown ids), so callers can
//! log and audit allow/deny uniformly.

use sea_orm::ConnectionTrait;
use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::config::QuotaConfig;
use crate::engine::{GroupScope, PolicyResolver};
use crate::error::{AuthzError, Result};
use crate::models::{Action, tenant};
use crate::quota::{self, Resource};

/// An authorization outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Decision plus the group scope for row-level filtering.
///
/// For SELECT-shaped reads the caller restricts the result set to rows
/// owned by a group in `groups` (or passes everything through on the
/// superuser sentinel). Row filtering itself belongs to the storage layer,
/// not to this gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Access {
    pub decision: Decision,
    pub groups: GroupScope,
}

/// Pure decision functions over the policy model; never mutates state.
pub struct EnforcementGate<'a, C: ConnectionTrait> {
    conn: &'a C,
    quotas: &'a QuotaConfig,
}

impl<'a, C: ConnectionTrait> EnforcementGate<'a, C> {
    pub fn new(conn: &'a C, quotas: &'a QuotaConfig) -> Self {
        Self { conn, quotas }
    }

    /// Decides whether `user_id` may perform `action` on `table_type_id`.
    pub async fn authorize(
        &self,
        user_id: Uuid,
        table_type_id: Uuid,
        action: Action,
    ) -> Result<Access> {
        let resolution = PolicyResolver::new(self.conn)
            .resolve(user_id, table_type_id)
            .await?;

        let decision = if resolution.permits(action) {
            Decision::Allow
        } else {
            Decision::Deny
        };

        tracing::debug!(
            %user_id,
            %table_type_id,
            %action,
            ?decision,
            "authorization decision"
        );

        Ok(Access {
            decision,
            groups: resolution.groups,
        })
    }

    /// Pre-flight quota check: denies when the tenant is at or over the cap
    /// for `resource`.
    ///
    /// This is advisory on its own; creation paths re-check under the
    /// tenant's advisory lock inside the creating transaction, otherwise two
    /// concurrent creations could both pass and overshoot the cap.
    pub async fn check_quota(&self, tenant_id: Uuid, resource: Resource) -> Result<Decision> {
        let tenant = tenant::Entity::find_by_id(tenant_id)
            .one(self.conn)
            .await?
            .ok_or_else(|| AuthzError::not_found("tenant", tenant_id))?;

        let current = quota::count_resource(self.conn, tenant_id, resource).await?;
        match quota::exceeded_cap(self.quotas, tenant.tenant_type, resource, current) {
            Some(cap) => {
                tracing::debug!(%tenant_id, %resource, current, cap, "quota check denied");
                Ok(Decision::Deny)
            }
            None => Ok(Decision::Allow),
        }
    }
}
