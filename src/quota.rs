//! Tenant resource quotas.
//!
//! Caps come from [`QuotaConfig`] per tenant type; a cap <= 0 means
//! unlimited and the `enforce_quotas` flag disables enforcement entirely.
//! The check-then-insert race is closed with an advisory lock per tenant:
//! creation paths hold the tenant's lock across the count and the insert,
//! both inside one transaction.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, PaginatorTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use tokio::sync::OwnedMutexGuard;
use uuid::Uuid;

use crate::config::QuotaConfig;
use crate::error::Result;
use crate::models::{TenantType, group, user};

/// The resource kinds a tenant cap applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Resource {
    Groups,
    Users,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Groups => f.write_str("groups"),
            Resource::Users => f.write_str("users"),
        }
    }
}

/// Counts the tenant's existing resources of the given kind.
pub async fn count_resource<C: ConnectionTrait>(
    conn: &C,
    tenant_id: Uuid,
    resource: Resource,
) -> Result<u64> {
    let count = match resource {
        Resource::Groups => {
            group::Entity::find()
                .filter(group::Column::TenantId.eq(tenant_id))
                .count(conn)
                .await?
        }
        Resource::Users => {
            user::Entity::find()
                .filter(user::Column::TenantId.eq(tenant_id))
                .count(conn)
                .await?
        }
    };
    Ok(count)
}

/// Returns the violated cap when the tenant is at or over its limit, or
/// `None` when creation may proceed.
pub fn exceeded_cap(
    quotas: &QuotaConfig,
    tenant_type: TenantType,
    resource: Resource,
    current: u64,
) -> Option<i32> {
    if !quotas.enforce_quotas {
        return None;
    }
    let cap = quotas.cap_for(tenant_type, resource);
    if cap > 0 && current >= cap as u64 {
        Some(cap)
    } else {
        None
    }
}

/// Advisory locks keyed by tenant id.
///
/// Serializes quota-guarded creations for the same tenant within this
/// process. Multi-process deployments additionally rely on the store's
/// unique constraints; those violations surface as `Conflict`.
#[derive(Default)]
pub struct TenantLocks {
    inner: Mutex<HashMap<Uuid, Arc<tokio::sync::Mutex<()>>>>,
}

impl TenantLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock for one tenant, creating it on first use. The
    /// guard must be held until the guarded transaction commits.
    pub async fn acquire(&self, tenant_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            map.entry(tenant_id)
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}
