//! # Error Handling
//!
//! Unified error taxonomy for the authorization engine. Authorization DENY
//! is a decision value, never an error; only structurally invalid input
//! (unknown ids, broken invariants) and store failures surface here.

use thiserror::Error;
use uuid::Uuid;

use crate::quota::Resource;

/// Errors surfaced by the repositories, resolver and gate.
#[derive(Debug, Error)]
pub enum AuthzError {
    /// A referenced entity does not exist. Surfaced to the caller, not
    /// retried.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A structural rule was broken; the operation is rejected.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// The tenant's resource cap is reached. Pre-flight form of the same
    /// condition a store-level constraint violation reports as [`AuthzError::Conflict`];
    /// callers must treat both identically.
    #[error("{resource} quota exceeded for tenant {tenant_id} (cap {cap})")]
    QuotaExceeded {
        tenant_id: Uuid,
        resource: Resource,
        cap: i32,
    },

    /// Malformed input (empty names, over-length fields).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A unique constraint rejected the write at commit time.
    #[error("resource already exists")]
    Conflict,

    /// Any other database failure.
    #[error("database error: {0}")]
    Database(sea_orm::DbErr),
}

impl AuthzError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl From<sea_orm::DbErr> for AuthzError {
    fn from(error: sea_orm::DbErr) -> Self {
        if is_unique_violation(&error) {
            tracing::debug!(?error, "Unique constraint violation detected");
            return Self::Conflict;
        }
        Self::Database(error)
    }
}

/// Detects unique-constraint violations across the supported backends so a
/// commit-time duplicate surfaces as [`AuthzError::Conflict`] rather than an
/// opaque database error.
fn is_unique_violation(error: &sea_orm::DbErr) -> bool {
    use sea_orm::RuntimeErr;

    const PG_UNIQUE: &str = "23505";
    const SQLITE_DUPLICATE_CODES: &[&str] = &["1555", "2067"];

    let runtime_err = match error {
        sea_orm::DbErr::Query(RuntimeErr::SqlxError(sqlx_err))
        | sea_orm::DbErr::Exec(RuntimeErr::SqlxError(sqlx_err)) => sqlx_err,
        _ => return false,
    };

    let Some(db_error) = runtime_err.as_database_error() else {
        return false;
    };

    if db_error.is_unique_violation() {
        return true;
    }

    if let Some(code) = db_error.code() {
        let code_str = code.as_ref();
        if code_str == PG_UNIQUE || SQLITE_DUPLICATE_CODES.contains(&code_str) {
            return true;
        }
    }

    false
}

pub type Result<T, E = AuthzError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_entity_and_id() {
        let id = Uuid::new_v4();
        let err = AuthzError::not_found("user", id);
        assert_eq!(err.to_string(), format!("user not found: {id}"));
    }

    #[test]
    fn quota_exceeded_message_names_resource_and_cap() {
        let tenant_id = Uuid::new_v4();
        let err = AuthzError::QuotaExceeded {
            tenant_id,
            resource: Resource::Groups,
            cap: 1,
        };
        assert!(err.to_string().contains("groups quota exceeded"));
        assert!(err.to_string().contains("cap 1"));
    }

    #[test]
    fn record_not_found_is_not_a_conflict() {
        let err: AuthzError = sea_orm::DbErr::RecordNotFound("x".to_string()).into();
        assert!(matches!(err, AuthzError::Database(_)));
    }
}
