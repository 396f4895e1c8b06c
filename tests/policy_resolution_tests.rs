//! End-to-end resolution and enforcement tests: build the permission graph
//! through the repositories, then check what the resolver and the gate
//! decide.

use anyhow::Result;
use uuid::Uuid;

use rowguard::config::QuotaConfig;
use rowguard::engine::{GroupScope, PolicyResolver};
use rowguard::error::AuthzError;
use rowguard::gate::{Decision, EnforcementGate};
use rowguard::models::{Action, TenantType};
use rowguard::repositories::{GrantRepository, RoleRepository, TableTypeRepository};

#[path = "test_utils/mod.rs"]
mod test_utils;
use test_utils::{create_test_member, create_test_superuser, create_test_tenant, setup_test_db};

#[tokio::test]
async fn role_with_select_insert_resolves_and_authorizes() -> Result<()> {
    let db = setup_test_db().await?;
    let (tenant_id, group_id) = create_test_tenant(&db, "Acme", TenantType::Corporate).await?;
    let user_id = create_test_member(&db, tenant_id, group_id, "kit@acme.test").await?;

    let role = RoleRepository::new(&db)
        .create_role(tenant_id, "invoice-editor".to_string(), None)
        .await?;

    let table_type = TableTypeRepository::new(&db)
        .create_table_type("billing".to_string(), "invoice".to_string())
        .await?;
    let select_insert = table_type
        .permissions
        .iter()
        .find(|p| p.actions.len() == 2 && p.actions.contains(Action::Insert))
        .expect("ladder has a SELECT+INSERT rung");

    let grants = GrantRepository::new(&db);
    grants.grant(role.id, select_insert.id).await?;
    grants.assign(user_id, group_id, role.id).await?;

    let resolution = PolicyResolver::new(&db)
        .resolve(user_id, table_type.table_type.id)
        .await?;
    assert!(resolution.permits(Action::Select));
    assert!(resolution.permits(Action::Insert));
    assert!(!resolution.permits(Action::Update));
    assert!(!resolution.permits(Action::Delete));
    assert_eq!(
        resolution.groups,
        GroupScope::Groups([group_id].into_iter().collect())
    );

    let quotas = QuotaConfig::default();
    let gate = EnforcementGate::new(&db, &quotas);
    let access = gate
        .authorize(user_id, table_type.table_type.id, Action::Insert)
        .await?;
    assert_eq!(access.decision, Decision::Allow);
    assert!(access.groups.covers(group_id));

    let denied = gate
        .authorize(user_id, table_type.table_type.id, Action::Delete)
        .await?;
    assert_eq!(denied.decision, Decision::Deny);

    Ok(())
}

#[tokio::test]
async fn user_with_no_grants_is_denied_everything() -> Result<()> {
    let db = setup_test_db().await?;
    let (tenant_id, group_id) = create_test_tenant(&db, "Acme", TenantType::Corporate).await?;
    let user_id = create_test_member(&db, tenant_id, group_id, "kit@acme.test").await?;

    let table_type = TableTypeRepository::new(&db)
        .create_table_type("billing".to_string(), "invoice".to_string())
        .await?;

    let resolution = PolicyResolver::new(&db)
        .resolve(user_id, table_type.table_type.id)
        .await?;
    assert_eq!(resolution.groups, GroupScope::Groups(Default::default()));
    for action in Action::ALL {
        assert!(!resolution.permits(action));
    }

    Ok(())
}

#[tokio::test]
async fn superuser_short_circuits_to_full_access() -> Result<()> {
    let db = setup_test_db().await?;
    let root_id = create_test_superuser(&db, "root@rowguard.test").await?;

    let table_type = TableTypeRepository::new(&db)
        .create_table_type("billing".to_string(), "invoice".to_string())
        .await?;

    let resolution = PolicyResolver::new(&db)
        .resolve(root_id, table_type.table_type.id)
        .await?;
    assert!(resolution.groups.is_all());
    for action in Action::ALL {
        assert!(resolution.permits(action));
    }

    let quotas = QuotaConfig::default();
    let access = EnforcementGate::new(&db, &quotas)
        .authorize(root_id, table_type.table_type.id, Action::Delete)
        .await?;
    assert_eq!(access.decision, Decision::Allow);
    assert!(access.groups.is_all());

    Ok(())
}

#[tokio::test]
async fn multiple_roles_union_their_actions() -> Result<()> {
    let db = setup_test_db().await?;
    let (tenant_id, group_id) = create_test_tenant(&db, "Acme", TenantType::Corporate).await?;
    let user_id = create_test_member(&db, tenant_id, group_id, "kit@acme.test").await?;

    let roles = RoleRepository::new(&db);
    let reader = roles
        .create_role(tenant_id, "reader".to_string(), None)
        .await?;
    let updater = roles
        .create_role(tenant_id, "updater".to_string(), None)
        .await?;

    let table_type = TableTypeRepository::new(&db)
        .create_table_type("billing".to_string(), "invoice".to_string())
        .await?;
    let select_only = table_type
        .permissions
        .iter()
        .find(|p| p.actions.len() == 1)
        .expect("ladder has a SELECT rung");
    let select_update = table_type
        .permissions
        .iter()
        .find(|p| p.actions.len() == 2 && p.actions.contains(Action::Update))
        .expect("ladder has a SELECT+UPDATE rung");

    let grants = GrantRepository::new(&db);
    grants.grant(reader.id, select_only.id).await?;
    grants.grant(updater.id, select_update.id).await?;
    grants.assign(user_id, group_id, reader.id).await?;
    grants.assign(user_id, group_id, updater.id).await?;

    let resolution = PolicyResolver::new(&db)
        .resolve(user_id, table_type.table_type.id)
        .await?;
    assert!(resolution.permits(Action::Select));
    assert!(resolution.permits(Action::Update));
    assert!(!resolution.permits(Action::Insert));

    Ok(())
}

#[tokio::test]
async fn grants_for_other_tables_do_not_leak() -> Result<()> {
    let db = setup_test_db().await?;
    let (tenant_id, group_id) = create_test_tenant(&db, "Acme", TenantType::Corporate).await?;
    let user_id = create_test_member(&db, tenant_id, group_id, "kit@acme.test").await?;

    let role = RoleRepository::new(&db)
        .create_role(tenant_id, "invoice-admin".to_string(), None)
        .await?;

    let types = TableTypeRepository::new(&db);
    let invoice = types
        .create_table_type("billing".to_string(), "invoice".to_string())
        .await?;
    let customer = types
        .create_table_type("billing".to_string(), "customer".to_string())
        .await?;

    let full = invoice
        .permissions
        .iter()
        .find(|p| p.actions.len() == 4)
        .expect("ladder has a full rung");
    let grants = GrantRepository::new(&db);
    grants.grant(role.id, full.id).await?;
    grants.assign(user_id, group_id, role.id).await?;

    // Full access on invoice, nothing on customer
    let resolver = PolicyResolver::new(&db);
    let on_invoice = resolver.resolve(user_id, invoice.table_type.id).await?;
    assert!(on_invoice.permits(Action::Delete));

    let on_customer = resolver.resolve(user_id, customer.table_type.id).await?;
    for action in Action::ALL {
        assert!(!on_customer.permits(action));
    }
    assert_eq!(on_customer.groups, GroupScope::Groups(Default::default()));

    Ok(())
}

#[tokio::test]
async fn deactivated_user_loses_access_without_losing_grants() -> Result<()> {
    let db = setup_test_db().await?;
    let (tenant_id, group_id) = create_test_tenant(&db, "Acme", TenantType::Corporate).await?;
    let user_id = create_test_member(&db, tenant_id, group_id, "kit@acme.test").await?;

    let role = RoleRepository::new(&db)
        .create_role(tenant_id, "reader".to_string(), None)
        .await?;
    let table_type = TableTypeRepository::new(&db)
        .create_table_type("billing".to_string(), "invoice".to_string())
        .await?;
    let select_only = table_type
        .permissions
        .iter()
        .find(|p| p.actions.len() == 1)
        .expect("ladder has a SELECT rung");

    let grants = GrantRepository::new(&db);
    grants.grant(role.id, select_only.id).await?;
    grants.assign(user_id, group_id, role.id).await?;

    let quotas = QuotaConfig::default();
    let locks = rowguard::quota::TenantLocks::new();
    rowguard::repositories::UserRepository::new(&db, &quotas, &locks)
        .deactivate_user(user_id)
        .await?;

    let resolution = PolicyResolver::new(&db)
        .resolve(user_id, table_type.table_type.id)
        .await?;
    assert!(!resolution.permits(Action::Select));

    // The grant itself survives deactivation
    assert_eq!(grants.list_assignments(user_id).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn resolve_by_name_finds_the_table_type() -> Result<()> {
    let db = setup_test_db().await?;
    let root_id = create_test_superuser(&db, "root@rowguard.test").await?;

    TableTypeRepository::new(&db)
        .create_table_type("billing".to_string(), "invoice".to_string())
        .await?;

    let resolution = PolicyResolver::new(&db)
        .resolve_by_name(root_id, "billing", "invoice")
        .await?;
    assert!(resolution.groups.is_all());

    let missing = PolicyResolver::new(&db)
        .resolve_by_name(root_id, "billing", "nope")
        .await;
    assert!(matches!(missing, Err(AuthzError::NotFound { .. })));

    Ok(())
}

#[tokio::test]
async fn unknown_ids_are_not_found() -> Result<()> {
    let db = setup_test_db().await?;
    let (tenant_id, group_id) = create_test_tenant(&db, "Acme", TenantType::Corporate).await?;
    let user_id = create_test_member(&db, tenant_id, group_id, "kit@acme.test").await?;

    let resolver = PolicyResolver::new(&db);
    let result = resolver.resolve(Uuid::new_v4(), Uuid::new_v4()).await;
    assert!(matches!(result, Err(AuthzError::NotFound { .. })));

    let result = resolver.resolve(user_id, Uuid::new_v4()).await;
    assert!(matches!(result, Err(AuthzError::NotFound { .. })));

    Ok(())
}
