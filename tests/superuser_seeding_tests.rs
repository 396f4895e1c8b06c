//! Tests for superuser seeding ensuring the bootstrap identity is created
//! exactly once.

use anyhow::Result;
use rowguard::config::SuperuserConfig;
use rowguard::seeds::seed_superuser;

#[path = "test_utils/mod.rs"]
mod test_utils;
use test_utils::setup_test_db;

#[tokio::test]
async fn seed_superuser_creates_the_configured_identity() -> Result<()> {
    let db = setup_test_db().await?;
    let config = SuperuserConfig {
        email: Some("admin@example.com".to_string()),
        handle: Some("admin".to_string()),
        full_name: Some("System Admin".to_string()),
    };

    let seeded = seed_superuser(&db, &config).await?.expect("seeded");
    assert!(seeded.is_superuser);
    assert!(!seeded.is_tenant_admin);
    assert!(seeded.tenant_id.is_none());
    assert!(seeded.default_group_id.is_none());
    assert_eq!(seeded.full_name, "System Admin");
    Ok(())
}

#[tokio::test]
async fn seeding_is_idempotent() -> Result<()> {
    let db = setup_test_db().await?;
    let config = SuperuserConfig {
        email: Some("admin@example.com".to_string()),
        handle: None,
        full_name: None,
    };

    let first = seed_superuser(&db, &config).await?.expect("seeded");
    // handle defaults to the email's local part
    assert_eq!(first.handle, "admin");

    let second = seed_superuser(&db, &config).await?.expect("found");
    assert_eq!(first.id, second.id);
    Ok(())
}

#[tokio::test]
async fn unconfigured_superuser_is_skipped() -> Result<()> {
    let db = setup_test_db().await?;
    let seeded = seed_superuser(&db, &SuperuserConfig::default()).await?;
    assert!(seeded.is_none());
    Ok(())
}
