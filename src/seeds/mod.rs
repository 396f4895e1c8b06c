//! Seeding functionality for bootstrapping the authorization data.

pub mod superuser;

pub use superuser::seed_superuser;
