//! # Repository Layer
//!
//! This module contains repository implementations that encapsulate SeaORM
//! operations for the authorization entities. Creation workflows that the
//! original schema drove through database triggers (tenant -> default
//! group, table type -> permission ladder) live here as explicit
//! transactional methods so the logic stays visible and testable.

pub mod grant;
pub mod group;
pub mod role;
pub mod table_type;
pub mod tenant;
pub mod user;

pub use grant::GrantRepository;
pub use group::GroupRepository;
pub use role::RoleRepository;
pub use table_type::TableTypeRepository;
pub use tenant::TenantRepository;
pub use user::UserRepository;
