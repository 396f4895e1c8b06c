//! # Entity Models
//!
//! This module contains the SeaORM entity models for the authorization
//! schema: identity/tenancy tables, the permission tables, and their
//! association tables, plus the canonical enums shared across them.

pub mod enums;
pub mod group;
pub mod role;
pub mod role_table_permission;
pub mod table_permission;
pub mod table_type;
pub mod tenant;
pub mod user;
pub mod user_group_role;

pub use enums::{Action, ActionSet, TenantType};
