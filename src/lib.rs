//! # Rowguard
//!
//! Multi-tenant authorization library: tenants, groups, roles and table
//! permissions, a deterministic policy resolver, and an enforcement gate
//! with per-tenant resource quotas.

pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod gate;
pub mod logging;
pub mod models;
pub mod quota;
pub mod repositories;
pub mod rlsgen;
pub mod seeds;
pub use migration;
