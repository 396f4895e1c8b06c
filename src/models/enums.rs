//! Canonical enums of the authorization schema.
//!
//! `TenantType` drives quota caps; `Action` and `ActionSet` encode what a
//! table permission rung grants. Action sets are stored as JSON arrays so
//! the same column type works on every supported backend.

use std::collections::BTreeSet;
use std::fmt;

use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Tenant classification; each variant maps to a row cap per resource.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TenantType {
    #[sea_orm(string_value = "INDIVIDUAL")]
    Individual,
    #[sea_orm(string_value = "SMALL_BUSINESS")]
    SmallBusiness,
    #[sea_orm(string_value = "CORPORATE")]
    Corporate,
    #[sea_orm(string_value = "ENTERPRISE")]
    Enterprise,
}

impl fmt::Display for TenantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TenantType::Individual => "INDIVIDUAL",
            TenantType::SmallBusiness => "SMALL_BUSINESS",
            TenantType::Corporate => "CORPORATE",
            TenantType::Enterprise => "ENTERPRISE",
        };
        f.write_str(s)
    }
}

/// A SQL operation a permission rung can grant.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Select,
    Insert,
    Update,
    Delete,
}

impl Action {
    /// Every action, in canonical order.
    pub const ALL: [Action; 4] = [Action::Select, Action::Insert, Action::Update, Action::Delete];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Select => "SELECT",
            Action::Insert => "INSERT",
            Action::Update => "UPDATE",
            Action::Delete => "DELETE",
        };
        f.write_str(s)
    }
}

/// A deduplicated, canonically ordered set of actions, stored as a JSON
/// array column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct ActionSet(Vec<Action>);

impl ActionSet {
    /// Builds a set from any action list, deduplicating and ordering it.
    pub fn new(actions: impl IntoIterator<Item = Action>) -> Self {
        let set: BTreeSet<Action> = actions.into_iter().collect();
        Self(set.into_iter().collect())
    }

    /// The five canonical rungs seeded for every table type, from
    /// read-only up to full access. Every rung includes SELECT.
    pub fn ladder() -> [ActionSet; 5] {
        [
            ActionSet::new([Action::Select]),
            ActionSet::new([Action::Select, Action::Insert]),
            ActionSet::new([Action::Select, Action::Update]),
            ActionSet::new([Action::Select, Action::Insert, Action::Update]),
            ActionSet::new([Action::Select, Action::Insert, Action::Update, Action::Delete]),
        ]
    }

    pub fn contains(&self, action: Action) -> bool {
        self.0.contains(&action)
    }

    pub fn iter(&self) -> impl Iterator<Item = Action> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ActionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for action in &self.0 {
            if !first {
                f.write_str(",")?;
            }
            write!(f, "{action}")?;
            first = false;
        }
        Ok(())
    }
}
