// SPDX-License-Identifier: MIT

//! Action and scope data model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier shared by actions, routes, visit coordinates and customers
pub type Id = i64;

/// Scope type codes that participate in filtering.
///
/// Any other `scope_type_id` (including `0`) is unscoped and ignored by
/// every rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeType {
    Route = 5,
    VisitCoordinate = 6,
    Customer = 7,
}

impl ScopeType {
    /// Numeric code as stored on a scope
    pub fn code(self) -> i64 {
        self as i64
    }

    /// Map a raw code to a known scope type
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            5 => Some(ScopeType::Route),
            6 => Some(ScopeType::VisitCoordinate),
            7 => Some(ScopeType::Customer),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScopeType::Route => "route",
            ScopeType::VisitCoordinate => "visit_coordinate",
            ScopeType::Customer => "customer",
        }
    }
}

impl fmt::Display for ScopeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed tag attached to an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    /// Raw type code; unknown codes are kept as-is
    pub scope_type_id: i64,
    pub value: Id,
}

impl Scope {
    pub fn new(scope_type_id: i64, value: Id) -> Self {
        Self {
            scope_type_id,
            value,
        }
    }

    pub fn scope_type(&self) -> Option<ScopeType> {
        ScopeType::from_code(self.scope_type_id)
    }

    pub fn is(&self, scope_type: ScopeType) -> bool {
        self.scope_type_id == scope_type.code()
    }
}

/// The entity being filtered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub id: Id,
    #[serde(default)]
    pub scopes: Vec<Scope>,
}

impl Action {
    pub fn new(id: Id) -> Self {
        Self { id, scopes: vec![] }
    }

    /// Builder-style helper to attach a scope
    pub fn with_scope(mut self, scope_type_id: i64, value: Id) -> Self {
        self.scopes.push(Scope::new(scope_type_id, value));
        self
    }

    /// Scopes of the given type
    pub fn scopes_of(&self, scope_type: ScopeType) -> impl Iterator<Item = &Scope> {
        self.scopes.iter().filter(move |s| s.is(scope_type))
    }
}
