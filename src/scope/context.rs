// SPDX-License-Identifier: MIT

//! Filtering context: the routes, visit coordinates and customer an action
//! is matched against.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::model::Id;
use crate::error::ScopeFilterError;

/// Synchronous lookup of the filtering context.
///
/// Implementations typically front a data service; lookups happen once
/// per specification being built.
pub trait ContextSource: Send + Sync {
    /// IDs of the routes in scope (empty means none)
    fn route_ids(&self) -> Result<BTreeSet<Id>, ScopeFilterError>;

    /// IDs of the visit coordinates in scope (empty means none)
    fn visit_coordinate_ids(&self) -> Result<BTreeSet<Id>, ScopeFilterError>;

    /// The current customer, if any
    fn customer_id(&self) -> Result<Option<Id>, ScopeFilterError>;
}

/// A fully materialized context
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterContext {
    #[serde(default)]
    pub route_ids: BTreeSet<Id>,
    #[serde(default)]
    pub visit_coordinate_ids: BTreeSet<Id>,
    #[serde(default)]
    pub customer_id: Option<Id>,
}

impl FilterContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_routes(mut self, ids: impl IntoIterator<Item = Id>) -> Self {
        self.route_ids.extend(ids);
        self
    }

    pub fn with_visit_coordinates(mut self, ids: impl IntoIterator<Item = Id>) -> Self {
        self.visit_coordinate_ids.extend(ids);
        self
    }

    pub fn with_customer(mut self, id: Id) -> Self {
        self.customer_id = Some(id);
        self
    }

    /// Materialize a context from any source
    pub fn from_source<S: ContextSource + ?Sized>(source: &S) -> Result<Self, ScopeFilterError> {
        Ok(Self {
            route_ids: source.route_ids()?,
            visit_coordinate_ids: source.visit_coordinate_ids()?,
            customer_id: source.customer_id()?,
        })
    }
}

impl ContextSource for FilterContext {
    fn route_ids(&self) -> Result<BTreeSet<Id>, ScopeFilterError> {
        Ok(self.route_ids.clone())
    }

    fn visit_coordinate_ids(&self) -> Result<BTreeSet<Id>, ScopeFilterError> {
        Ok(self.visit_coordinate_ids.clone())
    }

    fn customer_id(&self) -> Result<Option<Id>, ScopeFilterError> {
        Ok(self.customer_id)
    }
}
