// SPDX-License-Identifier: MIT

//! Scope-based filtering of actions
//!
//! - `model` - actions and their typed scopes
//! - `context` - routes, visit coordinates and customer to filter against
//! - `condition` - expression tree, evaluator and SQL rendering
//! - `rules` - the four filter rules
//! - `specification` - rules bound to a context source
//! - `filter` - collection-level filtering
//! - `loader` - YAML/JSON input
//! - `report` - text listing of matches per rule

pub mod condition;
pub mod context;
pub mod filter;
pub mod loader;
pub mod model;
pub mod report;
pub mod rules;
pub mod specification;

pub use context::{ContextSource, FilterContext};
pub use model::{Action, Id, Scope, ScopeType};
pub use rules::Rule;
pub use specification::{ActionSpecification, Specification};
