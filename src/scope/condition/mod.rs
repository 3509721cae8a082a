// SPDX-License-Identifier: MIT

//! Scope conditions
//!
//! This module provides the expression tree the filter rules are built
//! from, plus two ways of consuming it:
//! - `evaluate` checks an in-memory `Action`
//! - `to_select` / `to_where_clause` render `EXISTS`-based SQL

mod ast;
mod evaluator;
mod sql;

pub use ast::{Expression, ScopeCondition, ValueMatch};
pub use evaluator::evaluate;
pub use sql::{to_select, to_where_clause, SqlSchema};
