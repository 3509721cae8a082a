// SPDX-License-Identifier: MIT

//! In-memory condition evaluator

use super::ast::{Expression, ScopeCondition};
use crate::scope::model::Action;

/// Evaluate a condition expression against an action
pub fn evaluate(expr: &Expression, action: &Action) -> bool {
    match expr {
        Expression::True => true,
        Expression::False => false,
        Expression::Exists(cond) => any_scope_matches(cond, action),
        Expression::And(left, right) => evaluate(left, action) && evaluate(right, action),
        Expression::Or(left, right) => evaluate(left, action) || evaluate(right, action),
        Expression::Not(inner) => !evaluate(inner, action),
    }
}

fn any_scope_matches(cond: &ScopeCondition, action: &Action) -> bool {
    action
        .scopes_of(cond.scope_type)
        .any(|scope| cond.value.matches(scope.value))
}
