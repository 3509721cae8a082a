// SPDX-License-Identifier: MIT

//! Abstract Syntax Tree for scope conditions

use std::collections::BTreeSet;
use std::fmt;

use crate::scope::model::{Id, ScopeType};

/// A condition expression over an action's scopes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    /// At least one scope satisfies the condition
    Exists(ScopeCondition),
    /// Logical AND
    And(Box<Expression>, Box<Expression>),
    /// Logical OR
    Or(Box<Expression>, Box<Expression>),
    /// Logical NOT
    Not(Box<Expression>),
    /// Literal true
    True,
    /// Literal false
    False,
}

/// Matches a single scope by type code and value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeCondition {
    pub scope_type: ScopeType,
    pub value: ValueMatch,
}

/// Constraint on a scope's value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueMatch {
    /// Any value
    Any,
    /// ==
    Eq(Id),
    /// !=
    NotEq(Id),
    /// value in set; an empty set never matches
    In(BTreeSet<Id>),
}

impl ValueMatch {
    pub fn matches(&self, value: Id) -> bool {
        match self {
            ValueMatch::Any => true,
            ValueMatch::Eq(v) => value == *v,
            ValueMatch::NotEq(v) => value != *v,
            ValueMatch::In(set) => set.contains(&value),
        }
    }
}

impl Expression {
    /// `exists(scope_type <value>)`
    pub fn exists(scope_type: ScopeType, value: ValueMatch) -> Self {
        Expression::Exists(ScopeCondition { scope_type, value })
    }

    /// `exists(scope_type)` with any value
    pub fn has(scope_type: ScopeType) -> Self {
        Self::exists(scope_type, ValueMatch::Any)
    }

    pub fn and(self, other: Expression) -> Self {
        Expression::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Expression) -> Self {
        Expression::Or(Box::new(self), Box::new(other))
    }

    pub fn negate(self) -> Self {
        Expression::Not(Box::new(self))
    }

    fn is_atom(&self) -> bool {
        matches!(
            self,
            Expression::Exists(_) | Expression::True | Expression::False | Expression::Not(_)
        )
    }
}

impl fmt::Display for ValueMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueMatch::Any => Ok(()),
            ValueMatch::Eq(v) => write!(f, " == {}", v),
            ValueMatch::NotEq(v) => write!(f, " != {}", v),
            ValueMatch::In(set) => {
                let items: Vec<String> = set.iter().map(|v| v.to_string()).collect();
                write!(f, " in {{{}}}", items.join(", "))
            }
        }
    }
}

impl fmt::Display for ScopeCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "exists({}{})", self.scope_type, self.value)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::True => write!(f, "true"),
            Expression::False => write!(f, "false"),
            Expression::Exists(cond) => write!(f, "{}", cond),
            Expression::Not(inner) => match inner.as_ref() {
                Expression::And(..) | Expression::Or(..) => write!(f, "not ({})", inner),
                _ => write!(f, "not {}", inner),
            },
            Expression::And(left, right) => {
                write_operand(f, left, |e| matches!(e, Expression::Or(..)))?;
                write!(f, " and ")?;
                write_operand(f, right, |e| matches!(e, Expression::Or(..)))
            }
            Expression::Or(left, right) => {
                write_operand(f, left, |e| matches!(e, Expression::And(..)))?;
                write!(f, " or ")?;
                write_operand(f, right, |e| matches!(e, Expression::And(..)))
            }
        }
    }
}

fn write_operand(
    f: &mut fmt::Formatter<'_>,
    expr: &Expression,
    needs_parens: impl Fn(&Expression) -> bool,
) -> fmt::Result {
    if !expr.is_atom() && needs_parens(expr) {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_match() {
        assert!(ValueMatch::Any.matches(0));
        assert!(ValueMatch::Eq(3).matches(3));
        assert!(!ValueMatch::Eq(3).matches(4));
        assert!(ValueMatch::NotEq(0).matches(5));
        assert!(!ValueMatch::NotEq(0).matches(0));
        assert!(ValueMatch::In(BTreeSet::from([1, 2])).matches(2));
        assert!(!ValueMatch::In(BTreeSet::new()).matches(2));
    }

    #[test]
    fn test_display_exists() {
        assert_eq!(
            Expression::has(ScopeType::Customer).to_string(),
            "exists(customer)"
        );
        let routes = Expression::exists(ScopeType::Route, ValueMatch::In(BTreeSet::from([2, 1])));
        assert_eq!(routes.to_string(), "exists(route in {1, 2})");
        assert_eq!(
            Expression::exists(ScopeType::Customer, ValueMatch::Eq(42)).to_string(),
            "exists(customer == 42)"
        );
    }

    #[test]
    fn test_display_nested() {
        let route = Expression::exists(ScopeType::Route, ValueMatch::In(BTreeSet::from([1])));
        let placeholder = Expression::exists(ScopeType::VisitCoordinate, ValueMatch::NotEq(0));
        let excluded = Expression::has(ScopeType::Customer).or(placeholder);
        let expr = route.and(excluded.negate());
        assert_eq!(
            expr.to_string(),
            "exists(route in {1}) and not (exists(customer) or exists(visit_coordinate != 0))"
        );
    }

    #[test]
    fn test_display_or_inside_and_is_parenthesized() {
        let expr = Expression::has(ScopeType::Route)
            .or(Expression::has(ScopeType::VisitCoordinate))
            .and(Expression::True);
        assert_eq!(
            expr.to_string(),
            "(exists(route) or exists(visit_coordinate)) and true"
        );
    }
}
