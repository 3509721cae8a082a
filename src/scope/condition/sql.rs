// SPDX-License-Identifier: MIT

//! SQL rendering of scope conditions
//!
//! Each `Exists` becomes a correlated `EXISTS` subquery against the scope
//! table, so exclusions read as `NOT (EXISTS (...))` and every action is
//! selected at most once.

use std::fmt::Write;

use super::ast::{Expression, ScopeCondition, ValueMatch};
use crate::error::ScopeFilterError;

/// Table and column names used when rendering SQL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlSchema {
    action_table: String,
    action_id: String,
    scope_table: String,
    scope_action_id: String,
    scope_type_id: String,
    scope_value: String,
}

impl SqlSchema {
    /// Build a schema, rejecting anything that is not a plain identifier
    pub fn new(
        action_table: &str,
        action_id: &str,
        scope_table: &str,
        scope_action_id: &str,
        scope_type_id: &str,
        scope_value: &str,
    ) -> Result<Self, ScopeFilterError> {
        Ok(Self {
            action_table: identifier(action_table)?,
            action_id: identifier(action_id)?,
            scope_table: identifier(scope_table)?,
            scope_action_id: identifier(scope_action_id)?,
            scope_type_id: identifier(scope_type_id)?,
            scope_value: identifier(scope_value)?,
        })
    }
}

impl Default for SqlSchema {
    fn default() -> Self {
        Self {
            action_table: "action".to_string(),
            action_id: "id".to_string(),
            scope_table: "scope".to_string(),
            scope_action_id: "action_id".to_string(),
            scope_type_id: "scope_type_id".to_string(),
            scope_value: "value".to_string(),
        }
    }
}

/// Keywords that cannot be used as bare table or column names
const RESERVED: &str = "ALL ALTER AND ANY AS ASC BETWEEN BY CASE CHECK COLUMN CONSTRAINT CREATE \
     CROSS DEFAULT DELETE DESC DISTINCT DROP ELSE END EXCEPT EXISTS FALSE FOREIGN FROM FULL \
     GROUP HAVING IN INNER INSERT INTERSECT INTO IS JOIN LEFT LIKE LIMIT NOT NULL OFFSET ON OR \
     ORDER OUTER PRIMARY REFERENCES RIGHT SELECT SET TABLE THEN TO TRUE UNION UNIQUE UPDATE \
     USER USING VALUES WHEN WHERE WITH";

fn identifier(name: &str) -> Result<String, ScopeFilterError> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let plain = valid_start && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    let reserved = RESERVED
        .split_whitespace()
        .any(|kw| kw.eq_ignore_ascii_case(name));
    if plain && !reserved {
        Ok(name.to_string())
    } else {
        Err(ScopeFilterError::InvalidIdentifier(name.to_string()))
    }
}

/// Render the expression as a boolean SQL condition over alias `a`
pub fn to_where_clause(expr: &Expression, schema: &SqlSchema) -> String {
    let mut out = String::new();
    render(expr, schema, &mut out);
    out
}

/// Render a full `SELECT` of matching action IDs
pub fn to_select(expr: &Expression, schema: &SqlSchema) -> String {
    format!(
        "SELECT a.{} FROM {} a WHERE {}",
        schema.action_id,
        schema.action_table,
        to_where_clause(expr, schema)
    )
}

fn render(expr: &Expression, schema: &SqlSchema, out: &mut String) {
    match expr {
        Expression::True => out.push_str("1 = 1"),
        Expression::False => out.push_str("1 = 0"),
        Expression::Exists(cond) => render_exists(cond, schema, out),
        Expression::Not(inner) => {
            out.push_str("NOT (");
            render(inner, schema, out);
            out.push(')');
        }
        Expression::And(left, right) => render_binary(left, "AND", right, schema, out),
        Expression::Or(left, right) => render_binary(left, "OR", right, schema, out),
    }
}

fn render_binary(
    left: &Expression,
    op: &str,
    right: &Expression,
    schema: &SqlSchema,
    out: &mut String,
) {
    out.push('(');
    render(left, schema, out);
    let _ = write!(out, " {} ", op);
    render(right, schema, out);
    out.push(')');
}

fn render_exists(cond: &ScopeCondition, schema: &SqlSchema, out: &mut String) {
    if let ValueMatch::In(set) = &cond.value {
        if set.is_empty() {
            out.push_str("1 = 0");
            return;
        }
    }

    let _ = write!(
        out,
        "EXISTS (SELECT 1 FROM {table} s WHERE s.{fk} = a.{pk} AND s.{ty} = {code}",
        table = schema.scope_table,
        fk = schema.scope_action_id,
        pk = schema.action_id,
        ty = schema.scope_type_id,
        code = cond.scope_type.code(),
    );

    let col = &schema.scope_value;
    match &cond.value {
        ValueMatch::Any => {}
        ValueMatch::Eq(v) => {
            let _ = write!(out, " AND s.{} = {}", col, v);
        }
        ValueMatch::NotEq(v) => {
            let _ = write!(out, " AND s.{} <> {}", col, v);
        }
        ValueMatch::In(set) => {
            let items: Vec<String> = set.iter().map(|v| v.to_string()).collect();
            let _ = write!(out, " AND s.{} IN ({})", col, items.join(", "));
        }
    }
    out.push(')');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::model::ScopeType;
    use std::collections::BTreeSet;

    #[test]
    fn test_literals() {
        let schema = SqlSchema::default();
        assert_eq!(to_where_clause(&Expression::True, &schema), "1 = 1");
        assert_eq!(to_where_clause(&Expression::False, &schema), "1 = 0");
    }

    #[test]
    fn test_exists_any() {
        let expr = Expression::has(ScopeType::Customer);
        let sql = to_where_clause(&expr, &SqlSchema::default());
        assert_eq!(
            sql,
            "EXISTS (SELECT 1 FROM scope s WHERE s.action_id = a.id AND s.scope_type_id = 7)"
        );
    }

    #[test]
    fn test_in_is_sorted() {
        let ids = BTreeSet::from([3, 1, 2]);
        let expr = Expression::exists(ScopeType::Route, ValueMatch::In(ids));
        let sql = to_where_clause(&expr, &SqlSchema::default());
        assert!(sql.ends_with("s.scope_type_id = 5 AND s.value IN (1, 2, 3))"));
    }

    #[test]
    fn test_empty_in_is_false() {
        let expr = Expression::exists(ScopeType::Route, ValueMatch::In(BTreeSet::new()));
        assert_eq!(to_where_clause(&expr, &SqlSchema::default()), "1 = 0");
    }

    #[test]
    fn test_not_and_not_eq() {
        let placeholder = Expression::exists(ScopeType::VisitCoordinate, ValueMatch::NotEq(0));
        assert_eq!(
            to_where_clause(&placeholder.negate(), &SqlSchema::default()),
            "NOT (EXISTS (SELECT 1 FROM scope s WHERE s.action_id = a.id AND s.scope_type_id = 6 AND s.value <> 0))"
        );
    }

    #[test]
    fn test_select_with_custom_schema() {
        let schema = SqlSchema::new(
            "actions",
            "action_id",
            "action_scopes",
            "owner_id",
            "type_id",
            "val",
        )
        .unwrap();
        let sql = to_select(
            &Expression::exists(ScopeType::Customer, ValueMatch::Eq(42)),
            &schema,
        );
        assert_eq!(
            sql,
            "SELECT a.action_id FROM actions a WHERE EXISTS (SELECT 1 FROM action_scopes s \
             WHERE s.owner_id = a.action_id AND s.type_id = 7 AND s.val = 42)"
        );
    }

    #[test]
    fn test_invalid_identifier_rejected() {
        let result = SqlSchema::new("action; DROP TABLE x", "id", "scope", "a", "b", "c");
        let err = result.unwrap_err();
        assert!(matches!(err, ScopeFilterError::InvalidIdentifier(_)));
        assert!(SqlSchema::new("", "id", "scope", "a", "b", "c").is_err());
        assert!(SqlSchema::new("1action", "id", "scope", "a", "b", "c").is_err());
    }

    #[test]
    fn test_reserved_keyword_rejected() {
        let result = SqlSchema::new("select", "id", "scope", "a", "b", "c");
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "Invalid SQL identifier: 'select'");
        assert!(SqlSchema::new("action", "id", "Order", "a", "b", "c").is_err());
        assert!(SqlSchema::new("action", "id", "scope", "a", "b", "WHERE").is_err());

        // keywords only match whole names
        assert!(SqlSchema::new("selection", "id", "orders", "a", "b", "value").is_ok());
    }

    #[test]
    fn test_binary_parenthesized() {
        let expr = Expression::True.or(Expression::False).and(Expression::True);
        assert_eq!(
            to_where_clause(&expr, &SqlSchema::default()),
            "((1 = 1 OR 1 = 0) AND 1 = 1)"
        );
    }
}
