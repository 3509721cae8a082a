// SPDX-License-Identifier: MIT

//! The four scope filter rules
//!
//! Every rule short-circuits to `Expression::False` when the context it
//! depends on is empty. Exclusions are existential: an action is excluded
//! when *some* scope triggers the exclusion.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::condition::{evaluate, Expression, ValueMatch};
use super::context::FilterContext;
use super::model::{Action, Id, ScopeType};

/// Named filter rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    /// Route or visit-coordinate match, unless customer-scoped
    VisitCoordinatesAndRoutes,
    /// Route match, unless customer-scoped or tied to a non-zero visit coordinate
    Routes,
    /// Visit-coordinate match, unless customer- or route-scoped
    VisitCoordinates,
    /// Customer match
    Customer,
}

impl Rule {
    pub const ALL: [Rule; 4] = [
        Rule::VisitCoordinatesAndRoutes,
        Rule::Routes,
        Rule::VisitCoordinates,
        Rule::Customer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Rule::VisitCoordinatesAndRoutes => "visit-coordinates-and-routes",
            Rule::Routes => "routes",
            Rule::VisitCoordinates => "visit-coordinates",
            Rule::Customer => "customer",
        }
    }

    /// Build the rule's expression for a materialized context
    pub fn build(self, ctx: &FilterContext) -> Expression {
        match self {
            Rule::VisitCoordinatesAndRoutes => {
                visit_coordinates_and_routes(&ctx.route_ids, &ctx.visit_coordinate_ids)
            }
            Rule::Routes => routes(&ctx.route_ids),
            Rule::VisitCoordinates => visit_coordinates(&ctx.visit_coordinate_ids),
            Rule::Customer => customer(ctx.customer_id),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn one_of(ids: &BTreeSet<Id>) -> ValueMatch {
    ValueMatch::In(ids.clone())
}

/// Customer scoping takes precedence over route and visit-coordinate scoping
pub fn visit_coordinates_and_routes(
    route_ids: &BTreeSet<Id>,
    visit_coordinate_ids: &BTreeSet<Id>,
) -> Expression {
    if route_ids.is_empty() || visit_coordinate_ids.is_empty() {
        return Expression::False;
    }

    Expression::exists(ScopeType::Route, one_of(route_ids))
        .or(Expression::exists(
            ScopeType::VisitCoordinate,
            one_of(visit_coordinate_ids),
        ))
        .and(Expression::has(ScopeType::Customer).negate())
}

/// A visit-coordinate scope with value 0 is a placeholder and does not exclude
pub fn routes(route_ids: &BTreeSet<Id>) -> Expression {
    if route_ids.is_empty() {
        return Expression::False;
    }

    Expression::exists(ScopeType::Route, one_of(route_ids)).and(
        Expression::has(ScopeType::Customer)
            .or(Expression::exists(
                ScopeType::VisitCoordinate,
                ValueMatch::NotEq(0),
            ))
            .negate(),
    )
}

pub fn visit_coordinates(visit_coordinate_ids: &BTreeSet<Id>) -> Expression {
    if visit_coordinate_ids.is_empty() {
        return Expression::False;
    }

    Expression::exists(ScopeType::VisitCoordinate, one_of(visit_coordinate_ids)).and(
        Expression::has(ScopeType::Customer)
            .or(Expression::has(ScopeType::Route))
            .negate(),
    )
}

pub fn customer(customer_id: Option<Id>) -> Expression {
    match customer_id {
        Some(id) => Expression::exists(ScopeType::Customer, ValueMatch::Eq(id)),
        None => Expression::False,
    }
}

pub fn by_visit_coordinates_and_routes(
    action: &Action,
    route_ids: &BTreeSet<Id>,
    visit_coordinate_ids: &BTreeSet<Id>,
) -> bool {
    evaluate(
        &visit_coordinates_and_routes(route_ids, visit_coordinate_ids),
        action,
    )
}

pub fn by_routes(action: &Action, route_ids: &BTreeSet<Id>) -> bool {
    evaluate(&routes(route_ids), action)
}

pub fn by_visit_coordinates(action: &Action, visit_coordinate_ids: &BTreeSet<Id>) -> bool {
    evaluate(&visit_coordinates(visit_coordinate_ids), action)
}

pub fn by_customer(action: &Action, customer_id: Option<Id>) -> bool {
    evaluate(&customer(customer_id), action)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[Id]) -> BTreeSet<Id> {
        values.iter().copied().collect()
    }

    #[test]
    fn test_empty_context_never_matches() {
        let action = Action::new(1)
            .with_scope(5, 1)
            .with_scope(6, 1)
            .with_scope(7, 1);
        let none = BTreeSet::new();

        assert!(!by_visit_coordinates_and_routes(&action, &none, &ids(&[1])));
        assert!(!by_visit_coordinates_and_routes(&action, &ids(&[1]), &none));
        assert!(!by_routes(&action, &none));
        assert!(!by_visit_coordinates(&action, &none));
        assert!(!by_customer(&action, None));
    }

    #[test]
    fn test_customer_scope() {
        let action = Action::new(1).with_scope(7, 42);

        assert!(by_customer(&action, Some(42)));
        assert!(!by_customer(&action, Some(99)));
        assert!(!by_visit_coordinates_and_routes(
            &action,
            &ids(&[42]),
            &ids(&[42])
        ));
    }

    #[test]
    fn test_customer_excludes_combined_rule_despite_route_match() {
        let action = Action::new(1).with_scope(5, 10).with_scope(7, 3);
        assert!(!by_visit_coordinates_and_routes(
            &action,
            &ids(&[10]),
            &ids(&[20])
        ));
    }

    #[test]
    fn test_routes_zero_visit_coordinate_exception() {
        let action = Action::new(1).with_scope(5, 10);
        assert!(by_routes(&action, &ids(&[10])));

        let with_placeholder = action.clone().with_scope(6, 0);
        assert!(by_routes(&with_placeholder, &ids(&[10])));

        let with_coordinate = action.with_scope(6, 5);
        assert!(!by_routes(&with_coordinate, &ids(&[10])));
    }

    #[test]
    fn test_routes_excluded_by_customer() {
        let action = Action::new(1).with_scope(5, 10).with_scope(7, 1);
        assert!(!by_routes(&action, &ids(&[10])));
    }

    #[test]
    fn test_routes_requires_route_in_set() {
        let action = Action::new(1).with_scope(5, 11);
        assert!(!by_routes(&action, &ids(&[10])));
    }

    #[test]
    fn test_visit_coordinates_excluded_by_any_route() {
        let action = Action::new(1).with_scope(6, 30);
        assert!(by_visit_coordinates(&action, &ids(&[30])));

        // no zero-value exception here
        let with_route = action.clone().with_scope(5, 0);
        assert!(!by_visit_coordinates(&with_route, &ids(&[30])));

        let with_customer = action.with_scope(7, 8);
        assert!(!by_visit_coordinates(&with_customer, &ids(&[30])));
    }

    #[test]
    fn test_combined_rule_route_only() {
        let action = Action::new(1).with_scope(5, 10);
        assert!(by_visit_coordinates_and_routes(
            &action,
            &ids(&[10]),
            &ids(&[20])
        ));
    }

    #[test]
    fn test_combined_rule_visit_coordinate_only() {
        let action = Action::new(1).with_scope(6, 20);
        assert!(by_visit_coordinates_and_routes(
            &action,
            &ids(&[10]),
            &ids(&[20])
        ));
        assert!(!by_visit_coordinates_and_routes(
            &action,
            &ids(&[10]),
            &ids(&[21])
        ));
    }

    #[test]
    fn test_action_without_scopes_matches_nothing() {
        let action = Action::new(1);
        let set = ids(&[0, 1]);
        assert!(!by_visit_coordinates_and_routes(&action, &set, &set));
        assert!(!by_routes(&action, &set));
        assert!(!by_visit_coordinates(&action, &set));
        assert!(!by_customer(&action, Some(0)));
    }

    #[test]
    fn test_unknown_scope_types_ignored() {
        let action = Action::new(1)
            .with_scope(5, 10)
            .with_scope(0, 3)
            .with_scope(12, 4);
        assert!(by_routes(&action, &ids(&[10])));
        assert!(!by_routes(&Action::new(2).with_scope(12, 10), &ids(&[10])));
    }

    #[test]
    fn test_idempotent() {
        let action = Action::new(1).with_scope(5, 10).with_scope(6, 0);
        let routes = ids(&[10]);
        let first = by_routes(&action, &routes);
        let second = by_routes(&action, &routes);
        assert_eq!(first, second);
    }

    #[test]
    fn test_rule_build_matches_free_functions() {
        let ctx = FilterContext::new()
            .with_routes([10])
            .with_visit_coordinates([20])
            .with_customer(7);
        assert_eq!(Rule::Routes.build(&ctx), routes(&ctx.route_ids));
        assert_eq!(Rule::Customer.build(&ctx), customer(Some(7)));
        assert_eq!(
            Rule::VisitCoordinates.build(&FilterContext::new()),
            Expression::False
        );
    }

    #[test]
    fn test_rule_names() {
        assert_eq!(
            Rule::VisitCoordinatesAndRoutes.to_string(),
            "visit-coordinates-and-routes"
        );
        let rule: Rule = serde_yaml::from_str("visit-coordinates").unwrap();
        assert_eq!(rule, Rule::VisitCoordinates);
        assert_eq!(Rule::from_str("routes", false), Ok(Rule::Routes));
    }
}
