// SPDX-License-Identifier: MIT

//! Specifications: filter rules bound to a context source

use super::condition::{evaluate, to_select, Expression, SqlSchema};
use super::context::{ContextSource, FilterContext};
use super::filter::{filter_actions, par_filter_actions};
use super::model::Action;
use super::rules::{self, Rule};
use crate::error::ScopeFilterError;

/// A rule with its context resolved into an expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specification {
    pub rule: Rule,
    pub expression: Expression,
}

impl Specification {
    pub fn new(rule: Rule, expression: Expression) -> Self {
        Self { rule, expression }
    }

    /// Build directly from a materialized context
    pub fn for_context(rule: Rule, ctx: &FilterContext) -> Self {
        Self::new(rule, rule.build(ctx))
    }

    pub fn matches(&self, action: &Action) -> bool {
        evaluate(&self.expression, action)
    }

    pub fn filter<'a>(&self, actions: &'a [Action]) -> Vec<&'a Action> {
        filter_actions(actions, &self.expression)
    }

    pub fn par_filter<'a>(&self, actions: &'a [Action]) -> Vec<&'a Action> {
        par_filter_actions(actions, &self.expression)
    }

    pub fn to_sql(&self, schema: &SqlSchema) -> String {
        to_select(&self.expression, schema)
    }

    /// True when the rule short-circuited on empty context
    pub fn is_never(&self) -> bool {
        self.expression == Expression::False
    }
}

/// Builds specifications for the `Action` entity, looking up context from
/// the given source each time a specification is requested.
pub struct ActionSpecification<S: ContextSource> {
    source: S,
}

impl<S: ContextSource> ActionSpecification<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn specification(&self, rule: Rule) -> Result<Specification, ScopeFilterError> {
        match rule {
            Rule::VisitCoordinatesAndRoutes => self.by_visit_coordinates_and_routes(),
            Rule::Routes => self.by_routes(),
            Rule::VisitCoordinates => self.by_visit_coordinates(),
            Rule::Customer => self.by_customer(),
        }
    }

    /// Actions scoped to a known route or visit coordinate and not to a customer
    pub fn by_visit_coordinates_and_routes(&self) -> Result<Specification, ScopeFilterError> {
        let rule = Rule::VisitCoordinatesAndRoutes;

        let route_ids = self.source.route_ids()?;
        if route_ids.is_empty() {
            return Ok(never(rule, "routes"));
        }

        let visit_coordinate_ids = self.source.visit_coordinate_ids()?;
        if visit_coordinate_ids.is_empty() {
            return Ok(never(rule, "visit coordinates"));
        }

        Ok(built(
            rule,
            rules::visit_coordinates_and_routes(&route_ids, &visit_coordinate_ids),
        ))
    }

    /// Actions scoped only to routes (a zero visit coordinate is allowed)
    pub fn by_routes(&self) -> Result<Specification, ScopeFilterError> {
        let rule = Rule::Routes;

        let route_ids = self.source.route_ids()?;
        if route_ids.is_empty() {
            return Ok(never(rule, "routes"));
        }

        Ok(built(rule, rules::routes(&route_ids)))
    }

    /// Actions scoped only to visit coordinates
    pub fn by_visit_coordinates(&self) -> Result<Specification, ScopeFilterError> {
        let rule = Rule::VisitCoordinates;

        let visit_coordinate_ids = self.source.visit_coordinate_ids()?;
        if visit_coordinate_ids.is_empty() {
            return Ok(never(rule, "visit coordinates"));
        }

        Ok(built(rule, rules::visit_coordinates(&visit_coordinate_ids)))
    }

    /// Actions scoped to the current customer
    pub fn by_customer(&self) -> Result<Specification, ScopeFilterError> {
        let rule = Rule::Customer;

        match self.source.customer_id()? {
            Some(id) => Ok(built(rule, rules::customer(Some(id)))),
            None => Ok(never(rule, "customer")),
        }
    }
}

fn never(rule: Rule, missing: &str) -> Specification {
    log::debug!("No {} in context, '{}' matches nothing", missing, rule);
    Specification::new(rule, Expression::False)
}

fn built(rule: Rule, expression: Expression) -> Specification {
    log::trace!("Built '{}': {}", rule, expression);
    Specification::new(rule, expression)
}
