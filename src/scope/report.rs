// SPDX-License-Identifier: MIT

//! Plain-text listing of the actions each rule matches

use std::io::Write;

use super::context::ContextSource;
use super::model::Action;
use super::rules::Rule;
use super::specification::ActionSpecification;
use crate::error::ScopeFilterError;

/// Rules to run: all of them when none were requested, otherwise the
/// requested ones in order with repeats dropped
pub fn selected_rules(requested: &[Rule]) -> Vec<Rule> {
    if requested.is_empty() {
        return Rule::ALL.to_vec();
    }

    let mut rules: Vec<Rule> = Vec::with_capacity(requested.len());
    for rule in requested {
        if !rules.contains(rule) {
            rules.push(*rule);
        }
    }
    rules
}

/// Write matching action IDs one per line.
///
/// When more than one rule runs, each rule's IDs follow a `# <rule>` header.
pub fn write_matches<S: ContextSource, W: Write>(
    out: &mut W,
    specs: &ActionSpecification<S>,
    actions: &[Action],
    requested: &[Rule],
    parallel: bool,
) -> Result<(), ScopeFilterError> {
    let rules = selected_rules(requested);
    let with_headers = rules.len() > 1;

    for rule in rules {
        let spec = specs.specification(rule)?;
        let matched = if parallel {
            spec.par_filter(actions)
        } else {
            spec.filter(actions)
        };
        log::info!("Rule '{}' matched {} actions", rule, matched.len());

        if with_headers {
            writeln!(out, "# {}", rule)?;
        }
        for action in matched {
            writeln!(out, "{}", action.id)?;
        }
    }

    Ok(())
}
