// SPDX-License-Identifier: MIT

//! Collection-level filtering
//!
//! Results have set semantics: an action ID appears at most once, at the
//! position of its first matching occurrence.

use rayon::prelude::*;
use std::collections::HashSet;

use super::condition::{evaluate, Expression};
use super::model::{Action, Id};

/// Keep matching actions in input order
pub fn filter_actions<'a>(actions: &'a [Action], expr: &Expression) -> Vec<&'a Action> {
    let matched: Vec<&Action> = actions.iter().filter(|a| evaluate(expr, a)).collect();
    distinct(actions.len(), matched)
}

/// Same result as `filter_actions`, evaluated across the rayon pool
pub fn par_filter_actions<'a>(actions: &'a [Action], expr: &Expression) -> Vec<&'a Action> {
    let matched: Vec<&Action> = actions.par_iter().filter(|a| evaluate(expr, a)).collect();
    distinct(actions.len(), matched)
}

fn distinct(total: usize, matched: Vec<&Action>) -> Vec<&Action> {
    let mut seen: HashSet<Id> = HashSet::with_capacity(matched.len());
    let result: Vec<&Action> = matched.into_iter().filter(|a| seen.insert(a.id)).collect();
    log::debug!("Filtered {} actions down to {}", total, result.len());
    result
}
