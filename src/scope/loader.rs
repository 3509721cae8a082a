// SPDX-License-Identifier: MIT

//! Data loader - YAML/JSON loading of actions and filter contexts

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::context::FilterContext;
use super::model::Action;
use crate::error::ScopeFilterError;

/// An actions file is either a bare list or wrapped in `actions:`
#[derive(Deserialize)]
#[serde(untagged)]
enum ActionsDocument {
    List(Vec<Action>),
    Wrapped { actions: Vec<Action> },
}

impl From<ActionsDocument> for Vec<Action> {
    fn from(doc: ActionsDocument) -> Self {
        match doc {
            ActionsDocument::List(actions) => actions,
            ActionsDocument::Wrapped { actions } => actions,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Json,
}

impl Format {
    fn from_path(path: &Path) -> Result<Self, ScopeFilterError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            Some("json") => Ok(Format::Json),
            _ => Err(ScopeFilterError::unsupported_format(
                path.display().to_string(),
            )),
        }
    }

    fn parse<T: DeserializeOwned>(self, content: &str) -> Result<T, ScopeFilterError> {
        match self {
            Format::Yaml => Ok(serde_yaml::from_str(content)?),
            Format::Json => Ok(serde_json::from_str(content)?),
        }
    }
}

/// Loads actions and contexts from YAML or JSON files
pub struct DataLoader;

impl DataLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load actions, picking the format from the file extension
    pub fn load_actions<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Action>, ScopeFilterError> {
        let doc: ActionsDocument = Self::load(path.as_ref())?;
        let actions: Vec<Action> = doc.into();
        log::info!(
            "Loaded {} actions from {}",
            actions.len(),
            path.as_ref().display()
        );
        Ok(actions)
    }

    /// Load a filter context, picking the format from the file extension
    pub fn load_context<P: AsRef<Path>>(&self, path: P) -> Result<FilterContext, ScopeFilterError> {
        let ctx: FilterContext = Self::load(path.as_ref())?;
        log::info!(
            "Loaded context from {}: {} routes, {} visit coordinates, customer {:?}",
            path.as_ref().display(),
            ctx.route_ids.len(),
            ctx.visit_coordinate_ids.len(),
            ctx.customer_id
        );
        Ok(ctx)
    }

    pub fn parse_actions_yaml(content: &str) -> Result<Vec<Action>, ScopeFilterError> {
        Ok(Format::Yaml.parse::<ActionsDocument>(content)?.into())
    }

    pub fn parse_actions_json(content: &str) -> Result<Vec<Action>, ScopeFilterError> {
        Ok(Format::Json.parse::<ActionsDocument>(content)?.into())
    }

    pub fn parse_context_yaml(content: &str) -> Result<FilterContext, ScopeFilterError> {
        Format::Yaml.parse(content)
    }

    pub fn parse_context_json(content: &str) -> Result<FilterContext, ScopeFilterError> {
        Format::Json.parse(content)
    }

    fn load<T: DeserializeOwned>(path: &Path) -> Result<T, ScopeFilterError> {
        let format = Format::from_path(path)?;
        let content = fs::read_to_string(path)?;
        format.parse(&content)
    }
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}
