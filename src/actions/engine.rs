// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidewalk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidewalk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use super::handlers::default_handlers;
use super::highlight::{HighlightState, SharedHighlight};
use super::{ActionContext, ActionError, ActionFailure, ActionHandler};
use crate::config::TidewalkConfig;
use crate::model::{ActionDefinition, ErrorPolicy};
use crate::resolve::TargetResolver;

/// Runs a step's actions one after another against a name-keyed handler map.
///
/// Failures come back as data; a run never returns `Err` and never retries.
#[derive(Clone, Default)]
pub struct StepActionEngine {
    handlers: HashMap<String, Arc<dyn ActionHandler>>,
    highlight: Option<SharedHighlight>,
}

impl StepActionEngine {
    /// An engine with no handlers: every action is unknown until registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in vocabulary with its own highlight state.
    pub fn with_default_handlers(resolver: TargetResolver, config: &TidewalkConfig) -> Self {
        let highlight: SharedHighlight = Arc::new(Mutex::new(HighlightState::new()));
        let handlers = default_handlers(&resolver, config, &highlight)
            .into_iter()
            .map(|(name, handler)| (name.as_str().to_owned(), handler))
            .collect();
        Self { handlers, highlight: Some(highlight) }
    }

    /// Adds or replaces the handler for `name`.
    pub fn register_handler(
        &mut self,
        name: impl Into<String>,
        handler: Arc<dyn ActionHandler>,
    ) -> Option<Arc<dyn ActionHandler>> {
        self.handlers.insert(name.into(), handler)
    }

    pub fn has_handler(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn handler_names(&self) -> Vec<&str> {
        let mut names = self.handlers.keys().map(String::as_str).collect::<Vec<_>>();
        names.sort_unstable();
        names
    }

    /// The highlight state shared by the default style handlers, if they were installed.
    pub fn highlight(&self) -> Option<&SharedHighlight> {
        self.highlight.as_ref()
    }

    pub async fn run(
        &self,
        actions: &[ActionDefinition],
        ctx: &ActionContext<'_>,
        policy: ErrorPolicy,
    ) -> Vec<ActionFailure> {
        let mut failures = Vec::new();
        for (index, action) in actions.iter().enumerate() {
            debug!(index, action = %action.name, "action started");
            let result = match self.handlers.get(&action.name) {
                Some(handler) => handler.handle(action, ctx).await,
                None => Err(ActionError::UnknownAction(action.name.clone())),
            };
            let Err(error) = result else {
                debug!(index, action = %action.name, "action finished");
                continue;
            };

            warn!(index, action = %action.name, error = %error, "action failed");
            failures.push(ActionFailure { index, action: action.name.clone(), error });
            if policy == ErrorPolicy::Stop {
                debug!(index, remaining = actions.len() - index - 1, "run stopped");
                break;
            }
        }
        failures
    }
}

impl fmt::Debug for StepActionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepActionEngine")
            .field("handlers", &self.handler_names())
            .field("highlight", &self.highlight)
            .finish()
    }
}
