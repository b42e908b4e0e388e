// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidewalk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidewalk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, RwLock};

use tracing::{debug, info};

use super::{register_builtin_strategies, DiagramStrategy};
use crate::config::TidewalkConfig;
use crate::model::DiagramType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// Neither a strategy for the type nor a default is registered. The registry was not wired up.
    NoStrategy(DiagramType),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoStrategy(ty) => {
                write!(f, "no strategy registered for diagram type `{ty}` and no default set")
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// Diagram type → strategy. Holds no per-document state.
#[derive(Debug, Clone, Default)]
pub struct StrategyRegistry {
    strategies: HashMap<DiagramType, Arc<DiagramStrategy>>,
    default: Option<Arc<DiagramStrategy>>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtin_strategies(config: &TidewalkConfig) -> Self {
        let mut registry = Self::new();
        register_builtin_strategies(&mut registry, config);
        registry
    }

    /// Stores `strategy` for `ty`, returning the registration it replaced.
    pub fn register(
        &mut self,
        ty: DiagramType,
        strategy: impl Into<Arc<DiagramStrategy>>,
    ) -> Option<Arc<DiagramStrategy>> {
        self.strategies.insert(ty, strategy.into())
    }

    pub fn get(&self, ty: DiagramType) -> Option<Arc<DiagramStrategy>> {
        self.strategies.get(&ty).cloned()
    }

    pub fn get_or_default(&self, ty: DiagramType) -> Result<Arc<DiagramStrategy>, RegistryError> {
        if let Some(strategy) = self.strategies.get(&ty) {
            return Ok(Arc::clone(strategy));
        }
        match &self.default {
            Some(default) => {
                debug!(diagram_type = %ty, "using default strategy");
                Ok(Arc::clone(default))
            }
            None => Err(RegistryError::NoStrategy(ty)),
        }
    }

    pub fn set_default(&mut self, strategy: impl Into<Arc<DiagramStrategy>>) {
        self.default = Some(strategy.into());
    }

    pub fn clear_default(&mut self) {
        self.default = None;
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    pub fn has(&self, ty: DiagramType) -> bool {
        self.strategies.contains_key(&ty)
    }

    /// Registered types, sorted.
    pub fn registered_types(&self) -> Vec<DiagramType> {
        let mut types = self.strategies.keys().copied().collect::<Vec<_>>();
        types.sort();
        types
    }
}

fn global_slot() -> &'static RwLock<Arc<StrategyRegistry>> {
    static GLOBAL: OnceLock<RwLock<Arc<StrategyRegistry>>> = OnceLock::new();
    GLOBAL.get_or_init(|| RwLock::new(Arc::new(StrategyRegistry::new())))
}

/// The process-wide registry. Empty until [`init_global_registry`] runs.
pub fn global_registry() -> Arc<StrategyRegistry> {
    let slot = global_slot().read().unwrap_or_else(|poisoned| poisoned.into_inner());
    Arc::clone(&slot)
}

/// Wires the built-in strategies into the process-wide registry, replacing any earlier wiring.
pub fn init_global_registry(config: &TidewalkConfig) -> Arc<StrategyRegistry> {
    let registry = Arc::new(StrategyRegistry::with_builtin_strategies(config));
    let mut slot = global_slot().write().unwrap_or_else(|poisoned| poisoned.into_inner());
    *slot = Arc::clone(&registry);
    info!(types = registry.registered_types().len(), "strategy registry initialized");
    registry
}
