// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidewalk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidewalk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Target resolution: logical address → concrete rendered elements.
//!
//! Nothing is cached between calls. Each resolution reads the diagram's current document and
//! rebuilds the strategy's id map, so a re-render is picked up immediately.

use std::sync::{Arc, RwLockReadGuard};

use tracing::{debug, trace, warn};

use crate::dom::{Document, ElementId};
use crate::handle::{DiagramHandle, Elements};
use crate::model::{TargetDescriptor, TargetKind};
use crate::strategy::{DiagramStrategy, RegistryError, StrategyRegistry};

/// Minimum similarity (0..1) for an id to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.6;

/// Which step of the resolution order produced the elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedVia {
    Handle,
    NodeId,
    /// Index into the strategy's fallback selector list.
    FallbackSelector(usize),
    ElementId,
    AuthorSelector,
    /// Several targets merged by [`TargetResolver::resolve_many`].
    Combined,
    Unresolved,
}

/// Elements a target resolved to, tagged with the document generation they belong to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    elements: Elements,
    generation: u64,
    via: ResolvedVia,
}

impl Resolution {
    fn unresolved(generation: u64) -> Self {
        Self { elements: Elements::new(), generation, via: ResolvedVia::Unresolved }
    }

    pub fn elements(&self) -> &[ElementId] {
        &self.elements
    }

    pub fn first(&self) -> Option<ElementId> {
        self.elements.first().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn via(&self) -> ResolvedVia {
        self.via
    }

    pub fn into_elements(self) -> Elements {
        self.elements
    }
}

#[derive(Debug, Clone)]
pub struct TargetResolver {
    registry: Arc<StrategyRegistry>,
}

fn read_document(diagram: &dyn DiagramHandle) -> RwLockReadGuard<'_, Document> {
    diagram.document().read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl TargetResolver {
    pub fn new(registry: Arc<StrategyRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<StrategyRegistry> {
        &self.registry
    }

    pub fn strategy_for(
        &self,
        diagram: &dyn DiagramHandle,
    ) -> Result<Arc<DiagramStrategy>, RegistryError> {
        self.registry.get_or_default(diagram.diagram_type())
    }

    /// Resolves `target` against the diagram's current document. No match is `Ok` with an empty
    /// resolution; only a missing strategy is an error.
    pub fn resolve(
        &self,
        diagram: &dyn DiagramHandle,
        target: &TargetDescriptor,
    ) -> Result<Resolution, RegistryError> {
        if let Some(elements) = diagram.resolve_target(target) {
            trace!(target = %target, count = elements.len(), "resolved by diagram handle");
            let generation = read_document(diagram).generation();
            return Ok(Resolution { elements, generation, via: ResolvedVia::Handle });
        }
        let doc = read_document(diagram);
        self.resolve_in(diagram, &doc, target)
    }

    fn resolve_in(
        &self,
        diagram: &dyn DiagramHandle,
        doc: &Document,
        target: &TargetDescriptor,
    ) -> Result<Resolution, RegistryError> {
        let id = target.id().as_str();
        let generation = doc.generation();

        let resolution = match target.kind() {
            TargetKind::Element => {
                let elements = doc
                    .elements()
                    .filter(|(_, el)| el.id() == Some(id))
                    .map(|(element, _)| element)
                    .collect::<Elements>();
                Resolution { elements, generation, via: ResolvedVia::ElementId }
            }
            TargetKind::Selector => match doc.select(id) {
                Ok(found) => Resolution {
                    elements: found.into_iter().collect(),
                    generation,
                    via: ResolvedVia::AuthorSelector,
                },
                Err(err) => {
                    warn!(target = %target, error = %err, "malformed target selector");
                    Resolution::unresolved(generation)
                }
            },
            TargetKind::Node => {
                let strategy = self.strategy_for(diagram)?;
                resolve_node(&strategy, doc, id)
            }
        };

        if resolution.elements.is_empty() {
            debug!(target = %target, diagram_type = %diagram.diagram_type(), "target unresolved");
            return Ok(Resolution::unresolved(generation));
        }
        trace!(target = %target, via = ?resolution.via, count = resolution.elements.len(), "resolved");
        Ok(resolution)
    }

    /// Union of several targets' elements, first occurrence order, duplicates dropped.
    pub fn resolve_many<'a>(
        &self,
        diagram: &dyn DiagramHandle,
        targets: impl IntoIterator<Item = &'a TargetDescriptor>,
    ) -> Result<Resolution, RegistryError> {
        let doc = read_document(diagram);
        let mut elements = Elements::new();
        for target in targets {
            let resolution = match diagram.resolve_target(target) {
                Some(found) => found,
                None => self.resolve_in(diagram, &doc, target)?.into_elements(),
            };
            for element in resolution {
                if !elements.contains(&element) {
                    elements.push(element);
                }
            }
        }
        let via = if elements.is_empty() { ResolvedVia::Unresolved } else { ResolvedVia::Combined };
        Ok(Resolution { elements, generation: doc.generation(), via })
    }

    /// Elements related to the first element `target` resolves to.
    pub fn adjacent(
        &self,
        diagram: &dyn DiagramHandle,
        target: &TargetDescriptor,
    ) -> Result<Vec<ElementId>, RegistryError> {
        let strategy = self.strategy_for(diagram)?;
        let doc = read_document(diagram);
        let first = match diagram.resolve_target(target) {
            Some(found) => found.first().copied(),
            None => self.resolve_in(diagram, &doc, target)?.first(),
        };
        Ok(first.map(|element| strategy.find_adjacent_elements(element, &doc)).unwrap_or_default())
    }

    /// The known logical id most similar to `id`, for "did you mean" hints.
    pub fn closest_known_id(&self, diagram: &dyn DiagramHandle, id: &str) -> Option<String> {
        let strategy = self.strategy_for(diagram).ok()?;
        let doc = read_document(diagram);
        let map = strategy.extract_node_ids(&doc);
        map.ids()
            .map(|known| (known, rapidfuzz::fuzz::ratio(id.chars(), known.chars())))
            .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(known, _)| known.to_owned())
    }
}

fn resolve_node(strategy: &DiagramStrategy, doc: &Document, id: &str) -> Resolution {
    let generation = doc.generation();
    let map = strategy.extract_node_ids(doc);
    if let Some(element) = map.get(id) {
        return Resolution { elements: Elements::from_slice(&[element]), generation, via: ResolvedVia::NodeId };
    }

    for (index, selector) in strategy.target_selectors(id).iter().enumerate() {
        match doc.select(selector) {
            Ok(found) if !found.is_empty() => {
                return Resolution {
                    elements: found.into_iter().collect(),
                    generation,
                    via: ResolvedVia::FallbackSelector(index),
                };
            }
            Ok(_) => {}
            Err(err) => warn!(selector = %selector, error = %err, "fallback selector did not parse"),
        }
    }
    Resolution::unresolved(generation)
}
