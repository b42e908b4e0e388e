// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidewalk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidewalk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Per-family knowledge of how the rendering engine lays out its markup.
//!
//! A [`DiagramStrategy`] turns a rendered [`Document`] into a [`NodeIdMap`] (logical id →
//! element), produces fallback selectors for a logical id, and answers "what is related to this
//! element". Strategies are stateless: every call receives the current document, because a
//! re-render can replace it wholesale.
//!
//! The id patterns in [`families`] follow the engine's undocumented naming conventions and are
//! pinned by fixture tests; treat them as a compatibility shim rather than a stable contract.

mod adjacency;
pub mod families;
mod git_graph;
pub mod label;
mod pie;
pub mod registry;
mod structured;


use std::collections::HashSet;

use indexmap::IndexMap;

use crate::dom::{Document, ElementId};
use crate::model::DiagramType;

pub use adjacency::Adjacency;
pub use families::{builtin_strategy, register_builtin_strategies, FamilySpec};
pub use git_graph::GitGraphStrategy;
pub use label::{normalize_label, LabelAnchor, LabelOptions, LabelStrategy};
pub use pie::PieStrategy;
pub use registry::{global_registry, init_global_registry, RegistryError, StrategyRegistry};
pub use structured::StructuredStrategy;

/// Logical id → owning element, in registration (document) order.
///
/// Keys are unique and so are values: an element is registered under at most one logical id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeIdMap {
    entries: IndexMap<String, ElementId>,
    elements: HashSet<ElementId>,
}

impl NodeIdMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `id → element` unless the id or the element is already taken.
    pub fn insert(&mut self, id: impl Into<String>, element: ElementId) -> bool {
        let id = id.into();
        if self.entries.contains_key(&id) || self.elements.contains(&element) {
            return false;
        }
        self.elements.insert(element);
        self.entries.insert(id, element);
        true
    }

    pub fn get(&self, id: &str) -> Option<ElementId> {
        self.entries.get(id).copied()
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn contains_element(&self, element: ElementId) -> bool {
        self.elements.contains(&element)
    }

    /// Reverse lookup.
    pub fn id_of(&self, element: ElementId) -> Option<&str> {
        if !self.elements.contains(&element) {
            return None;
        }
        self.entries.iter().find(|(_, el)| **el == element).map(|(id, _)| id.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ElementId)> {
        self.entries.iter().map(|(id, el)| (id.as_str(), *el))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn elements(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.entries.values().copied()
    }
}

/// The per-family capability, as one tagged variant per implementation.
#[derive(Debug, Clone)]
pub enum DiagramStrategy {
    /// Families whose markup carries structured ids.
    Structured(StructuredStrategy),
    Pie(PieStrategy),
    GitGraph(GitGraphStrategy),
    /// Families that only expose visible text.
    Label(LabelStrategy),
    /// Label-based, but scans the embedded HTML content container first.
    ZenUml(LabelStrategy),
}

impl DiagramStrategy {
    pub fn diagram_type(&self) -> DiagramType {
        match self {
            Self::Structured(s) => s.diagram_type(),
            Self::Pie(_) => DiagramType::Pie,
            Self::GitGraph(_) => DiagramType::GitGraph,
            Self::Label(s) | Self::ZenUml(s) => s.diagram_type(),
        }
    }

    /// Class names that mark targetable elements. A discovery hint; not enforced.
    pub fn targetable_classes(&self) -> Vec<&'static str> {
        match self {
            Self::Structured(s) => s.targetable_classes(),
            Self::Pie(_) => PieStrategy::TARGETABLE_CLASSES.to_vec(),
            Self::GitGraph(_) => GitGraphStrategy::TARGETABLE_CLASSES.to_vec(),
            Self::Label(s) | Self::ZenUml(s) => s.targetable_classes().to_vec(),
        }
    }

    /// Element tags that can be targeted. A discovery hint; not enforced.
    pub fn targetable_tags(&self) -> &'static [&'static str] {
        match self {
            Self::Structured(s) => s.targetable_tags(),
            Self::Pie(_) => PieStrategy::TARGETABLE_TAGS,
            Self::GitGraph(_) => GitGraphStrategy::TARGETABLE_TAGS,
            Self::Label(s) | Self::ZenUml(s) => s.targetable_tags(),
        }
    }

    pub fn extract_node_ids(&self, doc: &Document) -> NodeIdMap {
        match self {
            Self::Structured(s) => s.extract_node_ids(doc),
            Self::Pie(s) => s.extract_node_ids(doc),
            Self::GitGraph(s) => s.extract_node_ids(doc),
            Self::Label(s) => s.extract_node_ids(doc),
            Self::ZenUml(s) => label::extract_zenuml(s, doc),
        }
    }

    /// Selectors that may match the element for `id`, most specific first. The last entry always
    /// matches on the logical-id attribute alone.
    pub fn target_selectors(&self, id: &str) -> Vec<String> {
        let mut selectors = match self {
            Self::Structured(s) => s.target_selectors(id),
            Self::Pie(_) => PieStrategy::target_selectors(id),
            Self::GitGraph(_) => GitGraphStrategy::target_selectors(id),
            Self::Label(_) | Self::ZenUml(_) => Vec::new(),
        };
        let fallback = logical_id_selector(id);
        selectors.retain(|selector| *selector != fallback);
        selectors.push(fallback);
        selectors
    }

    pub fn adjacency(&self) -> Adjacency {
        match self {
            Self::Structured(s) => s.adjacency(),
            Self::Pie(_) => Adjacency::AllTargets,
            Self::GitGraph(_) => Adjacency::Sequential,
            Self::Label(s) | Self::ZenUml(s) => s.adjacency(),
        }
    }

    /// Elements related to `element` under this family's adjacency rule, in document order.
    pub fn find_adjacent_elements(&self, element: ElementId, doc: &Document) -> Vec<ElementId> {
        let targets = self.extract_node_ids(doc);
        self.adjacency().find_adjacent(element, doc, &targets)
    }
}

/// The unconditional fallback: any element whose logical-id attribute equals `id`.
pub fn logical_id_selector(id: &str) -> String {
    format!("[data-id=\"{}\"]", crate::dom::css_escape_string(id))
}

/// Expands `{id}` in a selector template with the escaped id.
pub(crate) fn fill_template(template: &str, id: &str) -> String {
    template.replace("{id}", &crate::dom::css_escape_string(id))
}
