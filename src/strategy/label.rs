// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidewalk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidewalk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Label-based id extraction, for families whose markup exposes only visible text.
//!
//! A label becomes an id by collapsing whitespace runs to `_` and dropping everything outside
//! `[A-Za-z0-9_-]`. Repeated labels are suffixed `_2`, `_3`, ... in document order.

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Adjacency, NodeIdMap};
use crate::dom::{Document, ElementId, Selector, SelectorError};
use crate::model::DiagramType;

/// Candidates for the generic fallback: node-like groups first, bare text last.
pub const GENERIC_CANDIDATES: &str = "g.node, g.cluster, g.label, text";

const GENERIC_CONNECTORS: &str =
    "path.flowchart-link, g.edgePaths path, path.relation, path.transition, line";

/// Embedded-HTML participants rendered by the ZenUML plugin.
const ZENUML_PARTICIPANTS: &str = "foreignObject .participant";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct LabelOptions {
    /// Never register labels that normalize to a plain number (axis ticks and the like).
    pub skip_numeric_labels: bool,
    /// Stop scanning once this many ids are registered.
    pub max_targets: Option<usize>,
}

/// Which element a matched candidate registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelAnchor {
    Candidate,
    /// The candidate's parent (e.g. the group around a `text.task`).
    Parent,
}

#[derive(Debug, Clone)]
pub struct LabelStrategy {
    diagram_type: DiagramType,
    candidates: Selector,
    anchor: LabelAnchor,
    classes: &'static [&'static str],
    tags: &'static [&'static str],
    adjacency: Adjacency,
    options: LabelOptions,
}

impl LabelStrategy {
    pub fn new(diagram_type: DiagramType, candidates: &str) -> Result<Self, SelectorError> {
        Ok(Self {
            diagram_type,
            candidates: Selector::parse(candidates)?,
            anchor: LabelAnchor::Candidate,
            classes: &["node", "cluster", "label"],
            tags: &["g", "text"],
            adjacency: Adjacency::Geometric { connectors: GENERIC_CONNECTORS },
            options: LabelOptions::default(),
        })
    }

    /// The catch-all strategy used when no family-specific one is registered.
    pub fn generic(options: LabelOptions) -> Self {
        Self::new(DiagramType::Unknown, GENERIC_CANDIDATES)
            .expect("static generic candidate selector")
            .with_options(options)
    }

    pub fn with_anchor(mut self, anchor: LabelAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn with_targetable(
        mut self,
        classes: &'static [&'static str],
        tags: &'static [&'static str],
    ) -> Self {
        self.classes = classes;
        self.tags = tags;
        self
    }

    pub fn with_adjacency(mut self, adjacency: Adjacency) -> Self {
        self.adjacency = adjacency;
        self
    }

    pub fn with_options(mut self, options: LabelOptions) -> Self {
        self.options = options;
        self
    }

    pub fn diagram_type(&self) -> DiagramType {
        self.diagram_type
    }

    pub fn options(&self) -> LabelOptions {
        self.options
    }

    pub fn targetable_classes(&self) -> &'static [&'static str] {
        self.classes
    }

    pub fn targetable_tags(&self) -> &'static [&'static str] {
        self.tags
    }

    pub fn adjacency(&self) -> Adjacency {
        self.adjacency
    }

    pub fn extract_node_ids(&self, doc: &Document) -> NodeIdMap {
        let candidates = doc.select_parsed(&self.candidates);
        self.extract_from(doc, candidates)
    }

    fn extract_from(
        &self,
        doc: &Document,
        candidates: impl IntoIterator<Item = ElementId>,
    ) -> NodeIdMap {
        let mut map = NodeIdMap::new();
        let mut labels = LabelAllocator::default();

        for candidate in candidates {
            if let Some(max) = self.options.max_targets {
                if map.len() >= max {
                    debug!(diagram_type = %self.diagram_type, max, "label target cap reached");
                    break;
                }
            }

            let anchor = match self.anchor {
                LabelAnchor::Candidate => candidate,
                LabelAnchor::Parent => match doc.get(candidate).and_then(|el| el.parent()) {
                    Some(parent) => parent,
                    None => continue,
                },
            };
            // Outermost registration wins; labels nested inside a registered group belong to it.
            if map.contains_element(anchor)
                || doc.ancestors(anchor).any(|ancestor| map.contains_element(ancestor))
            {
                continue;
            }

            let label = normalize_label(&doc.text_content(anchor));
            if label.is_empty() {
                continue;
            }
            if self.options.skip_numeric_labels && is_numeric_label(&label) {
                continue;
            }

            let id = labels.allocate(label, &map);
            map.insert(id, anchor);
        }

        debug!(diagram_type = %self.diagram_type, targets = map.len(), "extracted label ids");
        map
    }
}

/// ZenUML renders participants as HTML inside `foreignObject`; scan there first and fall back to
/// the plain label scan only when nothing is found.
pub(super) fn extract_zenuml(strategy: &LabelStrategy, doc: &Document) -> NodeIdMap {
    if let Ok(selector) = Selector::parse(ZENUML_PARTICIPANTS) {
        let participants = doc.select_parsed(&selector);
        if !participants.is_empty() {
            let map = strategy.extract_from(doc, participants);
            if !map.is_empty() {
                return map;
            }
        }
    }
    strategy.extract_node_ids(doc)
}

/// Turns visible text into an identifier: whitespace runs become `_`, anything outside
/// `[A-Za-z0-9_-]` is dropped.
pub fn normalize_label(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for (index, word) in raw.split_whitespace().enumerate() {
        if index > 0 {
            out.push('_');
        }
        out.extend(word.chars().filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-'));
    }
    out
}

fn is_numeric_label(label: &str) -> bool {
    let digits = label.strip_prefix('-').unwrap_or(label);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// Hands out `label`, `label_2`, `label_3`, ... skipping numbers already taken in the map.
#[derive(Debug, Default)]
pub(super) struct LabelAllocator {
    seen: HashMap<String, usize>,
}

impl LabelAllocator {
    pub(super) fn allocate(&mut self, base: String, map: &NodeIdMap) -> String {
        let count = self.seen.entry(base.clone()).or_insert(0);
        *count += 1;
        loop {
            let candidate =
                if *count == 1 { base.clone() } else { format!("{base}_{}", *count) };
            if !map.contains_id(&candidate) {
                return candidate;
            }
            *count += 1;
        }
    }
}
