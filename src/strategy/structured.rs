// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidewalk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidewalk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use regex::Regex;
use tracing::debug;

use super::{fill_template, Adjacency, FamilySpec, NodeIdMap};
use crate::dom::{Document, ElementId};
use crate::model::DiagramType;

/// Id extraction for families whose rendered markup carries structured identifiers.
#[derive(Debug, Clone)]
pub struct StructuredStrategy {
    spec: &'static FamilySpec,
    patterns: Vec<Regex>,
}

impl StructuredStrategy {
    pub fn new(spec: &'static FamilySpec) -> Self {
        let patterns = spec
            .patterns
            .iter()
            .map(|pattern| Regex::new(pattern).expect("static family id pattern"))
            .collect();
        Self { spec, patterns }
    }

    pub fn spec(&self) -> &'static FamilySpec {
        self.spec
    }

    pub fn diagram_type(&self) -> DiagramType {
        self.spec.diagram_type
    }

    pub fn targetable_classes(&self) -> Vec<&'static str> {
        let mut classes = self.spec.group_classes.to_vec();
        for class in self.spec.qualifying_classes {
            if !classes.contains(class) {
                classes.push(class);
            }
        }
        classes
    }

    pub fn targetable_tags(&self) -> &'static [&'static str] {
        self.spec.targetable_tags
    }

    pub fn adjacency(&self) -> Adjacency {
        self.spec.adjacency
    }

    /// First pattern (in list order) that matches wins.
    pub fn logical_id(&self, raw: &str) -> Option<String> {
        self.patterns.iter().find_map(|pattern| {
            pattern
                .captures(raw)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_owned())
                .filter(|id| !id.is_empty())
        })
    }

    /// Nearest group (the element itself counts, like `closest()`), else the element if it
    /// carries a qualifying class.
    fn registration_target(&self, doc: &Document, element: ElementId) -> Option<ElementId> {
        let group = std::iter::once(element).chain(doc.ancestors(element)).find(|candidate| {
            doc.get(*candidate).is_some_and(|el| el.has_any_class(self.spec.group_classes))
        });
        group.or_else(|| {
            doc.get(element)
                .filter(|el| el.has_any_class(self.spec.qualifying_classes))
                .map(|_| element)
        })
    }

    pub fn extract_node_ids(&self, doc: &Document) -> NodeIdMap {
        let mut map = NodeIdMap::new();
        for (element_id, element) in doc.elements() {
            let Some(logical) = self
                .spec
                .id_attributes
                .iter()
                .filter_map(|attr| element.attr(attr).filter(|raw| !raw.is_empty()))
                .find_map(|raw| self.logical_id(raw))
            else {
                continue;
            };
            if map.contains_id(&logical) {
                continue;
            }
            if let Some(target) = self.registration_target(doc, element_id) {
                map.insert(logical, target);
            }
        }
        debug!(
            diagram_type = %self.spec.diagram_type,
            targets = map.len(),
            "extracted structured node ids"
        );
        map
    }

    pub fn target_selectors(&self, id: &str) -> Vec<String> {
        let mut selectors = Vec::with_capacity(self.spec.selector_templates.len() + 1);
        for template in self.spec.selector_templates {
            let selector = fill_template(template, id);
            if !selectors.contains(&selector) {
                selectors.push(selector);
            }
        }
        selectors
    }
}
