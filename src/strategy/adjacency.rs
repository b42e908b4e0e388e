// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidewalk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidewalk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use tracing::trace;

use super::NodeIdMap;
use crate::dom::{BBox, Document, ElementId, Selector};

/// How a family decides which targets are related to one another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjacency {
    /// Targets inside the same nearest ancestor group carrying one of these classes.
    Containment { group_classes: &'static [&'static str] },
    /// Two targets are related when one connector's box overlaps both.
    Geometric { connectors: &'static str },
    /// Sequence-diagram lanes: activations belong to the participant containing them; participants
    /// are related when a message line runs between their columns.
    Lanes {
        participant_classes: &'static [&'static str],
        messages: &'static str,
    },
    /// Previous and next target in document order.
    Sequential,
    /// Gantt tasks: same section, plus every milestone.
    Sections,
    /// Every other target (closed sets such as pie slices).
    AllTargets,
}

const MILESTONE_CLASS: &str = "milestone";

fn gantt_section_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:task|active|done|crit|activeCrit|doneCrit)(\d+)$")
            .expect("static gantt section pattern")
    })
}

fn gantt_section(doc: &Document, element: ElementId) -> Option<String> {
    let el = doc.get(element)?;
    el.classes()
        .find_map(|class| gantt_section_pattern().captures(class))
        .map(|caps| caps[1].to_owned())
}

fn is_milestone(doc: &Document, element: ElementId) -> bool {
    doc.get(element).is_some_and(|el| el.has_class(MILESTONE_CLASS))
}

fn others(element: ElementId, targets: &NodeIdMap) -> impl Iterator<Item = ElementId> + '_ {
    targets.elements().filter(move |candidate| *candidate != element)
}

/// Connector boxes for a selector; connectors that cannot report a box are ignored.
fn connector_boxes(doc: &Document, connectors: &str) -> Vec<BBox> {
    let Ok(selector) = Selector::parse(connectors) else {
        return Vec::new();
    };
    doc.select_parsed(&selector).into_iter().filter_map(|id| doc.bbox(id)).collect()
}

impl Adjacency {
    pub fn find_adjacent(
        &self,
        element: ElementId,
        doc: &Document,
        targets: &NodeIdMap,
    ) -> Vec<ElementId> {
        if !doc.contains(element) {
            return Vec::new();
        }

        // A milestone marks a point relevant to the whole timeline, not just its section.
        if matches!(self, Self::Sequential | Self::Sections) && is_milestone(doc, element) {
            return others(element, targets).collect();
        }

        let adjacent = match *self {
            Self::Containment { group_classes } => containment(element, doc, targets, group_classes),
            Self::Geometric { connectors } => geometric(element, doc, targets, connectors),
            Self::Lanes { participant_classes, messages } => {
                lanes(element, doc, targets, participant_classes, messages)
            }
            Self::Sequential => sequential(element, targets),
            Self::Sections => sections(element, doc, targets),
            Self::AllTargets => others(element, targets).collect(),
        };
        trace!(element = %element, count = adjacent.len(), "adjacent elements");
        adjacent
    }
}

fn nearest_group(doc: &Document, element: ElementId, classes: &[&str]) -> Option<ElementId> {
    doc.ancestors(element)
        .find(|ancestor| doc.get(*ancestor).is_some_and(|el| el.has_any_class(classes)))
}

fn containment(
    element: ElementId,
    doc: &Document,
    targets: &NodeIdMap,
    group_classes: &[&str],
) -> Vec<ElementId> {
    let Some(group) = nearest_group(doc, element, group_classes) else {
        return Vec::new();
    };
    others(element, targets)
        .filter(|candidate| doc.is_ancestor_of(group, *candidate))
        .filter(|candidate| nearest_group(doc, *candidate, group_classes) == Some(group))
        .collect()
}

fn geometric(
    element: ElementId,
    doc: &Document,
    targets: &NodeIdMap,
    connectors: &str,
) -> Vec<ElementId> {
    let Some(own) = doc.bbox(element) else {
        return Vec::new();
    };
    let touching = connector_boxes(doc, connectors)
        .into_iter()
        .filter(|connector| connector.intersects(&own))
        .collect::<Vec<_>>();
    if touching.is_empty() {
        return Vec::new();
    }

    others(element, targets)
        .filter(|candidate| {
            doc.bbox(*candidate)
                .is_some_and(|bbox| touching.iter().any(|connector| connector.intersects(&bbox)))
        })
        .collect()
}

fn spans_column(bbox: &BBox, x: f64) -> bool {
    bbox.x <= x && x <= bbox.right()
}

fn lanes(
    element: ElementId,
    doc: &Document,
    targets: &NodeIdMap,
    participant_classes: &[&str],
    messages: &str,
) -> Vec<ElementId> {
    let is_activation = std::iter::once(element)
        .chain(doc.ancestors(element))
        .filter_map(|id| doc.get(id))
        .any(|el| el.classes().any(|class| class.starts_with("activation")));
    if is_activation {
        let Some(participant) = nearest_group(doc, element, participant_classes) else {
            return Vec::new();
        };
        let registered = targets
            .elements()
            .find(|target| *target == participant || doc.is_ancestor_of(participant, *target));
        return vec![registered.unwrap_or(participant)];
    }

    let Some(own) = doc.bbox(element) else {
        return Vec::new();
    };
    let mut related = BTreeSet::new();
    for message in connector_boxes(doc, messages) {
        let ends = [message.x, message.right()];
        let Some(own_end) = ends.iter().position(|x| spans_column(&own, *x)) else {
            continue;
        };
        let other_end = ends[1 - own_end];
        for candidate in others(element, targets) {
            if doc.bbox(candidate).is_some_and(|bbox| spans_column(&bbox, other_end)) {
                related.insert(candidate);
            }
        }
    }
    related.into_iter().collect()
}

fn sequential(element: ElementId, targets: &NodeIdMap) -> Vec<ElementId> {
    let ordered = targets.elements().collect::<Vec<_>>();
    let Some(position) = ordered.iter().position(|candidate| *candidate == element) else {
        return Vec::new();
    };
    let mut adjacent = Vec::with_capacity(2);
    if position > 0 {
        adjacent.push(ordered[position - 1]);
    }
    if let Some(next) = ordered.get(position + 1) {
        adjacent.push(*next);
    }
    adjacent
}

fn sections(element: ElementId, doc: &Document, targets: &NodeIdMap) -> Vec<ElementId> {
    let section = gantt_section(doc, element);
    others(element, targets)
        .filter(|candidate| {
            is_milestone(doc, *candidate)
                || (section.is_some() && gantt_section(doc, *candidate) == section)
        })
        .collect()
}
