// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidewalk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidewalk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Built-in family tables and the explicit wiring entry point.
//!
//! Every pattern and class name here mirrors what Mermaid 10/11 emits today. The fixture tests in
//! `tests/fixtures/` pin them; when the engine changes its markup, update both together.

use super::label::LabelAnchor;
use super::{
    Adjacency, DiagramStrategy, GitGraphStrategy, LabelOptions, LabelStrategy, PieStrategy,
    StrategyRegistry, StructuredStrategy,
};
use crate::config::{DefaultStrategy, TidewalkConfig};
use crate::model::DiagramType;

/// Static description of a structured-id family.
#[derive(Debug)]
pub struct FamilySpec {
    pub diagram_type: DiagramType,
    /// Attributes read for a raw identifier, in priority order.
    pub id_attributes: &'static [&'static str],
    /// Capture group 1 is the logical id. Order is the only tie-break.
    pub patterns: &'static [&'static str],
    /// Ancestor classes that mark the visual unit to register.
    pub group_classes: &'static [&'static str],
    /// Classes that let an element register itself when no group encloses it.
    pub qualifying_classes: &'static [&'static str],
    pub targetable_tags: &'static [&'static str],
    /// `{id}` is replaced with the escaped logical id.
    pub selector_templates: &'static [&'static str],
    pub adjacency: Adjacency,
}

const ID_ONLY: &[&str] = &["id"];

pub static FLOWCHART: FamilySpec = FamilySpec {
    diagram_type: DiagramType::Flowchart,
    id_attributes: ID_ONLY,
    patterns: &[r"^flowchart-(.+)-\d+$", r"^(.+)-\d+$", r"^(.+)$"],
    group_classes: &["node", "cluster"],
    qualifying_classes: &["node", "cluster"],
    targetable_tags: &["g", "rect", "polygon", "circle", "path"],
    selector_templates: &[
        r#"g.node[data-id="{id}"]"#,
        r#"g.node[id^="flowchart-{id}-"]"#,
        r#"g.cluster[id="{id}"]"#,
        r#"[id="{id}"]"#,
    ],
    adjacency: Adjacency::Geometric {
        connectors: "path.flowchart-link, g.edgePath > path.path, g.edgePaths path",
    },
};

pub static SEQUENCE: FamilySpec = FamilySpec {
    diagram_type: DiagramType::Sequence,
    id_attributes: &["name", "id"],
    patterns: &[r"^participant-(.+)-\d+$", r"^actor-(.+)-\d+$", r"^(.+)$"],
    group_classes: &["participant", "actor-man"],
    qualifying_classes: &["actor-top", "participant", "actor-man"],
    targetable_tags: &["g", "rect", "text"],
    selector_templates: &[
        r#"g.participant[data-id="{id}"]"#,
        r#"rect.actor-top[name="{id}"]"#,
        r#"[id^="participant-{id}-"]"#,
        r#"[name="{id}"]"#,
    ],
    adjacency: Adjacency::Lanes {
        participant_classes: &["participant", "actor-man", "actor-top"],
        messages: r#"line[class^="messageLine"], path[class^="messageLine"]"#,
    },
};

pub static CLASS: FamilySpec = FamilySpec {
    diagram_type: DiagramType::Class,
    id_attributes: ID_ONLY,
    patterns: &[r"^classId-(.+)-\d+$", r"^class-(.+)-\d+$", r"^(.+)-\d+$"],
    group_classes: &["node", "classGroup"],
    qualifying_classes: &["node", "classGroup"],
    targetable_tags: &["g", "rect"],
    selector_templates: &[
        r#"g.node[id^="classId-{id}-"]"#,
        r#"g.classGroup[id^="class-{id}-"]"#,
        r#"[id^="classId-{id}-"]"#,
    ],
    adjacency: Adjacency::Geometric { connectors: "path.relation, g.edgePaths path" },
};

const STATE_PATTERNS: &[&str] = &[r"^state-(.+)-\d+$", r"^(.+)-\d+$", r"^(.+)$"];
const STATE_GROUPS: &[&str] = &["node", "stateGroup", "statediagram-state", "statediagram-cluster"];
const STATE_SELECTORS: &[&str] = &[
    r#"g.node[id^="state-{id}-"]"#,
    r#"g.stateGroup[id="{id}"]"#,
    r#"[id^="state-{id}-"]"#,
];
const STATE_ADJACENCY: Adjacency =
    Adjacency::Geometric { connectors: "path.transition, g.edgePaths path" };

pub static STATE: FamilySpec = FamilySpec {
    diagram_type: DiagramType::State,
    id_attributes: ID_ONLY,
    patterns: STATE_PATTERNS,
    group_classes: STATE_GROUPS,
    qualifying_classes: STATE_GROUPS,
    targetable_tags: &["g", "rect"],
    selector_templates: STATE_SELECTORS,
    adjacency: STATE_ADJACENCY,
};

pub static STATE_V2: FamilySpec = FamilySpec {
    diagram_type: DiagramType::StateV2,
    id_attributes: ID_ONLY,
    patterns: STATE_PATTERNS,
    group_classes: STATE_GROUPS,
    qualifying_classes: STATE_GROUPS,
    targetable_tags: &["g", "rect"],
    selector_templates: STATE_SELECTORS,
    adjacency: STATE_ADJACENCY,
};

pub static ER: FamilySpec = FamilySpec {
    diagram_type: DiagramType::Er,
    id_attributes: ID_ONLY,
    patterns: &[
        r"^entity-(.+)-\d+$",
        r"^entity-(.+)-[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$",
        r"^entity-(.+)$",
    ],
    group_classes: &["node", "er", "entityBox"],
    qualifying_classes: &["node", "er", "entityBox"],
    targetable_tags: &["g", "rect"],
    selector_templates: &[r#"g.node[id^="entity-{id}-"]"#, r#"[id^="entity-{id}"]"#],
    adjacency: Adjacency::Geometric { connectors: "path.relationshipLine, path.er" },
};

pub static GANTT: FamilySpec = FamilySpec {
    diagram_type: DiagramType::Gantt,
    id_attributes: ID_ONLY,
    patterns: &[r"^(.+)$"],
    group_classes: &[],
    qualifying_classes: &["task", "milestone"],
    targetable_tags: &["rect", "text", "g"],
    selector_templates: &[
        r#".task[id="{id}"]"#,
        r#".milestone[id="{id}"]"#,
        r#"rect[id="{id}"]"#,
        r#"text[id="{id}-text"]"#,
    ],
    adjacency: Adjacency::Sections,
};

pub static REQUIREMENT: FamilySpec = FamilySpec {
    diagram_type: DiagramType::Requirement,
    id_attributes: ID_ONLY,
    patterns: &[r"^(.+)$"],
    group_classes: &["node"],
    qualifying_classes: &["node", "requirementBox", "reqBox", "element"],
    targetable_tags: &["g", "rect"],
    selector_templates: &[r#"g.node[id="{id}"]"#, r#"[id="{id}"]"#],
    adjacency: Adjacency::Geometric { connectors: "path.relationshipLine, g.edgePaths path" },
};

pub static BLOCK: FamilySpec = FamilySpec {
    diagram_type: DiagramType::Block,
    id_attributes: ID_ONLY,
    patterns: &[r"^block-(.+)-\d+$", r"^(.+)$"],
    group_classes: &["node", "block"],
    qualifying_classes: &["node", "block"],
    targetable_tags: &["g", "rect", "polygon"],
    selector_templates: &[
        r#"g.node[id^="block-{id}-"]"#,
        r#"g.node[id="{id}"]"#,
        r#"[id="{id}"]"#,
    ],
    adjacency: Adjacency::Geometric {
        connectors: "path.edge, g.edgePaths path, path.flowchart-link",
    },
};

pub static KANBAN: FamilySpec = FamilySpec {
    diagram_type: DiagramType::Kanban,
    id_attributes: ID_ONLY,
    patterns: &[r"^(.+)$"],
    group_classes: &[],
    qualifying_classes: &["kanban-item", "cluster"],
    targetable_tags: &["g", "rect"],
    selector_templates: &[r#"g.kanban-item[id="{id}"]"#, r#"g.cluster[id="{id}"]"#],
    // Items are not nested inside their section; the section rect overlaps them instead.
    adjacency: Adjacency::Geometric { connectors: "g.cluster > rect, rect.kanban-section" },
};

/// Label family layout: candidates, anchor, hints, adjacency and base options.
struct LabelFamily {
    candidates: &'static str,
    anchor: LabelAnchor,
    classes: &'static [&'static str],
    tags: &'static [&'static str],
    adjacency: Adjacency,
    skip_numeric_labels: bool,
}

const C4_FAMILY: LabelFamily = LabelFamily {
    candidates: "rect",
    anchor: LabelAnchor::Parent,
    classes: &[],
    tags: &["g", "rect"],
    adjacency: Adjacency::Geometric { connectors: "line, path[marker-end]" },
    skip_numeric_labels: false,
};

fn label_family(ty: DiagramType) -> Option<LabelFamily> {
    let family = match ty {
        DiagramType::Journey => LabelFamily {
            candidates: "g > text.task",
            anchor: LabelAnchor::Parent,
            classes: &["task"],
            tags: &["g"],
            adjacency: Adjacency::Sequential,
            skip_numeric_labels: false,
        },
        DiagramType::Timeline => LabelFamily {
            candidates: "g.taskWrapper, g.eventWrapper",
            anchor: LabelAnchor::Candidate,
            classes: &["taskWrapper", "eventWrapper"],
            tags: &["g"],
            adjacency: Adjacency::Sequential,
            skip_numeric_labels: false,
        },
        DiagramType::Mindmap => LabelFamily {
            candidates: "g.mindmap-node, g.node",
            anchor: LabelAnchor::Candidate,
            classes: &["mindmap-node", "node"],
            tags: &["g"],
            adjacency: Adjacency::Geometric { connectors: "path.edge, g.edgePaths path" },
            skip_numeric_labels: false,
        },
        DiagramType::Sankey => LabelFamily {
            candidates: "g.node-labels > text, g.node",
            anchor: LabelAnchor::Candidate,
            classes: &["node"],
            tags: &["g", "text", "rect"],
            adjacency: Adjacency::Geometric { connectors: "g.links path, path.link" },
            skip_numeric_labels: false,
        },
        DiagramType::Treemap => LabelFamily {
            candidates: "g.treemapLeafGroup",
            anchor: LabelAnchor::Candidate,
            classes: &["treemapLeafGroup"],
            tags: &["g"],
            adjacency: Adjacency::Containment { group_classes: &["treemapSection"] },
            skip_numeric_labels: false,
        },
        DiagramType::Packet => LabelFamily {
            candidates: "text.packetLabel",
            anchor: LabelAnchor::Candidate,
            classes: &["packetLabel"],
            tags: &["text"],
            adjacency: Adjacency::Sequential,
            skip_numeric_labels: false,
        },
        DiagramType::Quadrant => LabelFamily {
            candidates: "g.data-point",
            anchor: LabelAnchor::Candidate,
            classes: &["data-point"],
            tags: &["g", "circle"],
            adjacency: Adjacency::Sequential,
            skip_numeric_labels: false,
        },
        DiagramType::XyChart => LabelFamily {
            candidates: "text",
            anchor: LabelAnchor::Candidate,
            classes: &[],
            tags: &["text", "rect", "path"],
            adjacency: Adjacency::Sequential,
            skip_numeric_labels: true,
        },
        DiagramType::Radar => LabelFamily {
            candidates: "text.radarAxisLabel, text.radarLegendText, text",
            anchor: LabelAnchor::Candidate,
            classes: &["radarAxisLabel", "radarLegendText"],
            tags: &["text"],
            adjacency: Adjacency::Sequential,
            skip_numeric_labels: true,
        },
        DiagramType::C4Context | DiagramType::C4Container | DiagramType::C4Component => {
            C4_FAMILY
        }
        DiagramType::ZenUml => LabelFamily {
            candidates: "text",
            anchor: LabelAnchor::Candidate,
            classes: &["participant"],
            tags: &["div", "text"],
            adjacency: Adjacency::Sequential,
            skip_numeric_labels: false,
        },
        _ => return None,
    };
    Some(family)
}

fn label_strategy(ty: DiagramType, family: LabelFamily, config: &TidewalkConfig) -> LabelStrategy {
    let base = LabelOptions { skip_numeric_labels: family.skip_numeric_labels, max_targets: None };
    LabelStrategy::new(ty, family.candidates)
        .expect("static label candidate selector")
        .with_anchor(family.anchor)
        .with_targetable(family.classes, family.tags)
        .with_adjacency(family.adjacency)
        .with_options(config.label_options(ty, base))
}

/// The built-in strategy for `ty`, or `None` for types that rely on the registry default.
pub fn builtin_strategy(ty: DiagramType, config: &TidewalkConfig) -> Option<DiagramStrategy> {
    let structured = |spec: &'static FamilySpec| {
        Some(DiagramStrategy::Structured(StructuredStrategy::new(spec)))
    };
    match ty {
        DiagramType::Flowchart => structured(&FLOWCHART),
        DiagramType::Sequence => structured(&SEQUENCE),
        DiagramType::Class => structured(&CLASS),
        DiagramType::State => structured(&STATE),
        DiagramType::StateV2 => structured(&STATE_V2),
        DiagramType::Er => structured(&ER),
        DiagramType::Gantt => structured(&GANTT),
        DiagramType::Requirement => structured(&REQUIREMENT),
        DiagramType::Block => structured(&BLOCK),
        DiagramType::Kanban => structured(&KANBAN),
        DiagramType::Pie => Some(DiagramStrategy::Pie(PieStrategy::new())),
        DiagramType::GitGraph => Some(DiagramStrategy::GitGraph(GitGraphStrategy::new())),
        DiagramType::ZenUml => {
            let family = label_family(ty)?;
            Some(DiagramStrategy::ZenUml(label_strategy(ty, family, config)))
        }
        DiagramType::Unknown => None,
        _ => {
            let family = label_family(ty)?;
            Some(DiagramStrategy::Label(label_strategy(ty, family, config)))
        }
    }
}

/// Registers every built-in family and, unless disabled, the generic label default.
pub fn register_builtin_strategies(registry: &mut StrategyRegistry, config: &TidewalkConfig) {
    for ty in DiagramType::ALL {
        if let Some(strategy) = builtin_strategy(ty, config) {
            registry.register(ty, strategy);
        }
    }
    match config.default_strategy {
        DefaultStrategy::Label => {
            let options = config.label_options(DiagramType::Unknown, LabelOptions::default());
            registry.set_default(DiagramStrategy::Label(LabelStrategy::generic(options)));
        }
        DefaultStrategy::None => registry.clear_default(),
    }
}
