// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidewalk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidewalk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The notation family a diagram source is written in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum DiagramType {
    Flowchart,
    Sequence,
    Class,
    State,
    StateV2,
    Er,
    Gantt,
    Pie,
    Journey,
    GitGraph,
    Timeline,
    Quadrant,
    Requirement,
    C4Context,
    C4Container,
    C4Component,
    Block,
    Mindmap,
    XyChart,
    Sankey,
    Treemap,
    Kanban,
    Packet,
    Radar,
    #[serde(rename = "zenuml")]
    ZenUml,
    Unknown,
}

impl DiagramType {
    pub const ALL: [DiagramType; 26] = [
        Self::Flowchart,
        Self::Sequence,
        Self::Class,
        Self::State,
        Self::StateV2,
        Self::Er,
        Self::Gantt,
        Self::Pie,
        Self::Journey,
        Self::GitGraph,
        Self::Timeline,
        Self::Quadrant,
        Self::Requirement,
        Self::C4Context,
        Self::C4Container,
        Self::C4Component,
        Self::Block,
        Self::Mindmap,
        Self::XyChart,
        Self::Sankey,
        Self::Treemap,
        Self::Kanban,
        Self::Packet,
        Self::Radar,
        Self::ZenUml,
        Self::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flowchart => "flowchart",
            Self::Sequence => "sequence",
            Self::Class => "class",
            Self::State => "state",
            Self::StateV2 => "state-v2",
            Self::Er => "er",
            Self::Gantt => "gantt",
            Self::Pie => "pie",
            Self::Journey => "journey",
            Self::GitGraph => "git-graph",
            Self::Timeline => "timeline",
            Self::Quadrant => "quadrant",
            Self::Requirement => "requirement",
            Self::C4Context => "c4-context",
            Self::C4Container => "c4-container",
            Self::C4Component => "c4-component",
            Self::Block => "block",
            Self::Mindmap => "mindmap",
            Self::XyChart => "xy-chart",
            Self::Sankey => "sankey",
            Self::Treemap => "treemap",
            Self::Kanban => "kanban",
            Self::Packet => "packet",
            Self::Radar => "radar",
            Self::ZenUml => "zenuml",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DiagramType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDiagramTypeError {
    input: String,
}

impl fmt::Display for ParseDiagramTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown diagram type tag: {}", self.input)
    }
}

impl std::error::Error for ParseDiagramTypeError {}

impl FromStr for DiagramType {
    type Err = ParseDiagramTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| ParseDiagramTypeError { input: s.to_owned() })
    }
}

#[cfg(test)]
mod tests {
    use super::DiagramType;

    #[test]
    fn tags_round_trip_through_from_str_and_serde() {
        for ty in DiagramType::ALL {
            assert_eq!(ty.as_str().parse::<DiagramType>(), Ok(ty));
            let json = serde_json::to_string(&ty).expect("serialize");
            assert_eq!(json, format!("\"{}\"", ty.as_str()));
        }
    }

    #[test]
    fn rejects_unknown_tag() {
        assert!("flow".parse::<DiagramType>().is_err());
    }
}
