// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidewalk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidewalk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Diagram type classification from source text.

use crate::model::DiagramType;

/// Header keywords, lower-cased. A keyword must appear before any shorter keyword it starts with.
const KEYWORDS: &[(&str, DiagramType)] = &[
    ("statediagram-v2", DiagramType::StateV2),
    ("statediagram", DiagramType::State),
    ("sequencediagram", DiagramType::Sequence),
    ("classdiagram-v2", DiagramType::Class),
    ("classdiagram", DiagramType::Class),
    ("erdiagram", DiagramType::Er),
    ("gantt", DiagramType::Gantt),
    ("pie", DiagramType::Pie),
    ("journey", DiagramType::Journey),
    ("gitgraph", DiagramType::GitGraph),
    ("timeline", DiagramType::Timeline),
    ("quadrantchart", DiagramType::Quadrant),
    ("requirementdiagram", DiagramType::Requirement),
    ("requirement", DiagramType::Requirement),
    ("c4context", DiagramType::C4Context),
    ("c4container", DiagramType::C4Container),
    ("c4component", DiagramType::C4Component),
    ("block-beta", DiagramType::Block),
    ("block", DiagramType::Block),
    ("mindmap", DiagramType::Mindmap),
    ("xychart-beta", DiagramType::XyChart),
    ("xychart", DiagramType::XyChart),
    ("sankey-beta", DiagramType::Sankey),
    ("sankey", DiagramType::Sankey),
    ("treemap-beta", DiagramType::Treemap),
    ("treemap", DiagramType::Treemap),
    ("kanban", DiagramType::Kanban),
    ("packet-beta", DiagramType::Packet),
    ("packet", DiagramType::Packet),
    ("radar-beta", DiagramType::Radar),
    ("radar", DiagramType::Radar),
    ("zenuml", DiagramType::ZenUml),
    ("flowchart-elk", DiagramType::Flowchart),
    ("flowchart-v2", DiagramType::Flowchart),
    ("flowchart", DiagramType::Flowchart),
    ("graph", DiagramType::Flowchart),
];

const EDGE_CONNECTORS: &[&str] = &["-->", "---", "==>", "-.->", "-.-"];

/// First line that carries diagram content: blank lines, `%%` comments/directives and a leading
/// `---` front matter block are skipped.
fn header_line(source: &str) -> Option<&str> {
    let mut lines = source.lines().map(str::trim).filter(|line| !line.is_empty()).peekable();

    if lines.peek() == Some(&"---") {
        lines.next();
        for line in lines.by_ref() {
            if line == "---" {
                break;
            }
        }
    }

    lines.find(|line| !line.starts_with("%%"))
}

/// Strips a leading front matter block so the connector heuristic does not see its `---`.
fn body(source: &str) -> &str {
    let trimmed = source.trim_start();
    let Some(rest) = trimmed.strip_prefix("---") else {
        return source;
    };
    match rest.find("\n---") {
        Some(end) => &rest[end + 4..],
        None => source,
    }
}

/// Classifies diagram source text. Total: anything unrecognized is [`DiagramType::Unknown`].
pub fn detect_diagram_type(source: &str) -> DiagramType {
    if let Some(header) = header_line(source) {
        let header = header.to_lowercase();
        if let Some((_, ty)) = KEYWORDS.iter().find(|(keyword, _)| starts_with_word(&header, keyword))
        {
            return *ty;
        }
    }

    let body = body(source);
    if EDGE_CONNECTORS.iter().any(|connector| body.contains(connector)) || contains_word(body, "graph")
    {
        return DiagramType::Flowchart;
    }

    DiagramType::Unknown
}

/// `keyword` followed by the end of the line or a non-identifier character.
fn starts_with_word(header: &str, keyword: &str) -> bool {
    header.strip_prefix(keyword).is_some_and(|rest| {
        rest.chars().next().map_or(true, |c| !c.is_ascii_alphanumeric() && c != '-' && c != '_')
    })
}

fn contains_word(haystack: &str, word: &str) -> bool {
    haystack
        .split(|c: char| !c.is_ascii_alphanumeric() && c != '_' && c != '-')
        .any(|token| token.eq_ignore_ascii_case(word))
}
