// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidewalk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidewalk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use super::label::{normalize_label, LabelAllocator};
use super::{logical_id_selector, NodeIdMap};
use crate::dom::{css_escape_string, Document};

const SLICES: &str = "path.pieCircle";
const LEGEND_LABELS: &str = "g.legend text";

/// Pie charts: slice paths carry no identifier, so each slice takes the label of the legend entry
/// at the same position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PieStrategy;

fn value_suffix() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s*\[[^\]]*\]\s*$").expect("static pie value pattern"))
}

impl PieStrategy {
    pub const TARGETABLE_CLASSES: &'static [&'static str] = &["pieCircle", "legend"];
    pub const TARGETABLE_TAGS: &'static [&'static str] = &["path", "g"];

    pub fn new() -> Self {
        Self
    }

    pub fn extract_node_ids(&self, doc: &Document) -> NodeIdMap {
        let mut map = NodeIdMap::new();
        let (Ok(slices), Ok(legend)) = (doc.select(SLICES), doc.select(LEGEND_LABELS)) else {
            return map;
        };

        let mut labels = LabelAllocator::default();
        for (index, slice) in slices.iter().enumerate() {
            // `showData` appends the value as ` [386]`.
            let label = legend
                .get(index)
                .map(|text| {
                    let raw = doc.text_content(*text);
                    normalize_label(&value_suffix().replace(&raw, ""))
                })
                .filter(|label| !label.is_empty())
                .unwrap_or_else(|| format!("slice_{}", index + 1));
            let id = labels.allocate(label, &map);
            map.insert(id, *slice);
        }

        if slices.len() != legend.len() {
            debug!(slices = slices.len(), legend = legend.len(), "pie legend does not pair up");
        }
        map
    }

    pub fn target_selectors(id: &str) -> Vec<String> {
        vec![
            format!("{SLICES}[data-id=\"{}\"]", css_escape_string(id)),
            logical_id_selector(id),
        ]
    }
}
