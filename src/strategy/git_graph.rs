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

use super::NodeIdMap;
use crate::dom::{css_escape_ident, css_escape_string, Document};

const COMMITS: &str = "circle.commit";

/// Git graphs: the commit id travels as a class token on the commit circle
/// (`class="commit 0-a1b2c3d commit0"`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GitGraphStrategy;

/// Styling tokens that share the commit circle with the id token.
fn styling_token() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^commit(\d+|-.*)$").expect("static commit class pattern"))
}

impl GitGraphStrategy {
    pub const TARGETABLE_CLASSES: &'static [&'static str] = &["commit"];
    pub const TARGETABLE_TAGS: &'static [&'static str] = &["circle"];

    pub fn new() -> Self {
        Self
    }

    pub fn commit_id(class_list: &str) -> Option<&str> {
        class_list
            .split_ascii_whitespace()
            .find(|token| *token != "commit" && !styling_token().is_match(token))
    }

    pub fn extract_node_ids(&self, doc: &Document) -> NodeIdMap {
        let mut map = NodeIdMap::new();
        let Ok(commits) = doc.select(COMMITS) else {
            return map;
        };
        for commit in commits {
            let Some(id) = doc.get(commit).and_then(|el| el.attr("class")).and_then(Self::commit_id)
            else {
                continue;
            };
            map.insert(id, commit);
        }
        debug!(targets = map.len(), "extracted git graph commits");
        map
    }

    pub fn target_selectors(id: &str) -> Vec<String> {
        vec![
            format!("{COMMITS}.{}", css_escape_ident(id)),
            format!("[class~=\"{}\"]", css_escape_string(id)),
        ]
    }
}
