// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidewalk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidewalk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Cow;

use smol_str::SmolStr;

use super::{DocumentError, Element, ElementId};

/// HTML entities that show up inside `foreignObject` labels but are not predefined in XML.
const HTML_ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", "&#160;"),
    ("&ndash;", "&#8211;"),
    ("&mdash;", "&#8212;"),
    ("&hellip;", "&#8230;"),
    ("&copy;", "&#169;"),
    ("&laquo;", "&#171;"),
    ("&raquo;", "&#187;"),
];

fn normalize_entities(markup: &str) -> Cow<'_, str> {
    if !HTML_ENTITIES.iter().any(|(name, _)| markup.contains(name)) {
        return Cow::Borrowed(markup);
    }
    let mut out = markup.to_owned();
    for (name, numeric) in HTML_ENTITIES {
        if out.contains(name) {
            out = out.replace(name, numeric);
        }
    }
    Cow::Owned(out)
}

pub(super) fn parse_elements(markup: &str) -> Result<Vec<Element>, DocumentError> {
    let markup = normalize_entities(markup);
    let parsed =
        roxmltree::Document::parse(&markup).map_err(|err| DocumentError::new(err.to_string()))?;

    let mut elements = Vec::new();
    push_element(parsed.root_element(), None, &mut elements);
    Ok(elements)
}

fn push_element(
    node: roxmltree::Node<'_, '_>,
    parent: Option<ElementId>,
    out: &mut Vec<Element>,
) -> ElementId {
    let id = ElementId::from_index(out.len());
    out.push(Element {
        tag: SmolStr::new(node.tag_name().name()),
        attributes: node
            .attributes()
            .map(|attr| (SmolStr::new(attr.name()), attr.value().to_owned()))
            .collect(),
        text: String::new(),
        tail: String::new(),
        parent,
        children: Vec::new(),
        subtree_end: 0,
    });

    // Text before the first child element stays on this element; text after a child is that
    // child's tail, so the original interleaving can be replayed.
    let mut text = String::new();
    let mut children: Vec<ElementId> = Vec::new();
    for child in node.children() {
        if child.is_element() {
            children.push(push_element(child, Some(id), out));
        } else if let Some(segment) = child.text().filter(|_| child.is_text()) {
            match children.last() {
                Some(previous) => out[previous.index()].tail.push_str(segment),
                None => text.push_str(segment),
            }
        }
    }

    let subtree_end = out.len() as u32;
    let element = &mut out[id.index()];
    element.text = text;
    element.children = children;
    element.subtree_end = subtree_end;
    id
}
