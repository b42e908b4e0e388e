// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidewalk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidewalk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Owned view of a rendered diagram document.
//!
//! The rendering engine hands us SVG (sometimes with XHTML inside `foreignObject`). We parse it
//! once into an arena laid out in document order, so descendants of an element are a contiguous
//! index range and "document order" is simply index order.

pub mod geometry;
mod parse;
pub mod selector;

use std::fmt;
use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};

use smol_str::SmolStr;

pub use geometry::BBox;
pub use selector::{css_escape_ident, css_escape_string, Selector, SelectorError};

/// Elements whose text reads as a separate line or box rather than running into its neighbours.
const BLOCK_TAGS: &[&str] = &[
    "svg", "g", "text", "foreignObject", "title", "desc", "div", "p", "br", "li", "td", "th",
    "h1", "h2", "h3", "h4", "h5", "h6",
];

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// Handle to one element of a [`Document`].
///
/// Only meaningful together with the document (and generation) it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u32);

impl ElementId {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    fn from_index(index: usize) -> Self {
        Self(index as u32)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: SmolStr,
    attributes: Vec<(SmolStr, String)>,
    text: String,
    tail: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    subtree_end: u32,
}

impl Element {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The rendered `id` attribute, if any.
    pub fn id(&self) -> Option<&str> {
        self.attr("id").filter(|id| !id.is_empty())
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or_default().split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    pub fn has_any_class(&self, classes: &[&str]) -> bool {
        self.classes().any(|c| classes.contains(&c))
    }

    /// Text inside this element before its first child element.
    pub fn leading_text(&self) -> &str {
        &self.text
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    fn set_attr(&mut self, name: &str, value: String) {
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, slot)) => *slot = value,
            None => self.attributes.push((SmolStr::new(name), value)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentError {
    message: String,
}

impl DocumentError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse rendered document: {}", self.message)
    }
}

impl std::error::Error for DocumentError {}

/// A rendered document, laid out in document order.
#[derive(Debug, Clone)]
pub struct Document {
    generation: u64,
    elements: Vec<Element>,
}

impl Document {
    /// Parses SVG (or XHTML) markup produced by the rendering engine.
    pub fn parse(markup: &str) -> Result<Self, DocumentError> {
        let elements = parse::parse_elements(markup)?;
        Ok(Self { generation: next_generation(), elements })
    }

    /// Unique per parsed document; a re-render always yields a new generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn root(&self) -> ElementId {
        ElementId(0)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.index())
    }

    pub fn contains(&self, id: ElementId) -> bool {
        id.index() < self.elements.len()
    }

    /// Every element in document order, root included.
    pub fn elements(&self) -> impl Iterator<Item = (ElementId, &Element)> + '_ {
        self.elements
            .iter()
            .enumerate()
            .map(|(index, element)| (ElementId::from_index(index), element))
    }

    /// Descendants of `id` in document order, `id` itself excluded.
    pub fn descendants(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        self.subtree_range(id)
            .skip(1)
            .map(ElementId::from_index)
    }

    /// Ancestors of `id` from the parent up to the root, `id` itself excluded.
    pub fn ancestors(&self, id: ElementId) -> Ancestors<'_> {
        Ancestors { doc: self, next: self.get(id).and_then(Element::parent) }
    }

    pub fn is_ancestor_of(&self, ancestor: ElementId, id: ElementId) -> bool {
        ancestor != id && self.subtree_range(ancestor).contains(&id.index())
    }

    fn subtree_range(&self, id: ElementId) -> Range<usize> {
        match self.get(id) {
            Some(element) => id.index()..element.subtree_end as usize,
            None => 0..0,
        }
    }

    /// All text beneath `id` in document order.
    ///
    /// Inline markup (`tspan`, `strong`, `span`, ...) joins its text with its neighbours the way
    /// DOM `textContent` does; block-level elements (`text`, `g`, `p`, `div`, ...) are separated
    /// by a space. ASCII whitespace runs collapse to one space and the ends are trimmed.
    pub fn text_content(&self, id: ElementId) -> String {
        let mut raw = String::new();
        if self.contains(id) {
            self.collect_text(id, &mut raw);
        }
        raw.split_ascii_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn collect_text(&self, id: ElementId, out: &mut String) {
        let element = &self.elements[id.index()];
        let block = BLOCK_TAGS.contains(&element.tag());
        if block {
            out.push(' ');
        }
        out.push_str(&element.text);
        for &child in &element.children {
            self.collect_text(child, out);
            out.push_str(&self.elements[child.index()].tail);
        }
        if block {
            out.push(' ');
        }
    }

    /// Adds `class` to the element's class list. Returns `false` if it was already present or the
    /// element does not exist.
    pub fn add_class(&mut self, id: ElementId, class: &str) -> bool {
        let Some(element) = self.elements.get_mut(id.index()) else {
            return false;
        };
        if class.is_empty() || element.has_class(class) {
            return false;
        }
        let mut value = element.attr("class").unwrap_or_default().trim().to_owned();
        if !value.is_empty() {
            value.push(' ');
        }
        value.push_str(class);
        element.set_attr("class", value);
        true
    }

    pub fn remove_class(&mut self, id: ElementId, class: &str) -> bool {
        let Some(element) = self.elements.get_mut(id.index()) else {
            return false;
        };
        if !element.has_class(class) {
            return false;
        }
        let value = element.classes().filter(|c| *c != class).collect::<Vec<_>>().join(" ");
        element.set_attr("class", value);
        true
    }

    /// Elements matching `selector`, in document order.
    pub fn select(&self, selector: &str) -> Result<Vec<ElementId>, SelectorError> {
        let selector = Selector::parse(selector)?;
        Ok(self.select_parsed(&selector))
    }

    pub fn select_parsed(&self, selector: &Selector) -> Vec<ElementId> {
        self.elements()
            .map(|(id, _)| id)
            .filter(|id| selector.matches(self, *id))
            .collect()
    }

    /// Like [`Document::select`], restricted to descendants of `scope`.
    pub fn select_within(
        &self,
        scope: ElementId,
        selector: &Selector,
    ) -> impl Iterator<Item = ElementId> + '_ {
        let selector = selector.clone();
        self.descendants(scope).filter(move |id| selector.matches(self, *id))
    }

    /// Bounding box in document coordinates. `None` for elements with no measurable geometry.
    pub fn bbox(&self, id: ElementId) -> Option<BBox> {
        geometry::element_bbox(self, id)
    }
}

pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<ElementId>,
}

impl Iterator for Ancestors<'_> {
    type Item = ElementId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.get(current).and_then(Element::parent);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::Document;

    const SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg">
  <g class="root">
    <g class="node default" id="flowchart-A-0" data-id="A">
      <rect x="0" y="0" width="10" height="10"/>
      <text><tspan>Start</tspan> <tspan>here</tspan></text>
    </g>
    <g class="node default" id="flowchart-B-1" data-id="B"/>
  </g>
</svg>"#;

    #[test]
    fn arena_is_in_document_order() {
        let doc = Document::parse(SVG).expect("parse");
        let tags = doc.elements().map(|(_, el)| el.tag().to_owned()).collect::<Vec<_>>();
        assert_eq!(tags, vec!["svg", "g", "g", "rect", "text", "tspan", "tspan", "g"]);
    }

    #[test]
    fn descendants_and_ancestors_follow_structure() {
        let doc = Document::parse(SVG).expect("parse");
        let node_a = doc.select("#flowchart-A-0").expect("select")[0];
        assert_eq!(doc.descendants(node_a).count(), 4);

        let tspan = doc.select("tspan").expect("select")[0];
        let ancestor_tags = doc
            .ancestors(tspan)
            .map(|id| doc.get(id).expect("element").tag().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(ancestor_tags, vec!["text", "g", "g", "svg"]);
        assert!(doc.is_ancestor_of(node_a, tspan));
        assert!(!doc.is_ancestor_of(tspan, node_a));
    }

    #[test]
    fn text_content_joins_segments() {
        let doc = Document::parse(SVG).expect("parse");
        let node_a = doc.select("[data-id=\"A\"]").expect("select")[0];
        assert_eq!(doc.text_content(node_a), "Start here");
    }

    #[test]
    fn text_content_interleaves_inline_markup() {
        let doc = Document::parse(
            r#"<svg xmlns="http://www.w3.org/2000/svg"><g class="node"><text id="a">Hello <tspan>big</tspan> world</text></g><text id="b">Hel<tspan>lo</tspan></text></svg>"#,
        )
        .expect("parse");
        let a = doc.select("#a").expect("select")[0];
        let b = doc.select("#b").expect("select")[0];
        assert_eq!(doc.text_content(a), "Hello big world");
        assert_eq!(doc.text_content(b), "Hello");

        let group = doc.select("g.node").expect("select")[0];
        assert_eq!(doc.text_content(group), "Hello big world");
    }

    #[test]
    fn text_content_separates_block_elements() {
        let doc = Document::parse(
            r#"<svg xmlns="http://www.w3.org/2000/svg"><g id="g"><text>Outer</text><g><text>Inner</text></g></g></svg>"#,
        )
        .expect("parse");
        let group = doc.select("#g").expect("select")[0];
        assert_eq!(doc.text_content(group), "Outer Inner");
    }

    #[test]
    fn class_mutation_keeps_other_classes() {
        let mut doc = Document::parse(SVG).expect("parse");
        let node_a = doc.select("#flowchart-A-0").expect("select")[0];

        assert!(doc.add_class(node_a, "hl"));
        assert!(!doc.add_class(node_a, "hl"));
        assert_eq!(doc.get(node_a).and_then(|el| el.attr("class")), Some("node default hl"));

        assert!(doc.remove_class(node_a, "hl"));
        assert!(!doc.remove_class(node_a, "hl"));
        assert_eq!(doc.get(node_a).and_then(|el| el.attr("class")), Some("node default"));
    }

    #[test]
    fn every_parse_gets_a_fresh_generation() {
        let first = Document::parse(SVG).expect("parse");
        let second = Document::parse(SVG).expect("parse");
        assert_ne!(first.generation(), second.generation());
    }

    #[test]
    fn rejects_malformed_markup() {
        assert!(Document::parse("<svg><g></svg>").is_err());
    }
}
