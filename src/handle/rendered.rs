// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidewalk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidewalk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use tracing::debug;

use super::DiagramHandle;
use crate::detect::detect_diagram_type;
use crate::dom::{Document, DocumentError, ElementId};
use crate::model::DiagramType;

/// Diagram source plus the markup the engine rendered for it.
#[derive(Debug)]
pub struct RenderedDiagram {
    source: String,
    diagram_type: DiagramType,
    document: RwLock<Document>,
    destroyed: AtomicBool,
}

impl RenderedDiagram {
    pub fn new(source: impl Into<String>, markup: &str) -> Result<Self, DocumentError> {
        let source = source.into();
        let diagram_type = detect_diagram_type(&source);
        let document = Document::parse(markup)?;
        debug!(diagram_type = %diagram_type, elements = document.len(), "diagram rendered");
        Ok(Self {
            source,
            diagram_type,
            document: RwLock::new(document),
            destroyed: AtomicBool::new(false),
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Swaps in freshly rendered markup. Element ids handed out for the previous document are
    /// not valid against the new one.
    pub fn replace_svg(&self, markup: &str) -> Result<(), DocumentError> {
        let document = Document::parse(markup)?;
        let mut slot = self.document.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        debug!(
            previous = slot.generation(),
            next = document.generation(),
            "diagram re-rendered"
        );
        *slot = document;
        Ok(())
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::Acquire)
    }
}

impl DiagramHandle for RenderedDiagram {
    fn diagram_type(&self) -> DiagramType {
        self.diagram_type
    }

    fn document(&self) -> &RwLock<Document> {
        &self.document
    }

    fn container(&self) -> ElementId {
        self.document.read().unwrap_or_else(|poisoned| poisoned.into_inner()).root()
    }

    fn destroy(&self) {
        self.destroyed.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::RenderedDiagram;
    use crate::handle::DiagramHandle;
    use crate::model::DiagramType;

    #[test]
    fn detects_type_and_replaces_markup() {
        let diagram = RenderedDiagram::new(
            "flowchart LR\nA --> B",
            r#"<svg xmlns="http://www.w3.org/2000/svg"><g class="node" id="flowchart-A-0"/></svg>"#,
        )
        .expect("diagram");
        assert_eq!(diagram.diagram_type(), DiagramType::Flowchart);
        let before = diagram.document().read().expect("lock").generation();

        diagram
            .replace_svg(r#"<svg xmlns="http://www.w3.org/2000/svg"><g/><g/></svg>"#)
            .expect("replace");
        let doc = diagram.document().read().expect("lock");
        assert_ne!(doc.generation(), before);
        assert_eq!(doc.len(), 3);
    }

    #[test]
    fn failed_replace_keeps_the_previous_document() {
        let diagram =
            RenderedDiagram::new("pie", r#"<svg xmlns="http://www.w3.org/2000/svg"/>"#).expect("diagram");
        let before = diagram.document().read().expect("lock").generation();
        assert!(diagram.replace_svg("<svg><unclosed></svg>").is_err());
        assert_eq!(diagram.document().read().expect("lock").generation(), before);
    }

    #[test]
    fn destroy_is_observable() {
        let diagram =
            RenderedDiagram::new("pie", r#"<svg xmlns="http://www.w3.org/2000/svg"/>"#).expect("diagram");
        assert!(!diagram.is_destroyed());
        diagram.destroy();
        assert!(diagram.is_destroyed());
    }
}
