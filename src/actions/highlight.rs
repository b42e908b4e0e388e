// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidewalk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidewalk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::{Arc, Mutex};

use tracing::trace;

use crate::dom::{Document, ElementId};

/// Highlight state owned by one handler set.
pub type SharedHighlight = Arc<Mutex<HighlightState>>;

/// The class currently applied and the elements it was added to.
///
/// Only elements that did not already carry the class are recorded, so clearing never strips a
/// class the markup was rendered with. Element ids are tied to the document generation they were
/// applied in; after a re-render the recorded set is dropped without touching the new document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightState {
    class: Option<String>,
    elements: Vec<ElementId>,
    generation: Option<u64>,
}

impl HighlightState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    pub fn elements(&self) -> &[ElementId] {
        &self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Clears the previous highlight, then adds `class` to `elements`.
    pub fn apply(
        &mut self,
        doc: &mut Document,
        class: &str,
        elements: impl IntoIterator<Item = ElementId>,
    ) {
        self.clear(doc);
        let applied = elements
            .into_iter()
            .filter(|&element| doc.add_class(element, class))
            .collect::<Vec<_>>();
        trace!(class, count = applied.len(), "highlight applied");
        self.class = Some(class.to_owned());
        self.elements = applied;
        self.generation = Some(doc.generation());
    }

    pub fn clear(&mut self, doc: &mut Document) {
        let elements = std::mem::take(&mut self.elements);
        let class = self.class.take();
        let generation = self.generation.take();
        let Some(class) = class else {
            return;
        };
        if generation != Some(doc.generation()) {
            trace!(class = %class, "highlight belongs to a replaced document");
            return;
        }
        for element in elements {
            doc.remove_class(element, &class);
        }
    }
}
