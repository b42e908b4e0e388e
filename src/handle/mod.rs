// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidewalk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidewalk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Boundaries to the collaborators this crate drives but does not own: the rendered diagram, the
//! camera, the callout overlay and the step controller.
//!
//! Implementations live with the embedding application. [`RenderedDiagram`] is the in-crate
//! diagram handle; [`logging`] provides collaborators that only emit `tracing` events.

pub mod logging;
mod rendered;

use std::fmt;
use std::sync::RwLock;

use async_trait::async_trait;
use smallvec::SmallVec;

use crate::dom::{BBox, Document, ElementId};
use crate::model::{DiagramType, TargetDescriptor};

pub use rendered::RenderedDiagram;

/// Elements a target resolves to. Usually one.
pub type Elements = SmallVec<[ElementId; 4]>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    /// The collaborator does not implement this optional operation.
    Unsupported(&'static str),
    /// The collaborator was destroyed before the call.
    Destroyed(&'static str),
    Failed { collaborator: &'static str, message: String },
}

impl CollaboratorError {
    pub fn failed(collaborator: &'static str, message: impl Into<String>) -> Self {
        Self::Failed { collaborator, message: message.into() }
    }
}

impl fmt::Display for CollaboratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported(operation) => write!(f, "operation `{operation}` is not supported"),
            Self::Destroyed(collaborator) => write!(f, "{collaborator} was destroyed"),
            Self::Failed { collaborator, message } => write!(f, "{collaborator} failed: {message}"),
        }
    }
}

impl std::error::Error for CollaboratorError {}

/// The element to frame, with its document-space box when it has one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitTarget {
    pub element: ElementId,
    pub bounds: Option<BBox>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FitOptions {
    pub padding: Option<f64>,
    pub duration_ms: Option<u64>,
    pub easing: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BubbleRequest {
    pub id: Option<String>,
    pub target: FitTarget,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GotoTarget {
    Index(u64),
    Id(String),
}

impl fmt::Display for GotoTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "#{index}"),
            Self::Id(id) => f.write_str(id),
        }
    }
}

/// A rendered diagram instance.
///
/// The document can be replaced wholesale by a re-render at any time; callers take the read lock
/// per operation and never hold it across an `.await`.
pub trait DiagramHandle: Send + Sync {
    fn diagram_type(&self) -> DiagramType;

    fn document(&self) -> &RwLock<Document>;

    /// The element the diagram is mounted in.
    fn container(&self) -> ElementId;

    /// Lets a handle answer resolution itself (test doubles do). `None` defers to the strategy.
    /// May be called while the document read lock is held.
    fn resolve_target(&self, _target: &TargetDescriptor) -> Option<Elements> {
        None
    }

    fn destroy(&self);
}

#[async_trait]
pub trait CameraHandle: Send + Sync {
    async fn fit(&self, target: FitTarget, options: FitOptions) -> Result<(), CollaboratorError>;

    async fn reset(&self) -> Result<(), CollaboratorError>;

    async fn fit_all(&self, _padding: Option<f64>) -> Result<(), CollaboratorError> {
        Err(CollaboratorError::Unsupported("camera.fitAll"))
    }

    async fn destroy(&self);
}

#[async_trait]
pub trait OverlayHandle: Send + Sync {
    async fn show_bubble(&self, request: BubbleRequest) -> Result<(), CollaboratorError>;

    async fn hide_bubble(&self, id: Option<&str>) -> Result<(), CollaboratorError>;

    async fn destroy(&self);
}

#[async_trait]
pub trait Controller: Send + Sync {
    async fn next(&self) -> Result<(), CollaboratorError>;

    async fn prev(&self) -> Result<(), CollaboratorError>;

    async fn goto(&self, target: GotoTarget) -> Result<(), CollaboratorError>;

    async fn reset(&self) -> Result<(), CollaboratorError>;
}
