// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidewalk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidewalk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Step actions: the handler seam, the default handler set and the engine that sequences them.

mod engine;
mod handlers;
mod highlight;

#[cfg(test)]
mod tests;

use std::fmt;

use async_trait::async_trait;

use crate::handle::{CameraHandle, CollaboratorError, Controller, DiagramHandle, OverlayHandle};
use crate::model::ActionDefinition;
use crate::strategy::RegistryError;

pub use engine::StepActionEngine;
pub use handlers::{
    default_handlers, CameraFitAllHandler, CameraFitHandler, CameraResetHandler, NavCommand,
    NavHandler, OverlayBubbleHandler, OverlayHideHandler, StyleClearHandler,
    StyleHighlightHandler, WaitHandler,
};
pub use highlight::{HighlightState, SharedHighlight};

/// What a handler may touch during one run. Supplied by the caller; the engine keeps nothing.
#[derive(Clone, Copy)]
pub struct ActionContext<'a> {
    pub diagram: &'a dyn DiagramHandle,
    pub camera: Option<&'a dyn CameraHandle>,
    pub overlay: Option<&'a dyn OverlayHandle>,
    pub controller: &'a dyn Controller,
}

impl<'a> ActionContext<'a> {
    pub fn new(diagram: &'a dyn DiagramHandle, controller: &'a dyn Controller) -> Self {
        Self { diagram, camera: None, overlay: None, controller }
    }

    pub fn with_camera(mut self, camera: &'a dyn CameraHandle) -> Self {
        self.camera = Some(camera);
        self
    }

    pub fn with_overlay(mut self, overlay: &'a dyn OverlayHandle) -> Self {
        self.overlay = Some(overlay);
        self
    }
}

impl fmt::Debug for ActionContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionContext")
            .field("diagram_type", &self.diagram.diagram_type())
            .field("camera", &self.camera.is_some())
            .field("overlay", &self.overlay.is_some())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionError {
    UnknownAction(String),
    InvalidArgs(String),
    Configuration(RegistryError),
    Collaborator(CollaboratorError),
}

impl ActionError {
    pub fn invalid_args(message: impl Into<String>) -> Self {
        Self::InvalidArgs(message.into())
    }

    pub fn is_invalid_args(&self) -> bool {
        matches!(self, Self::InvalidArgs(_))
    }
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownAction(name) => write!(f, "unknown action `{name}`"),
            Self::InvalidArgs(message) => write!(f, "invalid arguments: {message}"),
            Self::Configuration(err) => write!(f, "configuration error: {err}"),
            Self::Collaborator(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ActionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Configuration(err) => Some(err),
            Self::Collaborator(err) => Some(err),
            Self::UnknownAction(_) | Self::InvalidArgs(_) => None,
        }
    }
}

impl From<RegistryError> for ActionError {
    fn from(err: RegistryError) -> Self {
        Self::Configuration(err)
    }
}

impl From<CollaboratorError> for ActionError {
    fn from(err: CollaboratorError) -> Self {
        Self::Collaborator(err)
    }
}

/// One failed action of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionFailure {
    /// Position in the action list passed to [`StepActionEngine::run`].
    pub index: usize,
    pub action: String,
    pub error: ActionError,
}

impl fmt::Display for ActionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "action #{} `{}`: {}", self.index, self.action, self.error)
    }
}

impl std::error::Error for ActionFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

#[async_trait]
pub trait ActionHandler: Send + Sync {
    async fn handle(
        &self,
        action: &ActionDefinition,
        ctx: &ActionContext<'_>,
    ) -> Result<(), ActionError>;
}
