// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidewalk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidewalk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Collaborators that report what they were asked to do as `tracing` events. Used by the CLI's
//! `run` command to dry-run a step against a rendered diagram.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tracing::info;

use super::{
    BubbleRequest, CameraHandle, CollaboratorError, Controller, FitOptions, FitTarget, GotoTarget,
    OverlayHandle,
};

#[derive(Debug, Default)]
pub struct LoggingCamera;

#[async_trait]
impl CameraHandle for LoggingCamera {
    async fn fit(&self, target: FitTarget, options: FitOptions) -> Result<(), CollaboratorError> {
        info!(
            element = %target.element,
            bounds = ?target.bounds,
            padding = ?options.padding,
            duration_ms = ?options.duration_ms,
            easing = ?options.easing,
            "camera.fit"
        );
        Ok(())
    }

    async fn reset(&self) -> Result<(), CollaboratorError> {
        info!("camera.reset");
        Ok(())
    }

    async fn fit_all(&self, padding: Option<f64>) -> Result<(), CollaboratorError> {
        info!(padding = ?padding, "camera.fitAll");
        Ok(())
    }

    async fn destroy(&self) {}
}

#[derive(Debug, Default)]
pub struct LoggingOverlay;

#[async_trait]
impl OverlayHandle for LoggingOverlay {
    async fn show_bubble(&self, request: BubbleRequest) -> Result<(), CollaboratorError> {
        info!(
            id = ?request.id,
            element = %request.target.element,
            bounds = ?request.target.bounds,
            text = %request.text,
            "overlay.bubble"
        );
        Ok(())
    }

    async fn hide_bubble(&self, id: Option<&str>) -> Result<(), CollaboratorError> {
        info!(id = ?id, "overlay.hide");
        Ok(())
    }

    async fn destroy(&self) {}
}

/// Tracks a step index without bounds; `goto` by id only logs.
#[derive(Debug, Default)]
pub struct LoggingController {
    position: AtomicU64,
}

impl LoggingController {
    pub fn position(&self) -> u64 {
        self.position.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Controller for LoggingController {
    async fn next(&self) -> Result<(), CollaboratorError> {
        let position = self.position.fetch_add(1, Ordering::Relaxed) + 1;
        info!(position, "nav.next");
        Ok(())
    }

    async fn prev(&self) -> Result<(), CollaboratorError> {
        let previous = self
            .position
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |p| Some(p.saturating_sub(1)))
            .unwrap_or_default();
        info!(position = previous.saturating_sub(1), "nav.prev");
        Ok(())
    }

    async fn goto(&self, target: GotoTarget) -> Result<(), CollaboratorError> {
        if let GotoTarget::Index(index) = &target {
            self.position.store(*index, Ordering::Relaxed);
        }
        info!(target = %target, "nav.goto");
        Ok(())
    }

    async fn reset(&self) -> Result<(), CollaboratorError> {
        self.position.store(0, Ordering::Relaxed);
        info!("nav.reset");
        Ok(())
    }
}
