// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidewalk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidewalk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The built-in handler for each name in [`ActionName`].
//!
//! Camera and overlay handlers need a concrete element and fail with invalid arguments when the
//! target does not resolve. Highlighting treats an unresolved target as an empty set. A missing
//! camera or overlay turns the corresponding actions into no-ops.

use std::sync::{Arc, MutexGuard, RwLockWriteGuard};
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::highlight::{HighlightState, SharedHighlight};
use super::{ActionContext, ActionError, ActionHandler};
use crate::config::{CameraDefaults, TidewalkConfig};
use crate::dom::Document;
use crate::handle::{BubbleRequest, CollaboratorError, DiagramHandle, FitOptions, FitTarget, GotoTarget};
use crate::model::{
    ActionDefinition, ActionName, BubblePayload, CameraFitAllPayload, CameraFitPayload,
    GotoPayload, HidePayload, HighlightPayload, TargetDescriptor, WaitPayload,
};
use crate::resolve::TargetResolver;

fn payload<T: DeserializeOwned>(action: &ActionDefinition) -> Result<T, ActionError> {
    action
        .payload_as()
        .map_err(|err| ActionError::invalid_args(format!("`{}` payload: {err}", action.name)))
}

fn lock_highlight(highlight: &SharedHighlight) -> MutexGuard<'_, HighlightState> {
    highlight.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_document(diagram: &dyn DiagramHandle) -> RwLockWriteGuard<'_, Document> {
    diagram.document().write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Resolves `target` to its first element plus that element's box.
fn resolve_fit_target(
    resolver: &TargetResolver,
    diagram: &dyn DiagramHandle,
    action: ActionName,
    target: Option<&TargetDescriptor>,
) -> Result<FitTarget, ActionError> {
    let Some(target) = target else {
        return Err(ActionError::invalid_args(format!("`{action}` requires a `target`")));
    };
    let resolution = resolver.resolve(diagram, target)?;
    let Some(element) = resolution.first() else {
        let suggestion = resolver.closest_known_id(diagram, target.id().as_str());
        warn!(action = %action, target = %target, suggestion = ?suggestion, "target did not resolve");
        let hint = suggestion.map(|id| format!(" (did you mean `{id}`?)")).unwrap_or_default();
        return Err(ActionError::invalid_args(format!(
            "`{action}` target `{target}` did not resolve{hint}"
        )));
    };
    let doc = diagram.document().read().unwrap_or_else(|poisoned| poisoned.into_inner());
    let bounds = (doc.generation() == resolution.generation())
        .then(|| doc.bbox(element))
        .flatten();
    Ok(FitTarget { element, bounds })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    Next,
    Prev,
    Reset,
    Goto,
}

/// `nav.*`: forwards to the controller.
#[derive(Debug, Clone, Copy)]
pub struct NavHandler(pub NavCommand);

#[async_trait]
impl ActionHandler for NavHandler {
    async fn handle(
        &self,
        action: &ActionDefinition,
        ctx: &ActionContext<'_>,
    ) -> Result<(), ActionError> {
        match self.0 {
            NavCommand::Next => ctx.controller.next().await?,
            NavCommand::Prev => ctx.controller.prev().await?,
            NavCommand::Reset => ctx.controller.reset().await?,
            NavCommand::Goto => {
                let args: GotoPayload = payload(action)?;
                let target = match (args.index, args.id) {
                    (Some(index), _) => GotoTarget::Index(index),
                    (None, Some(id)) if !id.trim().is_empty() => GotoTarget::Id(id),
                    _ => {
                        return Err(ActionError::invalid_args(
                            "`nav.goto` requires an `index` or an `id`",
                        ))
                    }
                };
                ctx.controller.goto(target).await?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CameraFitHandler {
    resolver: TargetResolver,
    defaults: CameraDefaults,
}

impl CameraFitHandler {
    pub fn new(resolver: TargetResolver, defaults: CameraDefaults) -> Self {
        Self { resolver, defaults }
    }
}

#[async_trait]
impl ActionHandler for CameraFitHandler {
    async fn handle(
        &self,
        action: &ActionDefinition,
        ctx: &ActionContext<'_>,
    ) -> Result<(), ActionError> {
        let Some(camera) = ctx.camera else {
            debug!("no camera; camera.fit skipped");
            return Ok(());
        };
        let args: CameraFitPayload = payload(action)?;
        let target = resolve_fit_target(
            &self.resolver,
            ctx.diagram,
            ActionName::CameraFit,
            args.target.as_ref(),
        )?;
        let options = FitOptions {
            padding: Some(args.padding.unwrap_or(self.defaults.padding)),
            duration_ms: Some(args.duration.unwrap_or(self.defaults.duration_ms)),
            easing: Some(args.easing.unwrap_or_else(|| self.defaults.easing.clone())),
        };
        camera.fit(target, options).await?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CameraResetHandler;

#[async_trait]
impl ActionHandler for CameraResetHandler {
    async fn handle(
        &self,
        _action: &ActionDefinition,
        ctx: &ActionContext<'_>,
    ) -> Result<(), ActionError> {
        match ctx.camera {
            Some(camera) => camera.reset().await?,
            None => debug!("no camera; camera.reset skipped"),
        }
        Ok(())
    }
}

/// `camera.fitAll`: resets the camera when the collaborator cannot frame everything.
#[derive(Debug, Clone, Copy)]
pub struct CameraFitAllHandler {
    padding: f64,
}

impl CameraFitAllHandler {
    pub fn new(padding: f64) -> Self {
        Self { padding }
    }
}

#[async_trait]
impl ActionHandler for CameraFitAllHandler {
    async fn handle(
        &self,
        action: &ActionDefinition,
        ctx: &ActionContext<'_>,
    ) -> Result<(), ActionError> {
        let Some(camera) = ctx.camera else {
            debug!("no camera; camera.fitAll skipped");
            return Ok(());
        };
        let args: CameraFitAllPayload = payload(action)?;
        match camera.fit_all(Some(args.padding.unwrap_or(self.padding))).await {
            Err(CollaboratorError::Unsupported(operation)) => {
                debug!(operation, "falling back to camera.reset");
                camera.reset().await?;
            }
            result => result?,
        }
        Ok(())
    }
}

/// `overlay.bubble`: shows a callout at the first element `target` resolves to.
///
/// Invalid-args when the target is missing or unresolvable, and also when `text` is absent or
/// blank, since an empty callout has nothing to show. Without an overlay the action is a no-op.
#[derive(Debug, Clone)]
pub struct OverlayBubbleHandler {
    resolver: TargetResolver,
}

impl OverlayBubbleHandler {
    pub fn new(resolver: TargetResolver) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl ActionHandler for OverlayBubbleHandler {
    async fn handle(
        &self,
        action: &ActionDefinition,
        ctx: &ActionContext<'_>,
    ) -> Result<(), ActionError> {
        let Some(overlay) = ctx.overlay else {
            debug!("no overlay; overlay.bubble skipped");
            return Ok(());
        };
        let args: BubblePayload = payload(action)?;
        if args.text.trim().is_empty() {
            return Err(ActionError::invalid_args("`overlay.bubble` requires a non-empty `text`"));
        }
        let target = resolve_fit_target(
            &self.resolver,
            ctx.diagram,
            ActionName::OverlayBubble,
            args.target.as_ref(),
        )?;
        overlay.show_bubble(BubbleRequest { id: args.id, target, text: args.text }).await?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OverlayHideHandler;

#[async_trait]
impl ActionHandler for OverlayHideHandler {
    async fn handle(
        &self,
        action: &ActionDefinition,
        ctx: &ActionContext<'_>,
    ) -> Result<(), ActionError> {
        let Some(overlay) = ctx.overlay else {
            debug!("no overlay; overlay.hide skipped");
            return Ok(());
        };
        let args: HidePayload = payload(action)?;
        overlay.hide_bubble(args.id.as_deref()).await?;
        Ok(())
    }
}

/// `style.highlight`: replaces the shared highlight with the union of the payload's targets.
#[derive(Debug, Clone)]
pub struct StyleHighlightHandler {
    resolver: TargetResolver,
    highlight: SharedHighlight,
    class: String,
}

impl StyleHighlightHandler {
    pub fn new(resolver: TargetResolver, highlight: SharedHighlight, class: impl Into<String>) -> Self {
        Self { resolver, highlight, class: class.into() }
    }
}

#[async_trait]
impl ActionHandler for StyleHighlightHandler {
    async fn handle(
        &self,
        action: &ActionDefinition,
        ctx: &ActionContext<'_>,
    ) -> Result<(), ActionError> {
        let args: HighlightPayload = payload(action)?;
        let class = args.class.as_deref().unwrap_or(&self.class);
        if class.is_empty() || class.contains(char::is_whitespace) {
            return Err(ActionError::invalid_args(format!(
                "`style.highlight` class `{class}` is not a single class name"
            )));
        }

        let resolution = self.resolver.resolve_many(ctx.diagram, args.all_targets())?;
        if resolution.is_empty() {
            debug!(targets = args.all_targets().count(), "highlight targets unresolved");
        }
        let mut state = lock_highlight(&self.highlight);
        let mut doc = write_document(ctx.diagram);
        let elements = if doc.generation() == resolution.generation() {
            resolution.into_elements()
        } else {
            debug!("document replaced during highlight; applying an empty set");
            Default::default()
        };
        state.apply(&mut doc, class, elements);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct StyleClearHandler {
    highlight: SharedHighlight,
}

impl StyleClearHandler {
    pub fn new(highlight: SharedHighlight) -> Self {
        Self { highlight }
    }
}

#[async_trait]
impl ActionHandler for StyleClearHandler {
    async fn handle(
        &self,
        _action: &ActionDefinition,
        ctx: &ActionContext<'_>,
    ) -> Result<(), ActionError> {
        let mut state = lock_highlight(&self.highlight);
        let mut doc = write_document(ctx.diagram);
        state.clear(&mut doc);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WaitHandler;

#[async_trait]
impl ActionHandler for WaitHandler {
    async fn handle(
        &self,
        action: &ActionDefinition,
        _ctx: &ActionContext<'_>,
    ) -> Result<(), ActionError> {
        let args = payload::<WaitPayload>(action).unwrap_or_else(|err| {
            warn!(error = %err, "unreadable wait payload; not waiting");
            WaitPayload::default()
        });
        let ms = args.ms.unwrap_or(0);
        if ms > 0 {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
        Ok(())
    }
}

/// One handler per [`ActionName`], sharing `highlight` between the two style handlers.
pub fn default_handlers(
    resolver: &TargetResolver,
    config: &TidewalkConfig,
    highlight: &SharedHighlight,
) -> Vec<(ActionName, Arc<dyn ActionHandler>)> {
    ActionName::ALL
        .into_iter()
        .map(|name| {
            let handler: Arc<dyn ActionHandler> = match name {
                ActionName::NavNext => Arc::new(NavHandler(NavCommand::Next)),
                ActionName::NavPrev => Arc::new(NavHandler(NavCommand::Prev)),
                ActionName::NavReset => Arc::new(NavHandler(NavCommand::Reset)),
                ActionName::NavGoto => Arc::new(NavHandler(NavCommand::Goto)),
                ActionName::CameraFit => {
                    Arc::new(CameraFitHandler::new(resolver.clone(), config.camera.clone()))
                }
                ActionName::CameraReset => Arc::new(CameraResetHandler),
                ActionName::CameraFitAll => Arc::new(CameraFitAllHandler::new(config.camera.padding)),
                ActionName::OverlayBubble => Arc::new(OverlayBubbleHandler::new(resolver.clone())),
                ActionName::OverlayHide => Arc::new(OverlayHideHandler),
                ActionName::StyleHighlight => Arc::new(StyleHighlightHandler::new(
                    resolver.clone(),
                    Arc::clone(highlight),
                    config.highlight_class.clone(),
                )),
                ActionName::StyleClear => Arc::new(StyleClearHandler::new(Arc::clone(highlight))),
                ActionName::Wait => Arc::new(WaitHandler),
            };
            (name, handler)
        })
        .collect()
}
