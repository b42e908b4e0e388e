// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidewalk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidewalk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Tidewalk: guided walkthroughs over rendered Mermaid diagrams.
//!
//! Two jobs. Map logical walkthrough targets (a node, participant, task, slice, ...) onto the
//! elements the diagram engine rendered, using a per-family [`strategy`] picked by the
//! [`detect`]ed diagram type. Then run each step's declared [`actions`] in order against the
//! camera, overlay and controller collaborators described in [`handle`].

pub mod actions;
pub mod config;
pub mod detect;
pub mod dom;
pub mod handle;
pub mod model;
pub mod resolve;
pub mod strategy;
pub mod telemetry;

pub use actions::{ActionContext, ActionError, ActionFailure, ActionHandler, StepActionEngine};
pub use config::TidewalkConfig;
pub use resolve::{Resolution, TargetResolver};
pub use strategy::{DiagramStrategy, StrategyRegistry};
