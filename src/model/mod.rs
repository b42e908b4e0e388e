// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidewalk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidewalk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! Diagram type tags, target descriptors, and the declared actions a walkthrough step carries.

pub mod action;
pub mod diagram_type;
pub mod ids;
pub mod target;

pub use action::{
    ActionDefinition, ActionName, BubblePayload, CameraFitAllPayload, CameraFitPayload,
    ErrorPolicy, GotoPayload, HidePayload, HighlightPayload, WaitPayload,
};
pub use diagram_type::{DiagramType, ParseDiagramTypeError};
pub use ids::{IdError, LogicalId};
pub use target::{ParseTargetError, TargetDescriptor, TargetKind};
