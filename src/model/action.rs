// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidewalk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidewalk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Declared step actions and their payload shapes.
//!
//! Action names and payload fields are the contract with the step-definition language; any name
//! outside [`ActionName`] is rejected by the engine as unknown.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::target::TargetDescriptor;

/// One declared action: a name plus an untyped payload bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ActionDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub payload: Value,
}

impl ActionDefinition {
    pub fn new(name: impl Into<String>, payload: Value) -> Self {
        Self { name: name.into(), payload }
    }

    pub fn bare(name: impl Into<String>) -> Self {
        Self::new(name, Value::Null)
    }

    /// Decodes the payload into a typed shape. A missing payload decodes as an empty object.
    pub fn payload_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        match &self.payload {
            Value::Null => serde_json::from_value(Value::Object(Default::default())),
            payload => T::deserialize(payload),
        }
    }
}

/// The fixed action vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionName {
    NavNext,
    NavPrev,
    NavReset,
    NavGoto,
    CameraFit,
    CameraReset,
    CameraFitAll,
    OverlayBubble,
    OverlayHide,
    StyleHighlight,
    StyleClear,
    Wait,
}

impl ActionName {
    pub const ALL: [ActionName; 12] = [
        Self::NavNext,
        Self::NavPrev,
        Self::NavReset,
        Self::NavGoto,
        Self::CameraFit,
        Self::CameraReset,
        Self::CameraFitAll,
        Self::OverlayBubble,
        Self::OverlayHide,
        Self::StyleHighlight,
        Self::StyleClear,
        Self::Wait,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NavNext => "nav.next",
            Self::NavPrev => "nav.prev",
            Self::NavReset => "nav.reset",
            Self::NavGoto => "nav.goto",
            Self::CameraFit => "camera.fit",
            Self::CameraReset => "camera.reset",
            Self::CameraFitAll => "camera.fitAll",
            Self::OverlayBubble => "overlay.bubble",
            Self::OverlayHide => "overlay.hide",
            Self::StyleHighlight => "style.highlight",
            Self::StyleClear => "style.clear",
            Self::Wait => "wait",
        }
    }
}

impl fmt::Display for ActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|name| name.as_str() == s).ok_or_else(|| s.to_owned())
    }
}

/// Fault tolerance for one engine run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Abort on the first failure.
    Stop,
    /// Record each failure and keep going.
    #[default]
    Continue,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GotoPayload {
    pub index: Option<u64>,
    #[serde(alias = "step")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CameraFitPayload {
    #[schemars(with = "Option<String>")]
    pub target: Option<TargetDescriptor>,
    pub padding: Option<f64>,
    /// Animation duration in milliseconds.
    pub duration: Option<u64>,
    pub easing: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CameraFitAllPayload {
    pub padding: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BubblePayload {
    #[schemars(with = "Option<String>")]
    pub target: Option<TargetDescriptor>,
    pub id: Option<String>,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HidePayload {
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HighlightPayload {
    #[schemars(with = "Option<String>")]
    pub target: Option<TargetDescriptor>,
    #[serde(default)]
    #[schemars(with = "Vec<String>")]
    pub targets: Vec<TargetDescriptor>,
    /// Overrides the configured highlight class for this action.
    pub class: Option<String>,
}

impl HighlightPayload {
    pub fn all_targets(&self) -> impl Iterator<Item = &TargetDescriptor> {
        self.target.iter().chain(self.targets.iter())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WaitPayload {
    #[serde(alias = "duration")]
    pub ms: Option<u64>,
}
