// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidewalk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidewalk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Runtime configuration, loaded from JSON.
//!
//! Every field has a default, so `{}` is a complete configuration.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::DiagramType;
use crate::strategy::LabelOptions;

pub const DEFAULT_HIGHLIGHT_CLASS: &str = "tidewalk-highlight";
pub const DEFAULT_MAX_LABEL_TARGETS: usize = 500;

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read {}: {source}", path.display()),
            Self::Parse(err) => write!(f, "invalid config JSON: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

/// What the registry falls back to for diagram types without a built-in strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DefaultStrategy {
    /// The generic label scan.
    #[default]
    Label,
    /// No default: unknown types are a configuration error.
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CameraDefaults {
    pub padding: f64,
    pub duration_ms: u64,
    pub easing: String,
}

impl Default for CameraDefaults {
    fn default() -> Self {
        Self { padding: 24.0, duration_ms: 400, easing: "ease-in-out".to_owned() }
    }
}

/// Per-type overrides for label-based extraction. Unset fields keep the family's own setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct LabelOverride {
    pub skip_numeric_labels: Option<bool>,
    pub max_targets: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct LabelConfig {
    /// Cap applied to every label family unless overridden. `null` disables the cap.
    pub max_targets: Option<usize>,
    pub overrides: BTreeMap<DiagramType, LabelOverride>,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self { max_targets: Some(DEFAULT_MAX_LABEL_TARGETS), overrides: BTreeMap::new() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct TidewalkConfig {
    /// Class applied by `style.highlight` when the action names none.
    pub highlight_class: String,
    pub camera: CameraDefaults,
    pub labels: LabelConfig,
    pub default_strategy: DefaultStrategy,
}

impl Default for TidewalkConfig {
    fn default() -> Self {
        Self {
            highlight_class: DEFAULT_HIGHLIGHT_CLASS.to_owned(),
            camera: CameraDefaults::default(),
            labels: LabelConfig::default(),
            default_strategy: DefaultStrategy::default(),
        }
    }
}

impl TidewalkConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.highlight_class.trim().is_empty()
            || self.highlight_class.chars().any(char::is_whitespace)
        {
            return Err(ConfigError::Invalid(format!(
                "highlightClass must be a single class name, got `{}`",
                self.highlight_class
            )));
        }
        if !self.camera.padding.is_finite() || self.camera.padding < 0.0 {
            return Err(ConfigError::Invalid("camera.padding must be a non-negative number".into()));
        }
        if self.labels.max_targets == Some(0) {
            return Err(ConfigError::Invalid("labels.maxTargets must be > 0 or null".into()));
        }
        if let Some((ty, _)) =
            self.labels.overrides.iter().find(|(_, o)| o.max_targets == Some(0))
        {
            return Err(ConfigError::Invalid(format!(
                "labels.overrides.{ty}.maxTargets must be > 0"
            )));
        }
        Ok(())
    }

    /// Label options for `ty`: the family's `base`, the global cap, then the per-type override.
    pub fn label_options(&self, ty: DiagramType, base: LabelOptions) -> LabelOptions {
        let mut options = base;
        if options.max_targets.is_none() {
            options.max_targets = self.labels.max_targets;
        }
        if let Some(over) = self.labels.overrides.get(&ty) {
            if let Some(skip) = over.skip_numeric_labels {
                options.skip_numeric_labels = skip;
            }
            if over.max_targets.is_some() {
                options.max_targets = over.max_targets;
            }
        }
        options
    }

    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(TidewalkConfig)
    }
}
