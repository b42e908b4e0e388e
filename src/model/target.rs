// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidewalk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidewalk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use super::ids::{IdError, LogicalId};

/// How a [`TargetDescriptor`] id is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum TargetKind {
    /// A logical entity (node, participant, task, slice, ...) resolved through the diagram's
    /// strategy.
    #[default]
    Node,
    /// The raw `id` attribute of a rendered element.
    Element,
    /// A structural query written by the walkthrough author.
    Selector,
}

impl TargetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Element => "element",
            Self::Selector => "selector",
        }
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "node" => Some(Self::Node),
            "element" => Some(Self::Element),
            "selector" => Some(Self::Selector),
            _ => None,
        }
    }
}

/// Address of "the element(s) representing logical entity X".
///
/// Canonical string form: `<kind>:<id>`, e.g. `node:authorize`. A string without a known kind
/// prefix is a node target, so `authorize` and `node:authorize` are equivalent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetDescriptor {
    kind: TargetKind,
    id: LogicalId,
}

impl TargetDescriptor {
    pub fn new(kind: TargetKind, id: LogicalId) -> Self {
        Self { kind, id }
    }

    pub fn node(id: impl Into<String>) -> Result<Self, IdError> {
        Ok(Self { kind: TargetKind::Node, id: LogicalId::new(id.into())? })
    }

    pub fn kind(&self) -> TargetKind {
        self.kind
    }

    pub fn id(&self) -> &LogicalId {
        &self.id
    }

    pub fn parse(input: &str) -> Result<Self, ParseTargetError> {
        let input = input.trim();
        let (kind, raw_id) = match input.split_once(':') {
            Some((prefix, rest)) => match TargetKind::from_prefix(prefix) {
                Some(kind) => (kind, rest.trim()),
                None => (TargetKind::Node, input),
            },
            None => (TargetKind::Node, input),
        };
        let id = LogicalId::new(raw_id).map_err(ParseTargetError::InvalidId)?;
        Ok(Self { kind, id })
    }
}

impl fmt::Display for TargetDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.as_str(), self.id)
    }
}

impl FromStr for TargetDescriptor {
    type Err = ParseTargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseTargetError {
    InvalidId(IdError),
    UnknownKind(String),
}

impl fmt::Display for ParseTargetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId(err) => write!(f, "invalid target id: {err}"),
            Self::UnknownKind(kind) => write!(f, "unknown target kind: {kind}"),
        }
    }
}

impl std::error::Error for ParseTargetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidId(err) => Some(err),
            Self::UnknownKind(_) => None,
        }
    }
}

impl Serialize for TargetDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TargetRepr {
    Text(String),
    Object {
        #[serde(default)]
        kind: Option<String>,
        id: String,
    },
}

impl<'de> Deserialize<'de> for TargetDescriptor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match TargetRepr::deserialize(deserializer)? {
            TargetRepr::Text(text) => Self::parse(&text).map_err(de::Error::custom),
            TargetRepr::Object { kind, id } => {
                let kind = match kind.as_deref() {
                    None => TargetKind::Node,
                    Some(raw) => TargetKind::from_prefix(raw)
                        .ok_or_else(|| ParseTargetError::UnknownKind(raw.to_owned()))
                        .map_err(de::Error::custom)?,
                };
                let id = LogicalId::new(id)
                    .map_err(ParseTargetError::InvalidId)
                    .map_err(de::Error::custom)?;
                Ok(Self { kind, id })
            }
        }
    }
}
