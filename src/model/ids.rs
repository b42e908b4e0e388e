// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidewalk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidewalk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use smol_str::SmolStr;

/// The name a walkthrough uses for a logical entity: a flowchart node, a participant, a gantt
/// task, a pie slice label.
///
/// Ids come from diagram sources and rendered labels, so anything but an empty or all-whitespace
/// string is accepted verbatim, surrounding whitespace included. Callers that parse user input
/// trim before constructing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LogicalId(SmolStr);

impl LogicalId {
    pub fn new(value: impl AsRef<str>) -> Result<Self, IdError> {
        let value = value.as_ref();
        if value.is_empty() {
            return Err(IdError::Empty);
        }
        if value.trim().is_empty() {
            return Err(IdError::Blank);
        }
        Ok(Self(SmolStr::new(value)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LogicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LogicalId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for LogicalId {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for LogicalId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for LogicalId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    Empty,
    Blank,
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("target id must not be empty"),
            Self::Blank => f.write_str("target id must not be only whitespace"),
        }
    }
}

impl std::error::Error for IdError {}
