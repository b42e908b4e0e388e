// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidewalk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidewalk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Opt-in `tracing` setup for the CLI and for applications embedding the crate.
//!
//! The library only emits events; nothing is printed until a subscriber is installed, either by
//! [`init_tracing`] or by the host application.

use tracing_subscriber::EnvFilter;

/// Installs a compact stderr subscriber.
///
/// `filter` wins over `RUST_LOG`; with neither set the level is `info`. Returns `false` when a
/// global subscriber is already installed or the filter does not parse.
#[must_use]
pub fn init_tracing(filter: Option<&str>) -> bool {
    let filter = match filter {
        Some(directives) => match EnvFilter::try_new(directives) {
            Ok(filter) => filter,
            Err(_) => return false,
        },
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::init_tracing;

    #[test]
    fn rejects_malformed_filters() {
        assert!(!init_tracing(Some("tidewalk=[")));
    }
}
