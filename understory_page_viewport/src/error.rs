// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for viewport operations.

use alloc::string::String;

/// Errors produced by [`Viewport`](crate::Viewport).
///
/// Most operations treat missing preconditions as silent no-ops; only queries
/// that have no sensible fallback return an error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ViewportError {
    /// The viewport has no rendering surface installed.
    #[error("viewport is not installed on a rendering surface")]
    NotInstalled,

    /// The installed surface reported no viewport transform.
    #[error("no viewport transform found for the rendering surface")]
    MissingTransform,

    /// Construction options were rejected.
    #[error("invalid viewport options: {0}")]
    InvalidOptions(String),
}

/// Convenience alias.
pub type Result<T> = core::result::Result<T, ViewportError>;

#[cfg(test)]
mod tests {
    use alloc::format;

    use super::*;

    #[test]
    fn not_installed_display() {
        let e = ViewportError::NotInstalled;
        assert_eq!(format!("{e}"), "viewport is not installed on a rendering surface");
    }

    #[test]
    fn invalid_options_display() {
        let e = ViewportError::InvalidOptions("min_zoom > max_zoom".into());
        assert_eq!(format!("{e}"), "invalid viewport options: min_zoom > max_zoom");
    }
}
