// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! None of these escape the host-facing callbacks on [`Engine`](crate::Engine):
//! every failure degrades to static content and a log line. They are returned
//! from the lower-level building blocks so callers composing those directly can
//! react.

use thiserror::Error;

/// Why a ticker (or the whole engine) could not animate.
#[derive(Error, Debug)]
pub enum TickerError {
    /// No element matched the container selector.
    #[error("no element matches container selector `{selector}`")]
    ConfigurationAbsent {
        /// The selector that matched nothing.
        selector: String,
    },

    /// A container has no items to scroll.
    #[error("container has no items matching `{item_selector}`")]
    ContentAbsent {
        /// The item selector that matched nothing inside the container.
        item_selector: String,
    },

    /// The content measured zero pixels wide.
    #[error("content measured zero width")]
    GeometryUnavailable,

    /// An optional animation backend could not be loaded.
    #[error("animation backend `{backend}` unavailable: {reason}")]
    ExternalDependencyUnavailable {
        /// Name of the backend.
        backend: String,
        /// Loader diagnostic.
        reason: String,
    },

    /// Options failed validation.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Invalid engine options.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The options document was not valid JSON for [`Options`](crate::Options).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A numeric option was negative or not finite.
    #[error("invalid value for `{field}`: {value}")]
    InvalidNumber {
        /// Option name.
        field: &'static str,
        /// Rejected value.
        value: f64,
    },

    /// Breakpoints must be listed narrowest first.
    #[error("breakpoints must be sorted by ascending max_width")]
    UnorderedBreakpoints,
}

/// Result alias for ticker operations.
pub type Result<T> = core::result::Result<T, TickerError>;
