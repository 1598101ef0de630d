// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! Only configuration can fail. At runtime every failure path declines to emit
//! instead of returning an error: unrecognized targets, stale timers and signals
//! delivered after teardown are all ordinary traffic.

use thiserror::Error;

/// Errors raised while compiling [`ClassNames`](crate::config::ClassNames).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The column id pattern is not a valid regular expression.
    #[error("invalid column id pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// The column id pattern compiles but cannot yield an identifier.
    #[error("column id pattern `{pattern}` has no capture group for the column id")]
    MissingCaptureGroup {
        /// The pattern after prefix substitution.
        pattern: String,
    },
}

/// Result type alias for configuration.
pub type ConfigResult<T> = Result<T, ConfigError>;
