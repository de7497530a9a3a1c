// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use thiserror::Error;

/// Errors emitted by the discovery layer.
///
/// Decoding failures are not represented here: a malformed advertisement is
/// dropped by the listener and never surfaces to callers.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("not found")]
    NotFound,
    #[error("graph notification failed: {0}")]
    Notify(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
