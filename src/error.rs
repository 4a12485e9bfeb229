// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshcut Team

//! Internal error hierarchy and the flat result code it collapses to.
//!
//! Inside the crate, failures stay typed: the validation layer raises
//! [`Error::Parameter`], the engine raises one of the `Engine*` variants.
//! The flattening to [`ResultCode`] happens exactly once, at the public
//! entry-point boundary, never earlier.

use thiserror::Error;

/// Sealed failure taxonomy used below the API boundary.
///
/// Variant choice decides the [`ResultCode`] the caller sees:
/// - `Parameter` / `EngineArgument` -> `InvalidValue`
/// - `EngineRuntime` -> `InvalidOperation`
/// - `EngineInternal` / `Unclassified` -> `UnknownFailure`
#[derive(Debug, Error)]
pub(crate) enum Error {
    /// A precondition on an entry-point parameter failed before any
    /// engine work started.
    #[error("{0}")]
    Parameter(String),

    /// The engine rejected semantically invalid geometry or topology.
    #[error("{0}")]
    EngineArgument(String),

    /// The engine hit a resource or environment failure.
    #[error("{0}")]
    EngineRuntime(String),

    /// An invariant broke inside the engine.
    #[error("{0}")]
    EngineInternal(String),

    /// Anything that fits none of the above, including caught panics.
    #[error("{0}")]
    Unclassified(String),
}

/// Result code returned across the API boundary.
///
/// This is the entire vocabulary a caller ever sees; no internal failure
/// escapes an entry point in any other form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultCode {
    /// The call completed.
    Success,
    /// Bad, missing or contradictory parameters, including invalid
    /// geometry rejected by the engine.
    InvalidValue,
    /// The engine failed at runtime (e.g. resource exhaustion).
    InvalidOperation,
    /// An internal invariant broke, or the failure could not be
    /// classified. Not caller-actionable.
    UnknownFailure,
}

impl std::fmt::Display for ResultCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ResultCode::Success => "success",
            ResultCode::InvalidValue => "invalid value",
            ResultCode::InvalidOperation => "invalid operation",
            ResultCode::UnknownFailure => "unknown failure",
        };
        f.write_str(name)
    }
}

impl std::error::Error for ResultCode {}

impl From<&Error> for ResultCode {
    fn from(err: &Error) -> Self {
        match err {
            Error::Parameter(_) | Error::EngineArgument(_) => ResultCode::InvalidValue,
            Error::EngineRuntime(_) => ResultCode::InvalidOperation,
            Error::EngineInternal(_) | Error::Unclassified(_) => ResultCode::UnknownFailure,
        }
    }
}
