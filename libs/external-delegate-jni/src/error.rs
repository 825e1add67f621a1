// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Error types for the external delegate bridge.

use std::ffi::NulError;

use thiserror::Error;

/// Errors that can occur while creating or destroying an external delegate.
///
/// At the JNI boundary every variant collapses into the zero handle; inside
/// the crate they propagate with `?` so the cause can be logged once.
#[derive(Debug, Error)]
pub enum ExternalDelegateError {
    /// The caller's string could not be exposed as a borrowed C string.
    #[error("failed to borrow {what} from the caller: {reason}")]
    StringUnavailable { what: &'static str, reason: String },

    /// The library (or process image) exporting the TFLite external delegate
    /// C API could not be opened.
    #[error("failed to load external delegate runtime '{path}': {source}")]
    RuntimeLoad {
        path: String,
        #[source]
        source: libloading::Error,
    },

    /// The runtime library loaded but does not export a required symbol.
    #[error("external delegate runtime '{path}' is missing symbol {symbol}: {source}")]
    MissingSymbol {
        path: String,
        symbol: String,
        #[source]
        source: libloading::Error,
    },

    /// The native options object refused a key/value pair.
    #[error("external delegate options rejected key '{key}' (status {status})")]
    OptionRejected { key: String, status: i32 },

    /// `TfLiteExternalDelegateOptionsDefault` returned options without an insert callback.
    #[error("external delegate options carry no insert callback")]
    MissingInsert,

    /// An owned path handed to the safe wrapper contains a NUL byte.
    #[error("{field} contains an interior NUL byte")]
    InteriorNul {
        field: &'static str,
        #[source]
        source: NulError,
    },

    /// Native construction returned the failure sentinel.
    #[error("native delegate construction failed for library '{library_path}'")]
    CreateFailed { library_path: String },
}

/// Result type alias for bridge operations.
pub type Result<T> = std::result::Result<T, ExternalDelegateError>;
