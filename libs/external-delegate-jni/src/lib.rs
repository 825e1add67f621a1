// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! JNI cdylib backing `org.tensorflow.lite.external.ExternalDelegate`.
//!
//! Exports the two `Java_*` entry points that create and destroy a TensorFlow
//! Lite external delegate. Creation borrows the Java `libPath` and optional
//! `cacheDir` strings, assembles the delegate configuration (library path,
//! plus `allowed_cache_mode = "true"` and `cache_file_path` when a cache
//! directory is given) and returns the native delegate as an opaque `jlong`.
//!
//! The create/destroy logic in [`bridge`] is generic over how strings are
//! borrowed ([`strings::BorrowStrings`]) and over the native entry points
//! ([`native::DelegateApi`]), so it runs without a JVM or TensorFlow Lite.
//! Rust callers can use [`ExternalDelegate`] directly.

pub mod bridge;
pub mod config;
pub mod delegate;
pub mod error;
pub mod handle;
pub mod jni_bridge;
pub mod logging;
pub mod native;
pub mod settings;
pub mod strings;

pub use bridge::{create_delegate, destroy_delegate};
pub use config::{ConfigEntry, DelegateConfig};
pub use delegate::{DelegateOptions, ExternalDelegate};
pub use error::{ExternalDelegateError, Result};
pub use handle::DelegateHandle;
pub use native::{DelegateApi, ExternalDelegateRuntime, TfLiteDelegate};
pub use settings::BridgeSettings;
