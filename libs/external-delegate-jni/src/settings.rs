// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Bridge settings with runtime resolution.
//!
//! Each setting is resolved in priority order:
//! 1. Explicit value passed to [`BridgeSettings::resolve`]
//! 2. Environment variable
//! 3. Built-in default

use std::path::PathBuf;

/// Runtime configuration of the JNI bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeSettings {
    /// Library exporting the TFLite external delegate C API. `None` binds
    /// the symbols already loaded into the process.
    pub runtime_library: Option<PathBuf>,
    /// `tracing_subscriber::EnvFilter` directive for bridge logging.
    pub log_filter: String,
}

/// Explicit overrides; `None` fields fall through to the environment.
#[derive(Debug, Clone, Default)]
pub struct BridgeOverrides {
    pub runtime_library: Option<PathBuf>,
    pub log_filter: Option<String>,
}

impl BridgeSettings {
    /// Environment variable naming the external delegate runtime library.
    pub const RUNTIME_LIBRARY_ENV_VAR: &'static str = "EXTERNAL_DELEGATE_RUNTIME_LIB";

    /// Environment variable holding the log filter directive.
    pub const LOG_FILTER_ENV_VAR: &'static str = "EXTERNAL_DELEGATE_LOG";

    pub const DEFAULT_LOG_FILTER: &'static str = "warn";

    /// Resolve from the process environment with no explicit overrides.
    pub fn from_env() -> Self {
        Self::resolve(BridgeOverrides::default(), |name| std::env::var(name).ok())
    }

    /// Resolve every setting from `overrides`, then `env`, then defaults.
    ///
    /// Empty environment values are treated as unset.
    pub fn resolve(overrides: BridgeOverrides, env: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |name: &str| env(name).filter(|value| !value.trim().is_empty());

        let runtime_library = overrides
            .runtime_library
            .or_else(|| lookup(Self::RUNTIME_LIBRARY_ENV_VAR).map(PathBuf::from));

        let log_filter = overrides
            .log_filter
            .or_else(|| lookup(Self::LOG_FILTER_ENV_VAR))
            .unwrap_or_else(|| Self::DEFAULT_LOG_FILTER.to_string());

        Self {
            runtime_library,
            log_filter,
        }
    }
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self::resolve(BridgeOverrides::default(), |_| None)
    }
}
