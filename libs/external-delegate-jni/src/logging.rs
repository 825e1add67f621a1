// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Logging bring-up for the cdylib.
//!
//! The JVM that loads this library has no `tracing` subscriber, so events
//! would be dropped. The first JNI entry installs a stderr `fmt` subscriber;
//! an embedding process that already set a global subscriber keeps its own.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

use crate::settings::BridgeSettings;

static INIT: Once = Once::new();

/// Install the bridge's stderr subscriber. Only the first call has an effect.
pub fn init_bridge_logging(settings: &BridgeSettings) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_new(&settings.log_filter)
            .unwrap_or_else(|_| EnvFilter::new(BridgeSettings::DEFAULT_LOG_FILTER));

        // Ignore if a subscriber is already installed.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .try_init();
    });
}
