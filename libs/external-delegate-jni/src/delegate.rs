// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Owning Rust wrapper around a native external delegate.
//!
//! Same contract as the Java `ExternalDelegate` class: options carry a
//! library path and an optional cache directory, the handle is destroyed at
//! most once, and a closed delegate reports [`DelegateHandle::INVALID`].

use std::ffi::CString;

use crate::config::DelegateConfig;
use crate::error::{ExternalDelegateError, Result};
use crate::handle::DelegateHandle;
use crate::native::DelegateApi;

/// Delegate options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegateOptions {
    library_path: String,
    cache_dir: Option<String>,
}

impl DelegateOptions {
    /// Library path used when none is configured.
    pub const DEFAULT_LIBRARY_PATH: &'static str = "/data/local/tmp/libvx_delegate.so";

    pub fn new() -> Self {
        Self {
            library_path: Self::DEFAULT_LIBRARY_PATH.to_string(),
            cache_dir: None,
        }
    }

    /// Configure the external delegate library path.
    pub fn with_library_path(mut self, library_path: impl Into<String>) -> Self {
        self.library_path = library_path.into();
        self
    }

    /// Configure where compiled model artifacts are cached. Caching is
    /// disabled when unset.
    pub fn with_cache_dir(mut self, cache_dir: impl Into<String>) -> Self {
        self.cache_dir = Some(cache_dir.into());
        self
    }

    pub fn library_path(&self) -> &str {
        &self.library_path
    }

    pub fn cache_dir(&self) -> Option<&str> {
        self.cache_dir.as_deref()
    }
}

impl Default for DelegateOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// A live native external delegate, destroyed on drop.
pub struct ExternalDelegate<A: DelegateApi> {
    api: A,
    handle: DelegateHandle,
    options: DelegateOptions,
}

impl<A: DelegateApi> ExternalDelegate<A> {
    /// Construct a delegate through `api`.
    ///
    /// Fails with [`ExternalDelegateError::CreateFailed`] when native
    /// construction returns its null sentinel.
    pub fn new(api: A, options: DelegateOptions) -> Result<Self> {
        let library_path = to_c_string(options.library_path(), "library path")?;
        let cache_dir = options
            .cache_dir()
            .map(|dir| to_c_string(dir, "cache directory"))
            .transpose()?;

        let mut config = DelegateConfig::new(&library_path);
        if let Some(dir) = cache_dir.as_deref() {
            config = config.with_cache_dir(dir);
        }

        let handle = DelegateHandle::from_delegate(api.create(&config)?);
        if !handle.is_valid() {
            return Err(ExternalDelegateError::CreateFailed {
                library_path: options.library_path,
            });
        }

        tracing::debug!(%handle, library = %options.library_path, "Created external delegate");

        Ok(Self {
            api,
            handle,
            options,
        })
    }

    /// Handle to pass to an interpreter; [`DelegateHandle::INVALID`] once closed.
    pub fn native_handle(&self) -> DelegateHandle {
        self.handle
    }

    pub fn options(&self) -> &DelegateOptions {
        &self.options
    }

    pub fn is_closed(&self) -> bool {
        !self.handle.is_valid()
    }

    /// Destroy the native delegate. Later calls do nothing.
    pub fn close(&mut self) {
        let handle = std::mem::replace(&mut self.handle, DelegateHandle::INVALID);
        if handle.is_valid() {
            tracing::debug!(%handle, "Closing external delegate");
            // SAFETY: the handle came from `api.create` and was swapped out of
            // `self.handle` above, so no later call can delete it again.
            unsafe { self.api.delete(handle.as_delegate()) };
        }
    }

    /// Give up ownership; the caller must destroy the returned handle.
    pub fn into_handle(mut self) -> DelegateHandle {
        std::mem::replace(&mut self.handle, DelegateHandle::INVALID)
    }
}

impl<A: DelegateApi> Drop for ExternalDelegate<A> {
    fn drop(&mut self) {
        self.close();
    }
}

fn to_c_string(value: &str, field: &'static str) -> Result<CString> {
    CString::new(value).map_err(|source| ExternalDelegateError::InteriorNul { field, source })
}
