// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Delegate creation and destruction, independent of the JNI surface.

use crate::config::DelegateConfig;
use crate::handle::DelegateHandle;
use crate::native::DelegateApi;
use crate::strings::BorrowStrings;

/// Create a native delegate from a library path and an optional cache directory.
///
/// Returns [`DelegateHandle::INVALID`] without touching `api` when either
/// string cannot be borrowed; a failed JNI borrow leaves an exception pending
/// and Java discards the returned value. Whatever native construction
/// returns, including its null sentinel, becomes the handle. Options rejected
/// before construction also yield the invalid handle.
///
/// Borrowed strings are released before this returns, on every path.
pub fn create_delegate<S, A>(
    strings: &mut S,
    api: &A,
    library_path: &S::Source,
    cache_dir: Option<&S::Source>,
) -> DelegateHandle
where
    S: BorrowStrings,
    A: DelegateApi + ?Sized,
{
    let library_path = match strings.borrow_str(library_path, "library path") {
        Ok(path) => path,
        Err(e) => {
            tracing::warn!("Cannot create external delegate: {}", e);
            return DelegateHandle::INVALID;
        }
    };

    let cache_dir = match cache_dir.map(|dir| strings.borrow_str(dir, "cache directory")) {
        None => None,
        Some(Ok(dir)) => Some(dir),
        Some(Err(e)) => {
            tracing::warn!("Cannot create external delegate: {}", e);
            return DelegateHandle::INVALID;
        }
    };

    let mut config = DelegateConfig::new(&library_path);
    if let Some(dir) = cache_dir.as_deref() {
        config = config.with_cache_dir(dir);
    }

    let delegate = match api.create(&config) {
        Ok(delegate) => delegate,
        Err(e) => {
            tracing::error!(
                library = %library_path.to_string_lossy(),
                "External delegate construction aborted: {}",
                e
            );
            return DelegateHandle::INVALID;
        }
    };

    let handle = DelegateHandle::from_delegate(delegate);
    if handle.is_valid() {
        tracing::debug!(
            %handle,
            library = %library_path.to_string_lossy(),
            cached = config.cache_dir().is_some(),
            "Created external delegate"
        );
    } else {
        tracing::error!(
            library = %library_path.to_string_lossy(),
            "Native external delegate construction returned null"
        );
    }

    handle
}

/// Destroy the native delegate behind `handle`.
///
/// # Safety
///
/// `handle` must come from [`create_delegate`] with the same `api` and must
/// not have been destroyed already. The handle is not validated; a zero
/// handle is forwarded to the native library as a null pointer.
pub unsafe fn destroy_delegate<A>(api: &A, handle: DelegateHandle)
where
    A: DelegateApi + ?Sized,
{
    tracing::debug!(%handle, "Destroying external delegate");
    unsafe { api.delete(handle.as_delegate()) }
}
