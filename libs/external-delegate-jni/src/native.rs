// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! TensorFlow Lite external delegate C API, resolved at run time.
//!
//! Mirrors `tensorflow/lite/delegates/external/external_delegate.h`. The
//! symbols are looked up with `libloading` instead of being linked: from the
//! process image by default, or from an explicitly configured library. A
//! missing TFLite install is a load error at the first JNI call rather than
//! a link failure of the whole cdylib.

use std::ffi::{c_char, c_int};
use std::path::Path;
use std::sync::Arc;

use libloading::Library;

use crate::config::{DelegateConfig, MAX_OPTIONS};
use crate::error::{ExternalDelegateError, Result};
use crate::settings::BridgeSettings;

/// Opaque native delegate. Only ever handled by pointer.
#[repr(C)]
pub struct TfLiteDelegate {
    _private: [u8; 0],
}

/// `TfLiteStatus` is a C enum; `kTfLiteOk` is zero.
pub type TfLiteStatus = c_int;
pub const TFLITE_OK: TfLiteStatus = 0;

pub type InsertFn = unsafe extern "C" fn(
    options: *mut TfLiteExternalDelegateOptions,
    key: *const c_char,
    value: *const c_char,
) -> TfLiteStatus;

/// Layout-compatible mirror of `TfLiteExternalDelegateOptions`.
///
/// Stores borrowed pointers only; every string must outlive the
/// `TfLiteExternalDelegateCreate` call that consumes the options.
#[repr(C)]
pub struct TfLiteExternalDelegateOptions {
    pub lib_path: *const c_char,
    pub count: c_int,
    pub keys: [*const c_char; MAX_OPTIONS],
    pub values: [*const c_char; MAX_OPTIONS],
    pub insert: Option<InsertFn>,
}

type OptionsDefaultFn =
    unsafe extern "C" fn(lib_path: *const c_char) -> TfLiteExternalDelegateOptions;
type CreateFn =
    unsafe extern "C" fn(options: *const TfLiteExternalDelegateOptions) -> *mut TfLiteDelegate;
type DeleteFn = unsafe extern "C" fn(delegate: *mut TfLiteDelegate);

const OPTIONS_DEFAULT_SYMBOL: &[u8] = b"TfLiteExternalDelegateOptionsDefault\0";
const CREATE_SYMBOL: &[u8] = b"TfLiteExternalDelegateCreate\0";
const DELETE_SYMBOL: &[u8] = b"TfLiteExternalDelegateDelete\0";

/// Native construction and destruction entry points.
///
/// The bridge core is generic over this trait; [`ExternalDelegateRuntime`]
/// is the production implementation.
pub trait DelegateApi {
    /// Build a native delegate from `config`.
    ///
    /// `Ok` may carry a null pointer: that is the native failure sentinel and
    /// is passed through uninterpreted. `Err` means construction was never
    /// attempted.
    fn create(&self, config: &DelegateConfig<'_>) -> Result<*mut TfLiteDelegate>;

    /// Destroy a native delegate.
    ///
    /// # Safety
    ///
    /// `delegate` must have been returned by [`DelegateApi::create`] on the
    /// same API and not destroyed since.
    unsafe fn delete(&self, delegate: *mut TfLiteDelegate);
}

impl<A: DelegateApi + ?Sized> DelegateApi for &A {
    fn create(&self, config: &DelegateConfig<'_>) -> Result<*mut TfLiteDelegate> {
        (**self).create(config)
    }

    unsafe fn delete(&self, delegate: *mut TfLiteDelegate) {
        unsafe { (**self).delete(delegate) }
    }
}

impl<A: DelegateApi + ?Sized> DelegateApi for Arc<A> {
    fn create(&self, config: &DelegateConfig<'_>) -> Result<*mut TfLiteDelegate> {
        (**self).create(config)
    }

    unsafe fn delete(&self, delegate: *mut TfLiteDelegate) {
        unsafe { (**self).delete(delegate) }
    }
}

/// The external delegate C API bound from a dynamic library.
///
/// Holds the [`Library`] so the resolved function pointers stay valid for
/// as long as this value lives.
pub struct ExternalDelegateRuntime {
    options_default: OptionsDefaultFn,
    create: CreateFn,
    delete: DeleteFn,
    _library: Library,
}

impl ExternalDelegateRuntime {
    /// Open `path` and resolve the three external delegate entry points.
    ///
    /// When the library is already mapped into the process this only bumps
    /// its reference count.
    pub fn load(path: &Path) -> Result<Self> {
        let origin = path.display().to_string();
        let library = unsafe { Library::new(path) }
            .map_err(|source| ExternalDelegateError::RuntimeLoad {
                path: origin.clone(),
                source,
            })?;
        Self::bind(library, origin)
    }

    /// Resolve the entry points from the images already loaded into the
    /// process, where TensorFlow Lite's JNI library links the C API.
    pub fn from_process() -> Result<Self> {
        Self::bind(process_library()?, PROCESS_IMAGE.to_string())
    }

    /// Bind the library named by `settings`, or the process itself when no
    /// runtime library is configured.
    pub fn from_settings(settings: &BridgeSettings) -> Result<Self> {
        match &settings.runtime_library {
            Some(path) => Self::load(path),
            None => Self::from_process(),
        }
    }

    fn bind(library: Library, origin: String) -> Result<Self> {
        let options_default = resolve::<OptionsDefaultFn>(&library, &origin, OPTIONS_DEFAULT_SYMBOL)?;
        let create = resolve::<CreateFn>(&library, &origin, CREATE_SYMBOL)?;
        let delete = resolve::<DeleteFn>(&library, &origin, DELETE_SYMBOL)?;

        tracing::debug!(%origin, "Bound external delegate runtime");

        Ok(Self {
            options_default,
            create,
            delete,
            _library: library,
        })
    }

    /// Lower `config` into native options: default from the library path,
    /// then one native insert per remaining entry.
    ///
    /// The returned options borrow every string in `config`.
    fn lower(&self, config: &DelegateConfig<'_>) -> Result<TfLiteExternalDelegateOptions> {
        let mut options = unsafe { (self.options_default)(config.library_path().as_ptr()) };
        let insert = options.insert.ok_or(ExternalDelegateError::MissingInsert)?;

        for entry in config.options() {
            let status = unsafe { insert(&mut options, entry.key.as_ptr(), entry.value.as_ptr()) };
            if status != TFLITE_OK {
                return Err(ExternalDelegateError::OptionRejected {
                    key: entry.key.to_string_lossy().into_owned(),
                    status,
                });
            }
        }

        Ok(options)
    }
}

impl DelegateApi for ExternalDelegateRuntime {
    fn create(&self, config: &DelegateConfig<'_>) -> Result<*mut TfLiteDelegate> {
        let options = self.lower(config)?;
        // `options` and `config` are both alive across the call.
        Ok(unsafe { (self.create)(&options) })
    }

    unsafe fn delete(&self, delegate: *mut TfLiteDelegate) {
        unsafe { (self.delete)(delegate) }
    }
}

const PROCESS_IMAGE: &str = "<process>";

#[cfg(unix)]
fn process_library() -> Result<Library> {
    Ok(libloading::os::unix::Library::this().into())
}

#[cfg(windows)]
fn process_library() -> Result<Library> {
    libloading::os::windows::Library::this()
        .map(Library::from)
        .map_err(|source| ExternalDelegateError::RuntimeLoad {
            path: PROCESS_IMAGE.to_string(),
            source,
        })
}

fn resolve<T: Copy>(library: &Library, origin: &str, symbol: &'static [u8]) -> Result<T> {
    let resolved = unsafe { library.get::<T>(symbol) }.map_err(|source| {
        ExternalDelegateError::MissingSymbol {
            path: origin.to_string(),
            symbol: String::from_utf8_lossy(symbol.strip_suffix(b"\0").unwrap_or(symbol))
                .into_owned(),
            source,
        }
    })?;
    Ok(*resolved)
}
