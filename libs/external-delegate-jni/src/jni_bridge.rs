// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! JNI entry points for `org.tensorflow.lite.external.ExternalDelegate`.
//!
//! ```java
//! private static native long createDelegate(String libPath, String cacheDir);
//! private static native void deleteDelegate(long delegateHandle);
//! ```

use std::ffi::CStr;
use std::marker::PhantomData;
use std::ops::Deref;
use std::sync::{LazyLock, OnceLock};

use jni::JNIEnv;
use jni::objects::{JClass, JString};
use jni::strings::JavaStr;
use jni::sys::jlong;

use crate::bridge::{create_delegate, destroy_delegate};
use crate::error::{ExternalDelegateError, Result};
use crate::handle::DelegateHandle;
use crate::logging::init_bridge_logging;
use crate::native::ExternalDelegateRuntime;
use crate::settings::BridgeSettings;
use crate::strings::BorrowStrings;

static SETTINGS: LazyLock<BridgeSettings> = LazyLock::new(BridgeSettings::from_env);

/// Runtime binding shared by every call. Delegates created through it keep
/// running code from the runtime library, so it is never unloaded.
static RUNTIME: OnceLock<ExternalDelegateRuntime> = OnceLock::new();

fn bridge_runtime() -> Result<&'static ExternalDelegateRuntime> {
    if let Some(runtime) = RUNTIME.get() {
        return Ok(runtime);
    }
    let runtime = ExternalDelegateRuntime::from_settings(&SETTINGS)?;
    // A concurrent first call may have won; its binding is kept instead.
    Ok(RUNTIME.get_or_init(|| runtime))
}

/// Java strings borrowed through `GetStringUTFChars`.
pub struct JniStrings<'local, 'obj> {
    env: JNIEnv<'local>,
    _sources: PhantomData<&'obj ()>,
}

impl<'local, 'obj> JniStrings<'local, 'obj> {
    pub fn new(env: JNIEnv<'local>) -> Self {
        Self {
            env,
            _sources: PhantomData,
        }
    }
}

/// Modified UTF-8 contents of a Java string; `ReleaseStringUTFChars` runs on drop.
pub struct JniStr<'local: 'obj, 'obj>(JavaStr<'local, 'local, 'obj>);

impl Deref for JniStr<'_, '_> {
    type Target = CStr;

    fn deref(&self) -> &CStr {
        &self.0
    }
}

impl<'local: 'obj, 'obj> BorrowStrings for JniStrings<'local, 'obj> {
    type Source = &'obj JString<'local>;
    type Borrowed = JniStr<'local, 'obj>;

    fn borrow_str(&mut self, source: &Self::Source, what: &'static str) -> Result<Self::Borrowed> {
        if source.is_null() {
            return Err(ExternalDelegateError::StringUnavailable {
                what,
                reason: "null reference".to_string(),
            });
        }
        self.env
            .get_string(*source)
            .map(JniStr)
            .map_err(|e| ExternalDelegateError::StringUnavailable {
                what,
                reason: e.to_string(),
            })
    }
}

/// `ExternalDelegate.createDelegate(String libPath, String cacheDir)`.
///
/// Returns 0 when no delegate could be created. The first call of either
/// entry point installs the logging subscriber and binds the runtime library
/// in process-wide statics; the delegate lifecycle itself keeps no state.
#[unsafe(no_mangle)]
pub extern "system" fn Java_org_tensorflow_lite_external_ExternalDelegate_createDelegate<'local>(
    env: JNIEnv<'local>,
    _class: JClass<'local>,
    lib_path: JString<'local>,
    cache_dir: JString<'local>,
) -> jlong {
    init_bridge_logging(&SETTINGS);

    let runtime = match bridge_runtime() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Cannot create external delegate: {}", e);
            return DelegateHandle::INVALID.into_raw();
        }
    };

    let cache_dir = (!cache_dir.is_null()).then_some(&cache_dir);
    let mut strings = JniStrings::new(env);
    create_delegate(&mut strings, runtime, &&lib_path, cache_dir.as_ref()).into_raw()
}

/// `ExternalDelegate.deleteDelegate(long delegateHandle)`.
///
/// Shares the process-wide logging and runtime binding with `createDelegate`.
#[unsafe(no_mangle)]
pub extern "system" fn Java_org_tensorflow_lite_external_ExternalDelegate_deleteDelegate<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
    delegate_handle: jlong,
) {
    init_bridge_logging(&SETTINGS);

    let handle = DelegateHandle::from_raw(delegate_handle);
    match bridge_runtime() {
        // ExternalDelegate.close() only passes handles returned by
        // createDelegate, and resets its field so each is deleted once.
        Ok(runtime) => unsafe { destroy_delegate(runtime, handle) },
        Err(e) => tracing::error!(%handle, "Cannot destroy external delegate: {}", e),
    }
}
