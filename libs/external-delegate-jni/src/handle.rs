// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Opaque delegate handle passed across the JNI boundary as a `jlong`.

use std::fmt;

use jni::sys::jlong;

use crate::native::TfLiteDelegate;

/// Integer-sized identity of a native delegate held by the Java caller.
///
/// Zero means "no delegate". Any other value is the exposed address of a
/// `TfLiteDelegate` returned by native construction; the bridge never
/// dereferences it.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DelegateHandle(jlong);

impl DelegateHandle {
    /// Handle value meaning no delegate is available.
    pub const INVALID: Self = Self(0);

    /// Wrap a native delegate pointer. A null pointer becomes [`Self::INVALID`].
    pub fn from_delegate(delegate: *mut TfLiteDelegate) -> Self {
        Self(delegate.expose_provenance() as jlong)
    }

    /// Wrap a raw value received from Java.
    pub const fn from_raw(raw: jlong) -> Self {
        Self(raw)
    }

    /// Raw value to hand back to Java.
    pub const fn into_raw(self) -> jlong {
        self.0
    }

    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }

    /// Native delegate pointer this handle was created from.
    pub fn as_delegate(self) -> *mut TfLiteDelegate {
        std::ptr::with_exposed_provenance_mut(self.0 as usize)
    }
}

impl fmt::Debug for DelegateHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DelegateHandle({:#x})", self.0)
    }
}

impl fmt::Display for DelegateHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
