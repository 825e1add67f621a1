// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Borrowing caller-owned strings as C strings.
//!
//! A borrow is a guard: the caller's string stays pinned while the guard
//! lives and is released when it drops. The bridge never releases anything
//! by hand, so every return path releases exactly what it acquired.

use std::ffi::CStr;
use std::ops::Deref;

use crate::error::Result;

/// Source of borrowed strings on the caller's side of the boundary.
pub trait BorrowStrings {
    /// Caller-side string reference (e.g. a `JString`).
    type Source;

    /// Guard exposing the borrowed contents. Dropping it releases the borrow.
    type Borrowed: Deref<Target = CStr>;

    /// Borrow the contents of `source`.
    ///
    /// `what` names the argument for diagnostics.
    fn borrow_str(&mut self, source: &Self::Source, what: &'static str) -> Result<Self::Borrowed>;
}
