// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Test doubles for the two sides of the bridge: a string source that counts
//! borrows and releases, and a `DelegateApi` that records every native call.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::ffi::{CStr, CString};
use std::ops::Deref;
use std::rc::Rc;

use external_delegate_jni::{
    DelegateApi, DelegateConfig, ExternalDelegateError, Result, TfLiteDelegate,
};

/// Caller-side string. `unborrowable` simulates `GetStringUTFChars` failing.
pub struct FakeString {
    text: CString,
    borrowable: bool,
}

impl FakeString {
    pub fn new(text: &str) -> Self {
        Self {
            text: CString::new(text).unwrap(),
            borrowable: true,
        }
    }

    pub fn unborrowable(text: &str) -> Self {
        Self {
            borrowable: false,
            ..Self::new(text)
        }
    }
}

/// Borrow accounting shared between the source and its guards.
#[derive(Default)]
pub struct CountingStrings {
    acquired: Rc<Cell<usize>>,
    released: Rc<Cell<usize>>,
    attempts: Cell<usize>,
}

impl CountingStrings {
    pub fn acquired(&self) -> usize {
        self.acquired.get()
    }

    pub fn released(&self) -> usize {
        self.released.get()
    }

    pub fn outstanding(&self) -> usize {
        self.acquired() - self.released()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.get()
    }
}

pub struct CountedStr {
    text: CString,
    released: Rc<Cell<usize>>,
}

impl Deref for CountedStr {
    type Target = CStr;

    fn deref(&self) -> &CStr {
        &self.text
    }
}

impl Drop for CountedStr {
    fn drop(&mut self) {
        self.released.set(self.released.get() + 1);
    }
}

impl external_delegate_jni::strings::BorrowStrings for CountingStrings {
    type Source = FakeString;
    type Borrowed = CountedStr;

    fn borrow_str(&mut self, source: &FakeString, what: &'static str) -> Result<CountedStr> {
        self.attempts.set(self.attempts.get() + 1);
        if !source.borrowable {
            return Err(ExternalDelegateError::StringUnavailable {
                what,
                reason: "out of memory".to_string(),
            });
        }
        self.acquired.set(self.acquired.get() + 1);
        Ok(CountedStr {
            text: source.text.clone(),
            released: Rc::clone(&self.released),
        })
    }
}

/// How the recording API answers `create`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CreateOutcome {
    #[default]
    Succeed,
    /// Native construction ran and returned null.
    ReturnNull,
    /// Options were rejected before native construction.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCreate {
    pub entries: Vec<(String, String)>,
    pub delegate: usize,
}

#[derive(Default)]
pub struct RecordingApi {
    pub outcome: CreateOutcome,
    creates: RefCell<Vec<RecordedCreate>>,
    deletes: RefCell<Vec<usize>>,
}

impl RecordingApi {
    pub fn with_outcome(outcome: CreateOutcome) -> Self {
        Self {
            outcome,
            ..Self::default()
        }
    }

    pub fn creates(&self) -> Vec<RecordedCreate> {
        self.creates.borrow().clone()
    }

    pub fn deletes(&self) -> Vec<usize> {
        self.deletes.borrow().clone()
    }
}

impl DelegateApi for RecordingApi {
    fn create(&self, config: &DelegateConfig<'_>) -> Result<*mut TfLiteDelegate> {
        if self.outcome == CreateOutcome::Reject {
            return Err(ExternalDelegateError::OptionRejected {
                key: "allowed_cache_mode".to_string(),
                status: 1,
            });
        }

        let entries = config
            .entries()
            .iter()
            .map(|entry| {
                (
                    entry.key.to_str().unwrap().to_string(),
                    entry.value.to_str().unwrap().to_string(),
                )
            })
            .collect();

        let mut creates = self.creates.borrow_mut();
        let delegate = match self.outcome {
            CreateOutcome::ReturnNull => 0,
            _ => 0x1000 + creates.len() * 0x40,
        };
        creates.push(RecordedCreate { entries, delegate });

        Ok(std::ptr::with_exposed_provenance_mut(delegate))
    }

    unsafe fn delete(&self, delegate: *mut TfLiteDelegate) {
        self.deletes.borrow_mut().push(delegate.addr());
    }
}

pub fn entry(key: &str, value: &str) -> (String, String) {
    (key.to_string(), value.to_string())
}
