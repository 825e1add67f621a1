// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Ordered key/value configuration handed to native delegate construction.
//!
//! The first entry is always the library path. It is lowered through
//! `TfLiteExternalDelegateOptionsDefault`; every later entry goes through the
//! native `insert` callback in the order it appears here.

use std::ffi::CStr;

/// Key of the mandatory first entry. Native code receives this value as
/// `TfLiteExternalDelegateOptions::lib_path` rather than as a key/value pair.
pub const LIBRARY_PATH_KEY: &CStr = c"library_path";

/// Key permitting the delegate to read and write compiled-kernel caches.
pub const ALLOWED_CACHE_MODE_KEY: &CStr = c"allowed_cache_mode";

/// Key carrying the cache location.
pub const CACHE_FILE_PATH_KEY: &CStr = c"cache_file_path";

/// Value of [`ALLOWED_CACHE_MODE_KEY`] whenever a cache section is present.
pub const CACHE_MODE_ENABLED: &CStr = c"true";

/// Capacity of the native `keys`/`values` arrays.
pub const MAX_OPTIONS: usize = 256;

/// A single configuration pair, borrowed for the duration of a create call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigEntry<'a> {
    pub key: &'a CStr,
    pub value: &'a CStr,
}

impl<'a> ConfigEntry<'a> {
    pub const fn new(key: &'a CStr, value: &'a CStr) -> Self {
        Self { key, value }
    }
}

/// Delegate configuration under assembly.
///
/// Entries are kept in insertion order. The cache section is only ever added
/// or updated as a pair by [`DelegateConfig::with_cache_dir`], so a
/// configuration with the permission flag but no path (or the reverse)
/// cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegateConfig<'a> {
    entries: Vec<ConfigEntry<'a>>,
}

impl<'a> DelegateConfig<'a> {
    /// Default configuration seeded with the delegate library path.
    pub fn new(library_path: &'a CStr) -> Self {
        Self {
            entries: vec![ConfigEntry::new(LIBRARY_PATH_KEY, library_path)],
        }
    }

    /// Add the compiled-artifact cache section.
    ///
    /// Appends `allowed_cache_mode = "true"` followed by
    /// `cache_file_path = cache_dir`. Calling it again replaces the path
    /// in place instead of appending a second section.
    pub fn with_cache_dir(mut self, cache_dir: &'a CStr) -> Self {
        match self.position(CACHE_FILE_PATH_KEY) {
            Some(index) => self.entries[index].value = cache_dir,
            None => self.entries.extend([
                ConfigEntry::new(ALLOWED_CACHE_MODE_KEY, CACHE_MODE_ENABLED),
                ConfigEntry::new(CACHE_FILE_PATH_KEY, cache_dir),
            ]),
        }
        self
    }

    pub fn library_path(&self) -> &'a CStr {
        self.entries[0].value
    }

    /// Cache location, if a cache section was added.
    pub fn cache_dir(&self) -> Option<&'a CStr> {
        self.get(CACHE_FILE_PATH_KEY)
    }

    pub fn get(&self, key: &CStr) -> Option<&'a CStr> {
        self.position(key).map(|index| self.entries[index].value)
    }

    /// Every entry, library path first.
    pub fn entries(&self) -> &[ConfigEntry<'a>] {
        &self.entries
    }

    /// Entries inserted after the default, i.e. those that reach the native
    /// `insert` callback.
    pub fn options(&self) -> &[ConfigEntry<'a>] {
        &self.entries[1..]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: the library-path entry cannot be removed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &CStr) -> Option<usize> {
        self.entries.iter().position(|entry| entry.key == key)
    }
}
