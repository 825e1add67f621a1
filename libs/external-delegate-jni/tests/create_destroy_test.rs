// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Create/destroy lifecycle through the bridge core.

mod common;

use common::{CountingStrings, CreateOutcome, FakeString, RecordingApi, entry};
use external_delegate_jni::{DelegateHandle, create_delegate, destroy_delegate};

#[test]
fn test_library_path_only_builds_single_entry() {
    let mut strings = CountingStrings::default();
    let api = RecordingApi::default();

    let handle = create_delegate(&mut strings, &api, &FakeString::new("/opt/delegate.so"), None);

    assert!(handle.is_valid());
    let creates = api.creates();
    assert_eq!(creates.len(), 1);
    assert_eq!(creates[0].entries, vec![entry("library_path", "/opt/delegate.so")]);
    assert_eq!(strings.acquired(), 1);
    assert_eq!(strings.outstanding(), 0);
}

#[test]
fn test_cache_dir_adds_flag_then_path() {
    let mut strings = CountingStrings::default();
    let api = RecordingApi::default();
    let cache_dir = FakeString::new("/tmp/cache");

    let handle = create_delegate(
        &mut strings,
        &api,
        &FakeString::new("/opt/delegate.so"),
        Some(&cache_dir),
    );

    assert!(handle.is_valid());
    assert_eq!(
        api.creates()[0].entries,
        vec![
            entry("library_path", "/opt/delegate.so"),
            entry("allowed_cache_mode", "true"),
            entry("cache_file_path", "/tmp/cache"),
        ]
    );
    assert_eq!(strings.acquired(), 2);
    assert_eq!(strings.outstanding(), 0);
}

#[test]
fn test_unborrowable_library_path_returns_zero_without_native_call() {
    let mut strings = CountingStrings::default();
    let api = RecordingApi::default();
    let cache_dir = FakeString::new("/tmp/cache");

    let handle = create_delegate(
        &mut strings,
        &api,
        &FakeString::unborrowable("/opt/delegate.so"),
        Some(&cache_dir),
    );

    assert_eq!(handle, DelegateHandle::INVALID);
    assert_eq!(handle.into_raw(), 0);
    assert!(api.creates().is_empty());
    // The cache directory is never touched once the library path fails.
    assert_eq!(strings.attempts(), 1);
    assert_eq!(strings.acquired(), 0);
    assert_eq!(strings.released(), 0);
}

#[test]
fn test_unborrowable_cache_dir_returns_zero_without_native_call() {
    let mut strings = CountingStrings::default();
    let api = RecordingApi::default();
    let cache_dir = FakeString::unborrowable("/tmp/cache");

    let handle = create_delegate(
        &mut strings,
        &api,
        &FakeString::new("/opt/delegate.so"),
        Some(&cache_dir),
    );

    assert_eq!(handle, DelegateHandle::INVALID);
    assert!(api.creates().is_empty());
    assert_eq!(strings.attempts(), 2);
    // The library path was borrowed and must still be released.
    assert_eq!(strings.acquired(), 1);
    assert_eq!(strings.released(), 1);
    assert_eq!(strings.outstanding(), 0);
}

#[test]
fn test_native_null_sentinel_passes_through_and_releases_strings() {
    let mut strings = CountingStrings::default();
    let api = RecordingApi::with_outcome(CreateOutcome::ReturnNull);
    let cache_dir = FakeString::new("/tmp/cache");

    let handle = create_delegate(
        &mut strings,
        &api,
        &FakeString::new("/missing/libdelegate.so"),
        Some(&cache_dir),
    );

    assert_eq!(handle, DelegateHandle::INVALID);
    assert_eq!(api.creates().len(), 1);
    assert_eq!(strings.acquired(), 2);
    assert_eq!(strings.outstanding(), 0);
}

#[test]
fn test_rejected_options_return_zero_and_release_strings() {
    let mut strings = CountingStrings::default();
    let api = RecordingApi::with_outcome(CreateOutcome::Reject);
    let cache_dir = FakeString::new("/tmp/cache");

    let handle = create_delegate(
        &mut strings,
        &api,
        &FakeString::new("/opt/delegate.so"),
        Some(&cache_dir),
    );

    assert_eq!(handle, DelegateHandle::INVALID);
    assert_eq!(strings.acquired(), 2);
    assert_eq!(strings.outstanding(), 0);
}

#[test]
fn test_destroy_deletes_pointer_returned_by_create() {
    let mut strings = CountingStrings::default();
    let api = RecordingApi::default();

    let handle = create_delegate(&mut strings, &api, &FakeString::new("/opt/delegate.so"), None);
    let raw = handle.into_raw();

    unsafe { destroy_delegate(&api, DelegateHandle::from_raw(raw)) };

    assert_eq!(api.deletes(), vec![api.creates()[0].delegate]);
}

#[test]
fn test_each_create_yields_independent_handle() {
    let mut strings = CountingStrings::default();
    let api = RecordingApi::default();

    let first = create_delegate(&mut strings, &api, &FakeString::new("/opt/a.so"), None);
    let second = create_delegate(&mut strings, &api, &FakeString::new("/opt/b.so"), None);

    assert_ne!(first, second);
    unsafe {
        destroy_delegate(&api, second);
        destroy_delegate(&api, first);
    }

    let creates = api.creates();
    assert_eq!(api.deletes(), vec![creates[1].delegate, creates[0].delegate]);
    assert_eq!(strings.outstanding(), 0);
}
