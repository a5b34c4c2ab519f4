// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use super::HookLocator;

fn write_hook(dir: &Path, name: &str, executable: bool) {
    let path = dir.join(name);
    std::fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = if executable { 0o755 } else { 0o644 };
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(mode)).unwrap();
    }
    #[cfg(not(unix))]
    let _ = executable;
}

#[test]
fn test_finds_executable_hook() {
    let dir = tempfile::tempdir().unwrap();
    write_hook(dir.path(), "pre-commit", true);

    let locator = HookLocator::new(dir.path());
    assert_eq!(
        locator.find_hook("pre-commit"),
        Some(dir.path().join("pre-commit"))
    );
}

#[test]
fn test_missing_hook_is_absent() {
    let dir = tempfile::tempdir().unwrap();
    let locator = HookLocator::new(dir.path());
    assert_eq!(locator.find_hook("pre-commit"), None);
}

#[test]
fn test_detached_locator_never_finds_hooks() {
    let locator = HookLocator::detached();
    assert_eq!(locator.find_hook("pre-commit"), None);
    assert_eq!(locator.hooks_dir(), None);
}

#[cfg(unix)]
#[test]
fn test_non_executable_hook_is_absent_with_one_advisory() {
    let dir = tempfile::tempdir().unwrap();
    write_hook(dir.path(), "pre-commit", false);

    let locator = HookLocator::new(dir.path());
    assert_eq!(locator.find_hook("pre-commit"), None);
    assert_eq!(locator.find_hook("pre-commit"), None);

    // Advised once for the name, however many lookups happen.
    assert_eq!(locator.advised_events(), 1);
}

#[cfg(unix)]
#[test]
fn test_advisories_are_tracked_per_event_name() {
    let dir = tempfile::tempdir().unwrap();
    write_hook(dir.path(), "pre-commit", false);
    write_hook(dir.path(), "pre-push", false);

    let locator = HookLocator::new(dir.path());
    locator.find_hook("pre-commit");
    locator.find_hook("pre-push");
    locator.find_hook("pre-commit");

    assert_eq!(locator.advised_events(), 2);
}

#[cfg(unix)]
#[test]
fn test_disabled_advice_still_reports_absent() {
    let dir = tempfile::tempdir().unwrap();
    write_hook(dir.path(), "pre-commit", false);

    let locator = HookLocator::new(dir.path()).with_advice(false);
    assert_eq!(locator.find_hook("pre-commit"), None);
}

#[test]
fn test_directory_named_after_event_is_not_a_hook() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("pre-commit")).unwrap();

    let locator = HookLocator::new(dir.path());
    assert_eq!(locator.find_hook("pre-commit"), None);
}
