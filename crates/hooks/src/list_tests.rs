// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::{hook_event_key, list_hooks, HookEntry};
use crate::config::ConfigSet;
use crate::locator::HookLocator;

fn declare(config: &mut ConfigSet, name: &str, command: &str, event: &str) {
    config.set(format!("hook.{name}.command"), command);
    config.set(format!("hook.{name}.event"), event);
}

fn named(name: &str) -> HookEntry {
    HookEntry::Named(name.to_string())
}

#[test]
fn test_configured_hooks_listed_in_declaration_order() {
    let mut config = ConfigSet::new();
    declare(&mut config, "a", "true", "pre-commit");
    declare(&mut config, "b", "false", "pre-commit");

    let list = list_hooks(&config, &HookLocator::detached(), "pre-commit");
    assert_eq!(list, vec![named("a"), named("b")]);
}

#[test]
fn test_redeclaration_moves_hook_to_the_end() {
    let mut config = ConfigSet::new();
    declare(&mut config, "a", "old-command", "pre-commit");
    declare(&mut config, "b", "true", "pre-commit");
    declare(&mut config, "a", "new-command", "pre-commit");

    let list = list_hooks(&config, &HookLocator::detached(), "pre-commit");
    assert_eq!(list, vec![named("b"), named("a")]);
    assert_eq!(config.string("hook.a.command"), Some("new-command"));
}

#[test]
fn test_other_events_are_excluded() {
    let mut config = ConfigSet::new();
    declare(&mut config, "a", "true", "pre-commit");
    declare(&mut config, "c", "true", "pre-push");

    let list = list_hooks(&config, &HookLocator::detached(), "pre-commit");
    assert_eq!(list, vec![named("a")]);
}

#[test]
fn test_event_declaration_without_command_still_lists() {
    // The command is only resolved at dispatch time; a dangling event
    // declaration shows up in the list and fails later.
    let mut config = ConfigSet::new();
    config.set("hook.c.event", "pre-commit");

    let list = list_hooks(&config, &HookLocator::detached(), "pre-commit");
    assert_eq!(list, vec![named("c")]);
}

#[test]
fn test_command_without_event_declaration_never_lists() {
    let mut config = ConfigSet::new();
    config.set("hook.c.command", "true");

    let list = list_hooks(&config, &HookLocator::detached(), "pre-commit");
    assert!(list.is_empty());
}

#[test]
fn test_default_hook_is_always_last() {
    let dir = tempfile::tempdir().unwrap();
    let hook = dir.path().join("pre-commit");
    std::fs::write(&hook, "#!/bin/sh\nexit 0\n").unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&hook, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    let mut config = ConfigSet::new();
    declare(&mut config, "a", "true", "pre-commit");

    let locator = HookLocator::new(dir.path());
    let list = list_hooks(&config, &locator, "pre-commit");
    assert_eq!(list, vec![named("a"), HookEntry::Default]);

    // Present even with zero named entries.
    let list = list_hooks(&ConfigSet::new(), &locator, "pre-commit");
    assert_eq!(list, vec![HookEntry::Default]);
}

#[test]
#[should_panic(expected = "empty hook event name")]
fn test_empty_event_name_is_a_contract_violation() {
    list_hooks(&ConfigSet::new(), &HookLocator::detached(), "");
}

#[test]
fn test_hook_event_key_parsing() {
    assert_eq!(hook_event_key("hook.lint.event"), Some("lint"));
    assert_eq!(hook_event_key("hook.my.lint.event"), Some("my.lint"));
    assert_eq!(hook_event_key("hook.lint.command"), None);
    assert_eq!(hook_event_key("hook..event"), None);
    assert_eq!(hook_event_key("core.editor"), None);
}

#[test]
fn test_entry_identity_labels() {
    assert_eq!(HookEntry::Default.name(), "");
    assert_eq!(named("lint").name(), "lint");
    assert_eq!(HookEntry::Default.to_string(), "hooks directory");
    assert_eq!(named("lint").to_string(), "lint");
}
