// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use rstest::rstest;

use super::ConfigSet;

#[test]
fn test_last_declaration_wins_for_lookups() {
    let mut config = ConfigSet::new();
    config.set("hook.lint.command", "first");
    config.set("hook.lint.command", "second");

    assert_eq!(config.string("hook.lint.command"), Some("second"));
}

#[test]
fn test_missing_key_is_none() {
    let config = ConfigSet::new();
    assert_eq!(config.string("hook.lint.command"), None);
    assert_eq!(config.uint("hook.jobs").unwrap(), None);
}

#[test]
fn test_iteration_preserves_declaration_order() {
    let mut config = ConfigSet::new();
    config.set("hook.a.event", "pre-commit");
    config.set("hook.b.event", "pre-commit");
    config.set("hook.a.event", "pre-commit");

    let keys: Vec<&str> = config.iter().map(|(k, _)| k).collect();
    assert_eq!(
        keys,
        vec!["hook.a.event", "hook.b.event", "hook.a.event"]
    );
}

#[rstest]
#[case("0", 0)]
#[case("4", 4)]
#[case("128", 128)]
fn test_uint_parses(#[case] raw: &str, #[case] expected: u64) {
    let mut config = ConfigSet::new();
    config.set("hook.jobs", raw);
    assert_eq!(config.uint("hook.jobs").unwrap(), Some(expected));
}

#[rstest]
#[case("four")]
#[case("-1")]
#[case("")]
fn test_uint_rejects_non_integers(#[case] raw: &str) {
    let mut config = ConfigSet::new();
    config.set("hook.jobs", raw);
    assert!(config.uint("hook.jobs").is_err());
}

#[test]
fn test_settings_file_flattens_in_order() {
    let config = ConfigSet::from_toml_str(
        r#"
jobs = 2

[[hook]]
name = "lint"
command = "cargo clippy"
event = "pre-commit"

[[hook]]
name = "fmt"
command = "cargo fmt --check"
event = "pre-commit"
"#,
    )
    .unwrap();

    assert_eq!(config.uint("hook.jobs").unwrap(), Some(2));
    assert_eq!(config.string("hook.lint.command"), Some("cargo clippy"));
    assert_eq!(config.string("hook.fmt.event"), Some("pre-commit"));

    let event_keys: Vec<&str> = config
        .iter()
        .filter(|(k, _)| k.ends_with(".event"))
        .map(|(k, _)| k)
        .collect();
    assert_eq!(event_keys, vec!["hook.lint.event", "hook.fmt.event"]);
}

#[test]
fn test_settings_file_rejects_unknown_fields() {
    let result = ConfigSet::from_toml_str(
        r#"
[[hook]]
name = "lint"
command = "true"
event = "pre-commit"
timeout = 5
"#,
    );
    assert!(result.is_err());
}
