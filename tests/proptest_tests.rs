// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property-based tests using proptest.
//!
//! These tests check the dot-notation accessor and configuration layering against
//! arbitrary keys, paths and values.

use fulcrum::domain::{arr, Config, Mapping, Value};
use proptest::prelude::*;

fn segment() -> impl Strategy<Value = String> {
    "[a-z_]{1,8}"
}

fn path() -> impl Strategy<Value = String> {
    prop::collection::vec(segment(), 1..4).prop_map(|segments| segments.join("."))
}

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "\\PC{0,16}".prop_map(Value::from),
    ]
}

fn tree() -> impl Strategy<Value = Mapping> {
    prop::collection::vec((path(), scalar()), 0..8).prop_map(|entries| {
        let mut tree = Mapping::new();
        for (path, value) in entries {
            arr::set(&mut tree, &path, value);
        }
        tree
    })
}

// Test that a value assigned at a path can be read back at that path
proptest! {
    #[test]
    fn test_set_then_get(mut tree in tree(), path in path(), value in scalar()) {
        arr::set(&mut tree, &path, value.clone());
        prop_assert_eq!(arr::get(&tree, &path), Some(&value));
        prop_assert!(arr::has(&tree, &path));
    }
}

// Test that lookups of arbitrary paths never panic and agree with has()
proptest! {
    #[test]
    fn test_lookup_of_any_path_is_safe(tree in tree(), path in "\\PC{0,24}") {
        let found = arr::get(&tree, &path).is_some();
        prop_assert_eq!(arr::has(&tree, &path), found && !path.is_empty());
        prop_assert_eq!(arr::get_or(&tree, &path, "fallback").is_null(), found && arr::get(&tree, &path).map_or(false, Value::is_null));
    }
}

// Test that nothing is found in an empty tree
proptest! {
    #[test]
    fn test_empty_tree_has_nothing(path in "\\PC*") {
        let tree = Mapping::new();
        prop_assert!(!arr::has(&tree, &path));
        prop_assert!(!arr::is_array(&tree, &path, false));
    }
}

// Test that every flattened key resolves to the same leaf in the nested tree
proptest! {
    #[test]
    fn test_dot_keys_resolve(tree in tree()) {
        let flat = arr::dot(&tree, "");
        for (key, value) in &flat {
            prop_assert_eq!(arr::get(&tree, key), Some(value));
        }
    }
}

// Test that forgetting a path makes it unresolvable
proptest! {
    #[test]
    fn test_forget_removes_path(mut tree in tree(), path in path(), value in scalar()) {
        arr::set(&mut tree, &path, value);
        arr::forget(&mut tree, &path);
        prop_assert!(!arr::has(&tree, &path));
    }
}

// Test that source values win over defaults and default-only keys survive
proptest! {
    #[test]
    fn test_source_overrides_defaults(
        source in prop::collection::btree_map(segment(), scalar(), 0..6),
        defaults in prop::collection::btree_map(segment(), scalar(), 0..6),
    ) {
        let source: Mapping = source.into_iter().collect();
        let defaults: Mapping = defaults.into_iter().collect();

        let config = Config::with_defaults(source.clone(), defaults.clone()).unwrap();

        for (key, value) in &source {
            prop_assert_eq!(config.get(key), Some(value));
        }
        for (key, value) in &defaults {
            if !source.contains_key(key) {
                prop_assert_eq!(config.get(key), Some(value));
            }
        }
        prop_assert!(config.all().len() <= source.len() + defaults.len());
    }
}

// Test that a blank value is never truthy
proptest! {
    #[test]
    fn test_blank_is_falsy(value in scalar()) {
        if value.is_blank() {
            prop_assert!(!value.is_truthy());
        }
    }
}
