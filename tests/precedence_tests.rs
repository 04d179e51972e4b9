// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for configuration layering over declaration files.

mod common;

use common::yaml_file;
use fulcrum::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_file_source_over_inline_defaults() {
    let file = yaml_file(
        r#"
file: /js/main.js
version: 2.0.0
deps:
  - jquery
"#,
    );
    let loader = YamlFileLoader::new("/");
    let defaults = Value::from([
        ("file", Value::from("")),
        ("version", Value::from("")),
        ("in_footer", Value::from(true)),
        ("deps", Value::Sequence(Vec::new())),
    ]);

    let config = Config::load(
        Declaration::from(file.path().to_str().unwrap()),
        Some(Declaration::Tree(defaults)),
        &loader,
    )
    .unwrap();

    assert_eq!(config.get_str("file"), Some("/js/main.js"));
    assert_eq!(config.get_str("version"), Some("2.0.0"));
    assert!(config.get_bool("in_footer"));
    assert_eq!(config.get("deps.0"), None);
    assert_eq!(
        config.get("deps"),
        Some(&Value::Sequence(vec![Value::from("jquery")]))
    );
}

#[test]
fn test_file_defaults_under_inline_source() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("defaults.yaml"),
        "args:\n  public: false\n  labels:\n    menu_name: Books\n  has_archive: true\n",
    )
    .unwrap();
    let loader = YamlFileLoader::new(dir.path());

    let source = Value::from([(
        "args",
        Value::from([("public", Value::from(true)), ("rewrite", Value::from("books"))]),
    )]);
    let config = Config::load(
        Declaration::Tree(source),
        Some(Declaration::from("defaults")),
        &loader,
    )
    .unwrap();

    // Nested mappings merge key by key.
    assert!(config.get_bool("args.public"));
    assert!(config.get_bool("args.has_archive"));
    assert_eq!(config.get_str("args.rewrite"), Some("books"));
    assert_eq!(config.get_str("args.labels.menu_name"), Some("Books"));
}

#[test]
fn test_empty_reference_is_rejected() {
    let loader = YamlFileLoader::new(".");
    let err = Config::load(Declaration::from(""), None, &loader).unwrap_err();
    assert!(matches!(err, FulcrumError::EmptyDeclaration));
    assert!(err.is_configuration_error());
}

#[test]
fn test_missing_file_is_unreadable() {
    let dir = TempDir::new().unwrap();
    let loader = YamlFileLoader::new(dir.path());

    let err = Config::load(Declaration::from("nope.yaml"), None, &loader).unwrap_err();
    assert!(matches!(
        err,
        FulcrumError::UnreadableDeclaration { ref reference, .. } if reference == "nope.yaml"
    ));
}

#[test]
fn test_missing_defaults_fail_the_load() {
    let dir = TempDir::new().unwrap();
    let loader = YamlFileLoader::new(dir.path());

    let err = Config::load(
        Declaration::Tree(Value::mapping()),
        Some(Declaration::from("defaults.yaml")),
        &loader,
    )
    .unwrap_err();
    assert!(matches!(err, FulcrumError::UnreadableDeclaration { .. }));
}

#[test]
fn test_non_mapping_file_is_rejected() {
    let file = yaml_file("- just\n- a\n- list\n");
    let loader = YamlFileLoader::new("/");

    let err = Config::load(Declaration::from(file.path().to_str().unwrap()), None, &loader).unwrap_err();
    assert!(matches!(err, FulcrumError::InvalidRoot { .. }));
}

#[test]
fn test_references_resolve_through_memory_loader() {
    let loader = MemoryLoader::new().with_declaration("assets/theme", common::yaml("file: theme.css\n"));

    let config = Config::load(Declaration::from("assets/theme"), None, &loader).unwrap();
    assert_eq!(config.get_str("file"), Some("theme.css"));

    let err = Config::load(Declaration::from("assets/other"), None, &loader).unwrap_err();
    assert!(matches!(err, FulcrumError::DeclarationNotFound { .. }));
}
