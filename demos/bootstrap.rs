// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bootstrap example for the framework.
//!
//! This example demonstrates:
//! - Booting the framework on an in-process host
//! - Registering a plugin's features from YAML declarations on disk
//! - Firing the host's lifecycle events
//! - Inspecting what reached the feature backend
//!
//! To run this example:
//! ```bash
//! cargo run --example bootstrap
//! ```

use fulcrum::prelude::*;
use std::fs;
use std::rc::Rc;

const ADDON: &str = r#"
initial_parameters:
  books.version: 1.2.0
service_providers:
  books.script:
    provider: provider.asset
    config:
      handle: books-js
      config: assets/books
  books.post_type:
    provider: provider.post_type
    config:
      post_type_name: book
      config: post_types/book
admin_service_providers:
  books.subtitle:
    provider: provider.metabox
    config:
      config:
        id: subtitle
        title: Subtitle
        screen: [book]
"#;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt::init();

    println!("=== Fulcrum: Bootstrap ===\n");

    // Lay out the plugin's declarations in a scratch directory
    let dir = std::env::temp_dir().join("fulcrum-bootstrap");
    fs::create_dir_all(dir.join("assets"))?;
    fs::create_dir_all(dir.join("post_types"))?;
    fs::write(dir.join("assets/books.yaml"), "file: /js/books.js\nversion: 1.2.0\n")?;
    fs::write(
        dir.join("post_types/book.yaml"),
        "singular_name: Book\nargs:\n  public: true\n  taxonomies: genre, author\n",
    )?;

    let backend = Rc::new(RecordingBackend::new());
    let fulcrum = Fulcrum::builder()
        .with_backend(backend.clone())
        .with_loader(Rc::new(YamlFileLoader::new(&dir)))
        .with_admin(true)
        .build()?;
    println!("Fulcrum {} booted.\n", fulcrum.version());

    let container = fulcrum.container();
    let addon = Addon::boot(Config::new(serde_yaml::from_str::<Value>(ADDON)?)?, container)?;
    println!("Addon registered {} features.", addon.providers().len());
    println!("Backend holds {} features before any event.\n", backend.len());

    for event in [
        events::PLUGINS_LOADED,
        events::INIT,
        events::ENQUEUE_SCRIPTS,
        events::LOAD_POST,
    ] {
        container.do_action(event)?;
        println!("--- after {} ---", event);
        for kind in [FeatureKind::Script, FeatureKind::PostType, FeatureKind::Metabox] {
            let names = backend.names(kind);
            if !names.is_empty() {
                println!("  {}: {}", kind, names.join(", "));
            }
        }
    }

    if let Some(book) = backend.config(FeatureKind::PostType, "book") {
        println!("\nbook labels.menu_name = {}", book.get_or("labels.menu_name", ""));
    }

    Ok(())
}
