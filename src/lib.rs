// SPDX-License-Identifier: MIT OR Apache-2.0

//! A configuration-driven service container and provider registration pipeline.
//!
//! Plugins describe their features (assets, shortcodes, post types, metaboxes,
//! templates, widgets) as configuration trees. Providers validate each description against a template, wrap
//! it into a factory and register it with the container, either at once or queued
//! until a later host lifecycle event. When that event fires, the built features are
//! handed to the host's feature backend.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: The configuration tree (`Value`), its dot-notation accessor
//!   (`arr`), `Config`, declarations and errors
//! - **Ports**: Trait definitions for the host (`LifecycleHooks`, `FeatureBackend`,
//!   `DeclarationLoader`) and the `Provider` contract
//! - **Adapters**: In-process hosts (`EventHooks`, `RecordingBackend`) and
//!   declaration loaders (`YamlFileLoader`, `MemoryLoader`)
//! - **Service**: The `Container`, provider pipeline and bootstrap (`Fulcrum`, `Addon`)
//! - **Features**: The built-in feature families and their providers
//!
//! # Quick Start
//!
//! ```rust
//! use fulcrum::prelude::*;
//! use std::rc::Rc;
//!
//! # fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let backend = Rc::new(RecordingBackend::new());
//! let fulcrum = Fulcrum::builder()
//!     .with_backend(backend.clone())
//!     .with_loader(Rc::new(MemoryLoader::new()))
//!     .build()?;
//!
//! let config = Config::new(serde_yaml::from_str::<Value>(
//!     r#"
//! service_providers:
//!   asset.main:
//!     provider: provider.asset
//!     config:
//!       handle: main-js
//!       config:
//!         file: /js/main.js
//!         version: 1.0.0
//! "#,
//! )?)?;
//! Addon::boot(config, fulcrum.container())?;
//!
//! fulcrum.container().do_action(events::ENQUEUE_SCRIPTS)?;
//! assert!(backend.is_registered(FeatureKind::Script, "main-js"));
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod features;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::{arr, Config, Declaration, FulcrumError, Mapping, Result, Value};
    pub use crate::features::{Feature, PostType, Shortcode};
    pub use crate::ports::hooks::events;
    pub use crate::ports::{DeclarationLoader, FeatureBackend, FeatureKind, LifecycleHooks, Provider};
    pub use crate::service::{
        Addon, Autoload, Concrete, Container, Fulcrum, Host, ProviderCatalog, ServiceProvider,
    };

    pub use crate::adapters::{EventHooks, MemoryLoader, RecordingBackend, YamlFileLoader, YamlParser};
}
