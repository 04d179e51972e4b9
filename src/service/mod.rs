// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer containing the container and the registration pipeline.
//!
//! This module contains the `Container`, the provider pipeline built on it
//! (`ServiceProvider`, `ProviderHandler`, `ProviderCatalog`), and the two bootstraps
//! that drive the pipeline from configuration: `Fulcrum` for the framework and
//! `Addon` for plugins built on it.

pub mod addon;
pub mod container;
pub mod fulcrum;
pub mod handler;
pub mod provider;

// Re-export commonly used types
pub use addon::Addon;
pub use container::{Autoload, AutoloadHook, Concrete, Container, Factory, Host, Service};
pub use fulcrum::{Fulcrum, FulcrumBuilder};
pub use handler::{ProviderCatalog, ProviderConstructor, ProviderHandler};
pub use provider::{Registration, ServiceProvider};
