// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the trait definitions (ports) through which the registration
//! pipeline talks to its host: loading external declarations, scheduling lifecycle
//! callbacks, handing built features to the platform, and the per-feature provider
//! contract. They are implemented by adapters in the adapters layer and by features.

pub mod backend;
pub mod hooks;
pub mod loader;
pub mod provider;

// Re-export commonly used types
pub use backend::{FeatureBackend, FeatureKind};
pub use hooks::{HookCallback, LifecycleHooks};
pub use loader::DeclarationLoader;
pub use provider::Provider;
