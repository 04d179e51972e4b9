// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing port implementations.
//!
//! This module contains concrete, in-process implementations of the traits defined
//! in the ports layer: YAML and in-memory declaration loaders, a lifecycle hook
//! scheduler, and a feature backend that records what it is handed. Hosts embedding
//! the pipeline replace the scheduler and backend with bindings to the platform.

pub mod event_hooks;
pub mod memory;
pub mod recording_backend;
pub mod yaml_file;

// Re-export commonly used types
pub use event_hooks::EventHooks;
pub use memory::MemoryLoader;
pub use recording_backend::RecordingBackend;
pub use yaml_file::{YamlFileLoader, YamlParser};
