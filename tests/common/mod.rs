// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared fixtures for the integration tests.

use fulcrum::prelude::*;
use std::io::Write;
use std::rc::Rc;
use tempfile::NamedTempFile;

/// Host handles kept by a test so it can inspect what the pipeline did.
#[allow(dead_code)]
pub struct TestHost {
    pub hooks: Rc<EventHooks>,
    pub backend: Rc<RecordingBackend>,
    pub loader: Rc<MemoryLoader>,
}

#[allow(dead_code)]
impl TestHost {
    /// Creates a host around an in-memory loader.
    pub fn new(loader: MemoryLoader) -> Self {
        Self {
            hooks: Rc::new(EventHooks::new()),
            backend: Rc::new(RecordingBackend::new()),
            loader: Rc::new(loader),
        }
    }

    /// Returns the ports bundle for a container.
    pub fn host(&self, is_admin: bool) -> Host {
        Host::new(self.hooks.clone(), self.backend.clone(), self.loader.clone()).with_admin(is_admin)
    }

    /// Boots the framework on this host with its default configuration.
    pub fn fulcrum(&self, is_admin: bool) -> Fulcrum {
        Fulcrum::builder()
            .with_hooks(self.hooks.clone())
            .with_backend(self.backend.clone())
            .with_loader(self.loader.clone())
            .with_admin(is_admin)
            .build()
            .unwrap()
    }
}

/// Parses a YAML snippet into a value.
#[allow(dead_code)]
pub fn yaml(source: &str) -> Value {
    serde_yaml::from_str(source).unwrap()
}

/// Parses a YAML snippet into a mapping.
#[allow(dead_code)]
pub fn mapping(source: &str) -> Mapping {
    serde_yaml::from_str(source).unwrap()
}

/// Writes `contents` to a temporary `.yaml` file.
#[allow(dead_code)]
pub fn yaml_file(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    write!(file, "{}", contents).unwrap();
    file.flush().unwrap();
    file
}
