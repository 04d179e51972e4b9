// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin bootstrap.
//!
//! An addon is a plugin built on the framework. Its configuration lists the
//! parameters it contributes and the features it registers with the framework's
//! providers:
//!
//! ```yaml
//! initial_parameters:
//!   books.version: 1.2.0
//! service_providers:
//!   books.script:
//!     provider: provider.asset
//!     config:
//!       autoload: true
//!       handle: books-js
//!       config: assets/books.yaml
//! admin_service_providers:
//!   books.metabox:
//!     provider: provider.metabox
//!     config: metabox/books.yaml
//! plugin_activation_keys:
//!   - books.post_type
//! ```

use crate::domain::{Config, Declaration, FulcrumError, Mapping, Result, Value};
use crate::features;
use crate::service::fulcrum::init_parameters;
use crate::service::{Container, ServiceProvider};

/// A booted plugin.
#[derive(Debug)]
pub struct Addon {
    config: Config,
    providers: Vec<String>,
}

impl Addon {
    /// Registers the addon's parameters and features into `container`.
    ///
    /// Admin service providers are only loaded for administrative requests. Every
    /// registration goes through the named provider, so its validation applies.
    pub fn boot(config: Config, container: &Container) -> Result<Self> {
        let mut addon = Self {
            config,
            providers: Vec::new(),
        };

        init_parameters(&addon.config, container);

        if let Some(entries) = addon.entries("service_providers") {
            addon.load_service_providers(container, &entries)?;
        }
        if container.is_admin() {
            if let Some(entries) = addon.entries("admin_service_providers") {
                addon.load_service_providers(container, &entries)?;
            }
        }

        tracing::debug!(
            "Addon registered {} features",
            addon.providers.len()
        );
        Ok(addon)
    }

    /// Returns the addon's configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the provider identifier used by each registration, in order.
    pub fn providers(&self) -> &[String] {
        &self.providers
    }

    /// Returns the identifiers registered with the backend on activation.
    pub fn activation_keys(&self) -> Vec<String> {
        self.config
            .get("plugin_activation_keys")
            .map(|keys| match keys {
                Value::Sequence(list) => list.iter().filter_map(Value::to_key_string).collect(),
                Value::Mapping(map) => map.values().filter_map(Value::to_key_string).collect(),
                scalar => scalar.to_key_string().into_iter().collect(),
            })
            .unwrap_or_default()
    }

    /// Registers every activation key's feature with the host backend.
    pub fn activate(&self, container: &Container) -> Result<()> {
        for unique_id in self.activation_keys() {
            tracing::debug!("Activating '{}'", unique_id);
            features::resolve(container, &unique_id)?.register(container)?;
        }
        Ok(())
    }

    fn entries(&self, key: &str) -> Option<Mapping> {
        self.config.get(key).and_then(Value::as_mapping).cloned()
    }

    fn load_service_providers(&mut self, container: &Container, entries: &Mapping) -> Result<()> {
        for (unique_id, entry) in entries {
            let provider_id = entry
                .as_mapping()
                .and_then(|entry| entry.get("provider"))
                .and_then(Value::as_str)
                .filter(|id| !id.is_empty())
                .ok_or_else(|| missing(unique_id, "provider"))?;

            let registration = match entry.as_mapping().and_then(|entry| entry.get("config")) {
                Some(config) if !config.is_blank() => {
                    Declaration::from_value(config.clone()).resolve(container.loader())?
                }
                _ => return Err(missing(unique_id, "config")),
            };
            let registration = match registration {
                Value::Mapping(map) => map,
                other => {
                    return Err(FulcrumError::InvalidRoot {
                        found: other.type_name().to_string(),
                    })
                }
            };

            container
                .get::<ServiceProvider>(provider_id)?
                .register(container, registration, unique_id)?;
            self.providers.push(provider_id.to_string());
        }
        Ok(())
    }
}

fn missing(unique_id: &str, key: &str) -> FulcrumError {
    FulcrumError::MissingConfigKey {
        unique_id: unique_id.to_string(),
        key: key.to_string(),
        provider: "addon".to_string(),
    }
}
