// SPDX-License-Identifier: MIT OR Apache-2.0

//! Script and stylesheet assets.
//!
//! Assets register immediately (the provider skips its queue) and are enqueued when
//! the host fires its enqueue event. An asset marked `pre_conditional_load` is only
//! enqueued on the pages listed in `load_on_page`.

use crate::domain::{Config, Declaration, FulcrumError, Mapping, Result, Value};
use crate::features::{self, Feature};
use crate::ports::hooks::events;
use crate::ports::{FeatureKind, LifecycleHooks, Provider};
use crate::service::provider::{instantiate_config, register_features_on};
use crate::service::{Autoload, Concrete, Container};
use std::any::Any;

/// A script or stylesheet.
#[derive(Debug, Clone)]
pub struct Asset {
    handle: String,
    kind: FeatureKind,
    config: Config,
}

impl Asset {
    /// Creates an asset, checking that it has a handle, a file and a version.
    pub fn new(handle: impl Into<String>, is_script: bool, config: Config) -> Result<Self> {
        let handle = handle.into();
        let message = if handle.is_empty() {
            Some("A unique ID is required for the asset".to_string())
        } else if !config.get_bool("file") {
            Some(format!(
                "This asset requires a fully qualified file path and name [{}]",
                handle
            ))
        } else if !config.get_bool("version") {
            Some(format!("This asset requires a version [{}]", handle))
        } else {
            None
        };

        if let Some(message) = message {
            return Err(FulcrumError::feature("asset", handle, message));
        }

        Ok(Self {
            handle,
            kind: if is_script {
                FeatureKind::Script
            } else {
                FeatureKind::Style
            },
            config,
        })
    }

    /// Returns the asset handle.
    pub fn handle(&self) -> &str {
        &self.handle
    }

    /// Returns `true` for scripts, `false` for stylesheets.
    pub fn is_script(&self) -> bool {
        self.kind == FeatureKind::Script
    }

    /// Returns `true` if the asset should be enqueued on the current page.
    pub fn should_enqueue(&self, container: &Container) -> bool {
        if !self.config.get_bool("pre_conditional_load") {
            return true;
        }

        match self.config.get("load_on_page") {
            Some(pages) => container.backend().is_current_page(pages),
            None => true,
        }
    }
}

impl Feature for Asset {
    fn kind(&self) -> FeatureKind {
        self.kind
    }

    fn name(&self) -> &str {
        &self.handle
    }

    fn config(&self) -> &Config {
        &self.config
    }

    fn register(&self, container: &Container) -> Result<()> {
        if !self.should_enqueue(container) {
            tracing::debug!("Not enqueuing {} '{}' on this page", self.kind, self.handle);
            return Ok(());
        }
        container
            .backend()
            .register(self.kind, &self.handle, &self.config)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Provider for assets.
///
/// Registration template:
///
/// ```yaml
/// autoload: true
/// handle: ''        # required
/// is_script: true
/// config: {}        # or a declaration reference
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct AssetProvider;

impl AssetProvider {
    /// The defaults every asset configuration is layered over.
    pub fn asset_defaults() -> Mapping {
        let mut defaults = Mapping::new();
        defaults.insert("file".to_string(), Value::from(""));
        defaults.insert("deps".to_string(), Value::Sequence(Vec::new()));
        defaults.insert("version".to_string(), Value::from(""));
        defaults.insert("in_footer".to_string(), Value::Bool(true));
        defaults.insert("pre_conditional_load".to_string(), Value::Bool(false));
        defaults.insert("load_on_page".to_string(), Value::Sequence(Vec::new()));
        defaults
    }
}

impl Provider for AssetProvider {
    fn name(&self) -> &str {
        "asset"
    }

    fn skip_queue(&self) -> bool {
        true
    }

    fn default_structure(&self) -> Mapping {
        let mut structure = Mapping::new();
        structure.insert("autoload".to_string(), Value::Bool(true));
        structure.insert("handle".to_string(), Value::from(""));
        structure.insert("is_script".to_string(), Value::Bool(true));
        structure.insert("config".to_string(), Value::mapping());
        structure
    }

    fn defaults(&self) -> Option<Declaration> {
        Some(Declaration::from(Self::asset_defaults()))
    }

    fn init_events(&self, provider_id: &str, hooks: &dyn LifecycleHooks) {
        register_features_on(hooks, events::ENQUEUE_SCRIPTS, provider_id);
    }

    fn get_concrete(&self, config: Mapping, _unique_id: &str, defaults: Option<Value>) -> Result<Concrete> {
        let autoload = Autoload::from_value(config.get("autoload").unwrap_or(&Value::Null));
        let handle = config
            .get("handle")
            .and_then(Value::to_key_string)
            .unwrap_or_default();
        let is_script = config.get("is_script").map_or(true, Value::is_truthy);

        Ok(features::concrete(autoload, move |container| {
            let asset_config = instantiate_config(container.loader(), &config, defaults.as_ref())?;
            Asset::new(handle.clone(), is_script, asset_config)
        }))
    }
}
