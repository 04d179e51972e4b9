// SPDX-License-Identifier: MIT OR Apache-2.0

//! Edit screen metaboxes.
//!
//! Metaboxes only exist in the admin. Their provider queues registrations and
//! flushes the queue when an edit screen loads.

use crate::domain::{Config, Declaration, FulcrumError, Mapping, Result, Value};
use crate::features::{self, Feature};
use crate::ports::hooks::events;
use crate::ports::provider::base_structure;
use crate::ports::{FeatureKind, LifecycleHooks, Provider};
use crate::service::provider::flush_queue_on;
use crate::service::{Autoload, Concrete, Container};
use std::any::Any;

/// A metabox shown on one or more edit screens.
#[derive(Debug, Clone)]
pub struct Metabox {
    id: String,
    config: Config,
}

impl Metabox {
    /// Creates a metabox, checking for an `id`, a `title` and a non-empty `screen` list.
    pub fn new(config: Config) -> Result<Self> {
        let id = config
            .get("id")
            .and_then(Value::to_key_string)
            .unwrap_or_default();

        let message = if id.is_empty() {
            Some("A metabox requires an id")
        } else if !config.get_bool("title") {
            Some("A metabox requires a title")
        } else if !config.is_array("screen", true) {
            Some("A metabox requires at least one screen")
        } else {
            None
        };

        match message {
            Some(message) => Err(FulcrumError::feature("metabox", id, message)),
            None => Ok(Self { id, config }),
        }
    }

    /// Returns the metabox id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the title shown in the metabox header.
    pub fn title(&self) -> &str {
        self.config.get_str("title").unwrap_or_default()
    }

    /// Returns the screens the metabox is shown on.
    pub fn screens(&self) -> Vec<String> {
        self.config
            .get("screen")
            .map(|screens| match screens {
                Value::Sequence(list) => list.iter().filter_map(Value::to_key_string).collect(),
                Value::Mapping(map) => map.values().filter_map(Value::to_key_string).collect(),
                _ => Vec::new(),
            })
            .unwrap_or_default()
    }

    /// Returns the screen area, `advanced` unless configured.
    pub fn context(&self) -> &str {
        self.config
            .get_str("context")
            .filter(|context| !context.is_empty())
            .unwrap_or("advanced")
    }

    /// Returns the display priority within the area, `default` unless configured.
    pub fn priority(&self) -> &str {
        self.config
            .get_str("priority")
            .filter(|priority| !priority.is_empty())
            .unwrap_or("default")
    }

    /// Returns `true` if the metabox is shown on `screen`.
    pub fn is_on_screen(&self, screen: &str) -> bool {
        self.screens().iter().any(|s| s == screen)
    }
}

impl Feature for Metabox {
    fn kind(&self) -> FeatureKind {
        FeatureKind::Metabox
    }

    fn name(&self) -> &str {
        &self.id
    }

    fn config(&self) -> &Config {
        &self.config
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Provider for metaboxes.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetaboxProvider;

impl Provider for MetaboxProvider {
    fn name(&self) -> &str {
        "metabox"
    }

    fn default_structure(&self) -> Mapping {
        base_structure()
    }

    fn accepts(&self, container: &Container) -> bool {
        container.is_admin()
    }

    fn init_events(&self, provider_id: &str, hooks: &dyn LifecycleHooks) {
        flush_queue_on(hooks, events::LOAD_POST, provider_id);
        flush_queue_on(hooks, events::LOAD_POST_NEW, provider_id);
    }

    fn get_concrete(&self, config: Mapping, _unique_id: &str, _defaults: Option<Value>) -> Result<Concrete> {
        let autoload = Autoload::from_value(config.get("autoload").unwrap_or(&Value::Null));
        let source = Declaration::from_value(config.get("config").cloned().unwrap_or_default());

        Ok(features::concrete(autoload, move |container| {
            Metabox::new(Config::load(source.clone(), None, container.loader())?)
        }))
    }
}
