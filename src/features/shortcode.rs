// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shortcodes.

use crate::domain::{Config, Declaration, FulcrumError, Mapping, Result, Value};
use crate::features::{self, Feature};
use crate::ports::hooks::events;
use crate::ports::{FeatureKind, LifecycleHooks, Provider};
use crate::service::provider::register_features_on;
use crate::service::{Autoload, Concrete};
use std::any::Any;
use std::path::Path;

/// A shortcode handler.
///
/// The configuration names the tag (`shortcode`), the attribute defaults
/// (`defaults`) and the view rendering it (`view`). The view must be readable unless
/// `no_view` is set.
#[derive(Debug, Clone)]
pub struct Shortcode {
    tag: String,
    config: Config,
}

impl Shortcode {
    /// Creates a shortcode from its configuration.
    pub fn new(config: Config) -> Result<Self> {
        let tag = config.get_str("shortcode").unwrap_or_default().to_string();

        if tag.is_empty() || !config.is_array("defaults", true) || !config.has("view") {
            return Err(FulcrumError::feature(
                "shortcode",
                tag,
                "Invalid config for shortcode",
            ));
        }

        if !config.get_bool("no_view") {
            let view = config.get("view").and_then(Value::to_key_string).unwrap_or_default();
            if !Path::new(&view).is_file() {
                return Err(FulcrumError::feature(
                    "shortcode",
                    tag,
                    format!("The specified view file [{}] is not readable", view),
                ));
            }
        }

        Ok(Self { tag, config })
    }

    /// Returns the shortcode tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns the view path, unless the shortcode renders without one.
    pub fn view(&self) -> Option<&str> {
        if self.config.get_bool("no_view") {
            return None;
        }
        self.config.get_str("view")
    }

    /// Combines caller attributes with the configured defaults.
    ///
    /// Every default key appears in the result, taking the caller's value when given.
    /// Attributes without a default are dropped.
    pub fn attributes(&self, atts: &Mapping) -> Mapping {
        self.config
            .get("defaults")
            .and_then(Value::as_mapping)
            .map(|defaults| {
                defaults
                    .iter()
                    .map(|(key, default)| {
                        let value = atts.get(key).unwrap_or(default);
                        (key.clone(), value.clone())
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Feature for Shortcode {
    fn kind(&self) -> FeatureKind {
        FeatureKind::Shortcode
    }

    fn name(&self) -> &str {
        &self.tag
    }

    fn config(&self) -> &Config {
        &self.config
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Provider for shortcodes.
///
/// Shortcodes have no family defaults; the registration's `config` entry is the
/// whole shortcode configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortcodeProvider;

impl Provider for ShortcodeProvider {
    fn name(&self) -> &str {
        "shortcode"
    }

    fn skip_queue(&self) -> bool {
        true
    }

    fn default_structure(&self) -> Mapping {
        let mut structure = Mapping::new();
        structure.insert("autoload".to_string(), Value::Bool(true));
        structure.insert("config".to_string(), Value::from(""));
        structure
    }

    fn init_events(&self, provider_id: &str, hooks: &dyn LifecycleHooks) {
        register_features_on(hooks, events::INIT, provider_id);
    }

    fn get_concrete(&self, config: Mapping, _unique_id: &str, _defaults: Option<Value>) -> Result<Concrete> {
        let autoload = Autoload::from_value(config.get("autoload").unwrap_or(&Value::Null));
        let source = Declaration::from_value(config.get("config").cloned().unwrap_or_default());

        Ok(features::concrete(autoload, move |container| {
            Shortcode::new(Config::load(source.clone(), None, container.loader())?)
        }))
    }
}
