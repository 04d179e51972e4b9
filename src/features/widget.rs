// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sidebar widgets.
//!
//! Widgets wait in their provider's queue until the host initializes its widget
//! registry. The queue is then flushed, every widget is handed to the backend, and
//! `fulcrum_widget_init` fires so addons can act on the registered set.

use crate::domain::{Config, Declaration, FulcrumError, Mapping, Result, Value};
use crate::features::{self, Feature};
use crate::ports::hooks::{events, DEFAULT_PRIORITY};
use crate::ports::provider::base_structure;
use crate::ports::{FeatureKind, LifecycleHooks, Provider};
use crate::service::provider::instantiate_config;
use crate::service::{Autoload, Concrete, Container, ServiceProvider};
use std::any::Any;
use std::rc::Rc;

/// A sidebar widget.
#[derive(Debug, Clone)]
pub struct Widget {
    id_base: String,
    config: Config,
}

impl Widget {
    /// Creates a widget, checking for an `id_base` and a `name`.
    pub fn new(config: Config) -> Result<Self> {
        let id_base = config
            .get("id_base")
            .and_then(Value::to_key_string)
            .unwrap_or_default();

        if id_base.is_empty() {
            return Err(FulcrumError::feature("widget", id_base, "A widget requires an id_base"));
        }
        if !config.get_bool("name") {
            return Err(FulcrumError::feature("widget", id_base, "A widget requires a name"));
        }
        Ok(Self { id_base, config })
    }

    /// Returns the base id instances are numbered from.
    pub fn id_base(&self) -> &str {
        &self.id_base
    }

    /// Returns the name shown in the widgets screen.
    pub fn title(&self) -> &str {
        self.config.get_str("name").unwrap_or_default()
    }

    /// Returns the options passed to the host's widget constructor.
    pub fn widget_options(&self) -> Mapping {
        self.mapping("widget_options")
    }

    /// Returns the options for the widget's settings form.
    pub fn control_options(&self) -> Mapping {
        self.mapping("control_options")
    }

    /// Returns the settings form view, if one is configured.
    pub fn form_view(&self) -> Option<&str> {
        self.config.get_str("form_view").filter(|view| !view.is_empty())
    }

    /// Fills an instance's settings in from the configured defaults.
    ///
    /// Saved settings win; settings without a default are kept.
    pub fn instance(&self, saved: &Mapping) -> Mapping {
        let mut instance = self.mapping("defaults");
        for (key, value) in saved {
            instance.insert(key.clone(), value.clone());
        }
        instance
    }

    /// Adds the instance's `class` setting to the `before_widget` markup.
    ///
    /// The class goes in front of the `widget` class the host emits. Markup without
    /// that class, or an instance without a class, is returned unchanged.
    pub fn before_widget(&self, before_widget: &str, instance: &Mapping) -> String {
        let class = instance
            .get("class")
            .and_then(Value::to_key_string)
            .unwrap_or_default();
        if class.is_empty() {
            return before_widget.to_string();
        }
        before_widget.replacen(
            "class=\"widget ",
            &format!("class=\"{} widget ", escape_attribute(&class)),
            1,
        )
    }

    fn mapping(&self, path: &str) -> Mapping {
        self.config
            .get(path)
            .and_then(Value::as_mapping)
            .cloned()
            .unwrap_or_default()
    }
}

fn escape_attribute(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            c => escaped.push(c),
        }
    }
    escaped
}

impl Feature for Widget {
    fn kind(&self) -> FeatureKind {
        FeatureKind::Widget
    }

    fn name(&self) -> &str {
        &self.id_base
    }

    fn config(&self) -> &Config {
        &self.config
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Provider for widgets.
#[derive(Debug, Clone, Copy, Default)]
pub struct WidgetProvider;

impl WidgetProvider {
    /// The defaults every widget configuration is layered over.
    pub fn widget_defaults() -> Mapping {
        let mut defaults = Mapping::new();
        for key in ["widget_options", "control_options", "defaults"] {
            defaults.insert(key.to_string(), Value::mapping());
        }
        defaults.insert("form_view".to_string(), Value::from(""));
        defaults
    }
}

impl Provider for WidgetProvider {
    fn name(&self) -> &str {
        "widget"
    }

    fn default_structure(&self) -> Mapping {
        base_structure()
    }

    fn defaults(&self) -> Option<Declaration> {
        Some(Declaration::from(Self::widget_defaults()))
    }

    fn init_events(&self, provider_id: &str, hooks: &dyn LifecycleHooks) {
        let provider_id = provider_id.to_string();
        hooks.add_action(
            events::WIDGETS_INIT,
            DEFAULT_PRIORITY,
            Rc::new(move |container: &Container| {
                let provider = container.get::<ServiceProvider>(&provider_id)?;
                provider.register_queue(container)?;
                provider.register_features(container)?;
                container.do_action(events::FULCRUM_WIDGET_INIT)
            }),
        );
    }

    fn get_concrete(&self, config: Mapping, _unique_id: &str, defaults: Option<Value>) -> Result<Concrete> {
        let autoload = Autoload::from_value(config.get("autoload").unwrap_or(&Value::Null));

        Ok(features::concrete(autoload, move |container| {
            Widget::new(instantiate_config(container.loader(), &config, defaults.as_ref())?)
        }))
    }
}
