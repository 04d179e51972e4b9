// SPDX-License-Identifier: MIT OR Apache-2.0

//! Framework bootstrap.
//!
//! `Fulcrum` builds the container for a host, stores the framework's initial
//! parameters, registers the provider handler and the configured providers, and
//! announces itself once the host has loaded every plugin.

use crate::adapters::{EventHooks, RecordingBackend, YamlFileLoader};
use crate::domain::{Config, Mapping, Result, Value};
use crate::ports::hooks::events;
use crate::ports::{DeclarationLoader, FeatureBackend, LifecycleHooks, Provider};
use crate::service::{Autoload, Concrete, Container, Host, ProviderCatalog, ProviderHandler};
use std::rc::Rc;

/// The framework version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Container identifier of the provider handler.
pub const HANDLER_ID: &str = "provider.handler";

/// The framework: a configured container with the built-in providers registered.
///
/// # Examples
///
/// ```rust
/// use fulcrum::ports::hooks::events;
/// use fulcrum::service::{Fulcrum, ServiceProvider};
///
/// # fn main() -> fulcrum::domain::Result<()> {
/// let fulcrum = Fulcrum::builder().build()?;
/// let container = fulcrum.container();
///
/// assert!(container.has("provider.asset"));
/// assert!(!container.has("provider.metabox"));
/// assert_eq!(container.get::<ServiceProvider>("provider.asset")?.name(), "asset");
///
/// container.do_action(events::PLUGINS_LOADED)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Fulcrum {
    config: Config,
    container: Container,
}

impl Fulcrum {
    /// Creates a new builder.
    pub fn builder() -> FulcrumBuilder {
        FulcrumBuilder::new()
    }

    /// Returns the framework's shipped configuration.
    ///
    /// ```yaml
    /// initial_parameters:
    ///   is_dev_env: false
    /// service_providers:
    ///   provider.asset: asset
    ///   provider.post_type: post_type
    ///   provider.shortcode: shortcode
    ///   provider.template: template
    ///   provider.widget: widget
    /// admin_service_providers:
    ///   provider.metabox: metabox
    /// ```
    pub fn default_config() -> Config {
        let mut initial_parameters = Mapping::new();
        initial_parameters.insert("is_dev_env".to_string(), Value::Bool(false));

        let mut service_providers = Mapping::new();
        for kind in ["asset", "post_type", "shortcode", "template", "widget"] {
            service_providers.insert(format!("provider.{}", kind), Value::from(kind));
        }

        let mut admin_service_providers = Mapping::new();
        admin_service_providers.insert("provider.metabox".to_string(), Value::from("metabox"));

        let mut tree = Mapping::new();
        tree.insert("initial_parameters".to_string(), Value::Mapping(initial_parameters));
        tree.insert("service_providers".to_string(), Value::Mapping(service_providers));
        tree.insert(
            "admin_service_providers".to_string(),
            Value::Mapping(admin_service_providers),
        );
        Config::from_mapping(tree)
    }

    /// Returns the framework version.
    pub fn version(&self) -> &'static str {
        VERSION
    }

    /// Returns the configuration the framework was built from.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the container.
    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Consumes the framework and returns its container.
    pub fn into_container(self) -> Container {
        self.container
    }

    /// Returns `true` if the `is_dev_env` parameter is truthy.
    pub fn is_dev_env(&self) -> bool {
        self.container
            .parameter("is_dev_env")
            .map_or(false, |value| value.is_truthy())
    }

    fn boot(config: Config, container: Container, catalog: ProviderCatalog) -> Result<Self> {
        container.set_parameter("fulcrum.version", VERSION);
        init_parameters(&config, &container);

        container.register_concrete(
            HANDLER_ID,
            Concrete::new(Autoload::Eager, move |_| Ok(ProviderHandler::new(catalog.clone()))),
        )?;

        let handler = container.get::<ProviderHandler>(HANDLER_ID)?;
        if let Some(providers) = config.get("service_providers").and_then(Value::as_mapping) {
            handler.register(&container, providers)?;
        }
        if container.is_admin() {
            if let Some(providers) = config
                .get("admin_service_providers")
                .and_then(Value::as_mapping)
            {
                handler.register(&container, providers)?;
            }
        }

        container.hooks().add_action(
            events::PLUGINS_LOADED,
            1,
            Rc::new(|container: &Container| container.do_action(events::FULCRUM_IS_LOADED)),
        );

        tracing::info!("Fulcrum {} loaded with {} entries", VERSION, container.ids().len());
        Ok(Self { config, container })
    }
}

/// Stores every `initial_parameters` entry of `config` as a container parameter.
pub(crate) fn init_parameters(config: &Config, container: &Container) {
    if let Some(parameters) = config.get("initial_parameters").and_then(Value::as_mapping) {
        for (unique_id, value) in parameters {
            container.set_parameter(unique_id, value.clone());
        }
    }
}

/// Builder for constructing a `Fulcrum`.
///
/// Ports that are not supplied fall back to the in-process adapters and a YAML loader
/// rooted at the working directory.
///
/// # Examples
///
/// ```rust
/// use fulcrum::adapters::{MemoryLoader, RecordingBackend};
/// use fulcrum::service::Fulcrum;
/// use std::rc::Rc;
///
/// # fn main() -> fulcrum::domain::Result<()> {
/// let backend = Rc::new(RecordingBackend::new());
/// let fulcrum = Fulcrum::builder()
///     .with_backend(backend.clone())
///     .with_loader(Rc::new(MemoryLoader::new()))
///     .with_admin(true)
///     .build()?;
/// assert!(fulcrum.container().has("provider.metabox"));
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct FulcrumBuilder {
    config: Option<Config>,
    hooks: Option<Rc<dyn LifecycleHooks>>,
    backend: Option<Rc<dyn FeatureBackend>>,
    loader: Option<Rc<dyn DeclarationLoader>>,
    is_admin: bool,
    catalog: Option<ProviderCatalog>,
}

impl FulcrumBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the framework configuration; defaults to [`Fulcrum::default_config`].
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the host lifecycle scheduler.
    pub fn with_hooks(mut self, hooks: Rc<dyn LifecycleHooks>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Sets the host feature backend.
    pub fn with_backend(mut self, backend: Rc<dyn FeatureBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Sets the declaration loader.
    pub fn with_loader(mut self, loader: Rc<dyn DeclarationLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Sets whether the current request is an administrative one.
    pub fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }

    /// Replaces the provider catalog; defaults to [`ProviderCatalog::builtin`].
    pub fn with_catalog(mut self, catalog: ProviderCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Adds a provider kind to the catalog.
    pub fn with_provider<P, F>(mut self, kind: impl Into<String>, constructor: F) -> Self
    where
        P: Provider + 'static,
        F: Fn() -> P + 'static,
    {
        self.catalog = Some(
            self.catalog
                .take()
                .unwrap_or_else(ProviderCatalog::builtin)
                .with(kind, constructor),
        );
        self
    }

    /// Builds the container and boots the framework.
    pub fn build(self) -> Result<Fulcrum> {
        let host = Host::new(
            self.hooks.unwrap_or_else(|| Rc::new(EventHooks::new())),
            self.backend.unwrap_or_else(|| Rc::new(RecordingBackend::new())),
            self.loader.unwrap_or_else(|| Rc::new(YamlFileLoader::new("."))),
        )
        .with_admin(self.is_admin);

        Fulcrum::boot(
            self.config.unwrap_or_else(Fulcrum::default_config),
            Container::new(host),
            self.catalog.unwrap_or_else(ProviderCatalog::builtin),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FulcrumError;
    use crate::service::ServiceProvider;

    #[test]
    fn test_default_config_shape() {
        let config = Fulcrum::default_config();
        let providers = config.get("service_providers").and_then(Value::as_mapping).unwrap();
        assert_eq!(
            providers.keys().collect::<Vec<_>>(),
            vec![
                "provider.asset",
                "provider.post_type",
                "provider.shortcode",
                "provider.template",
                "provider.widget"
            ]
        );
        assert_eq!(
            config.all()["admin_service_providers"]
                .as_mapping()
                .unwrap()
                .get("provider.metabox"),
            Some(&Value::from("metabox"))
        );
    }

    #[test]
    fn test_boot_registers_handler_and_providers() {
        let fulcrum = Fulcrum::builder().build().unwrap();
        let container = fulcrum.container();

        assert_eq!(fulcrum.version(), "1.0.4");
        assert!(container.is_resolved(HANDLER_ID));
        for id in [
            "provider.asset",
            "provider.post_type",
            "provider.shortcode",
            "provider.template",
            "provider.widget",
        ] {
            assert!(container.is_resolved(id), "{} should be built", id);
        }
        assert!(!container.has("provider.metabox"));
        assert!(!fulcrum.is_dev_env());
    }

    #[test]
    fn test_admin_boot_adds_admin_providers() {
        let fulcrum = Fulcrum::builder().with_admin(true).build().unwrap();
        let provider = fulcrum
            .container()
            .get::<ServiceProvider>("provider.metabox")
            .unwrap();
        assert_eq!(provider.name(), "metabox");
    }

    #[test]
    fn test_initial_parameters() {
        let mut params = Mapping::new();
        params.insert("is_dev_env".to_string(), Value::Bool(true));
        params.insert("fulcrum.plugin_dir".to_string(), Value::from("/srv/fulcrum"));

        let mut config = Fulcrum::default_config();
        config.push("initial_parameters", params);

        let fulcrum = Fulcrum::builder().with_config(config).build().unwrap();
        assert!(fulcrum.is_dev_env());
        assert_eq!(
            fulcrum.container().parameter("fulcrum.plugin_dir").unwrap(),
            Value::from("/srv/fulcrum")
        );
    }

    #[test]
    fn test_unknown_provider_fails_boot() {
        let mut config = Fulcrum::default_config();
        let mut providers = Mapping::new();
        providers.insert("provider.schema".to_string(), Value::from("schema"));
        config.push("service_providers", providers);

        let err = Fulcrum::builder().with_config(config).build().unwrap_err();
        assert!(matches!(err, FulcrumError::UnknownProvider { .. }));
    }

    #[test]
    fn test_plugins_loaded_announces_fulcrum() {
        let hooks = Rc::new(EventHooks::new());
        let fulcrum = Fulcrum::builder().with_hooks(hooks.clone()).build().unwrap();

        fulcrum.container().do_action(events::PLUGINS_LOADED).unwrap();
        assert_eq!(hooks.fired(events::FULCRUM_IS_LOADED), 1);
    }
}
