// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider catalog and handler.
//!
//! Configuration names providers by kind (`"asset"`, `"post_type"`, ...). The
//! `ProviderCatalog` maps each kind to a constructor, and the `ProviderHandler`
//! registers one provider instance per configured identifier into the container.

use crate::domain::{FulcrumError, Mapping, Result, Value};
use crate::features::{
    AssetProvider, MetaboxProvider, PostTypeProvider, ShortcodeProvider, TemplateProvider, WidgetProvider,
};
use crate::ports::Provider;
use crate::service::{Autoload, Concrete, Container, ServiceProvider};
use indexmap::IndexMap;
use std::fmt;
use std::rc::Rc;

/// Constructs a fresh provider of one kind.
pub type ProviderConstructor = Rc<dyn Fn() -> Box<dyn Provider>>;

/// A map from provider kind to constructor.
///
/// # Examples
///
/// ```rust
/// use fulcrum::service::ProviderCatalog;
///
/// let catalog = ProviderCatalog::builtin();
/// assert!(catalog.contains("asset"));
/// assert!(catalog.contains("widget"));
/// assert!(!catalog.contains("schema"));
/// ```
#[derive(Clone, Default)]
pub struct ProviderCatalog {
    kinds: IndexMap<String, ProviderConstructor>,
}

impl ProviderCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog holding the built-in feature providers.
    pub fn builtin() -> Self {
        Self::new()
            .with("asset", || AssetProvider)
            .with("post_type", || PostTypeProvider)
            .with("shortcode", || ShortcodeProvider)
            .with("template", || TemplateProvider)
            .with("widget", || WidgetProvider)
            .with("metabox", || MetaboxProvider)
    }

    /// Adds or replaces the constructor for `kind`.
    pub fn insert<P, F>(&mut self, kind: impl Into<String>, constructor: F)
    where
        P: Provider + 'static,
        F: Fn() -> P + 'static,
    {
        self.kinds.insert(
            kind.into(),
            Rc::new(move || Box::new(constructor()) as Box<dyn Provider>),
        );
    }

    /// Adds or replaces the constructor for `kind`, builder style.
    pub fn with<P, F>(mut self, kind: impl Into<String>, constructor: F) -> Self
    where
        P: Provider + 'static,
        F: Fn() -> P + 'static,
    {
        self.insert(kind, constructor);
        self
    }

    /// Returns `true` if `kind` has a constructor.
    pub fn contains(&self, kind: &str) -> bool {
        self.kinds.contains_key(kind)
    }

    /// Returns the known kinds in insertion order.
    pub fn kinds(&self) -> Vec<&str> {
        self.kinds.keys().map(String::as_str).collect()
    }

    /// Returns the constructor for `kind`.
    pub fn get(&self, kind: &str) -> Option<ProviderConstructor> {
        self.kinds.get(kind).cloned()
    }
}

impl fmt::Debug for ProviderCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderCatalog")
            .field("kinds", &self.kinds())
            .finish()
    }
}

/// Registers providers into a container from a `unique_id → kind` mapping.
#[derive(Clone, Debug)]
pub struct ProviderHandler {
    catalog: ProviderCatalog,
}

impl ProviderHandler {
    /// Creates a handler resolving kinds through `catalog`.
    pub fn new(catalog: ProviderCatalog) -> Self {
        Self { catalog }
    }

    /// Returns the handler's catalog.
    pub fn catalog(&self) -> &ProviderCatalog {
        &self.catalog
    }

    /// Registers one provider per entry of `providers`.
    ///
    /// Each provider is built immediately and stored as a `ServiceProvider` under its
    /// unique ID. An unknown kind fails with `UnknownProvider` before anything is
    /// registered for that entry.
    pub fn register(&self, container: &Container, providers: &Mapping) -> Result<()> {
        for (unique_id, kind) in providers {
            let constructor = self.constructor(kind, unique_id)?;
            let provider_id = unique_id.clone();

            tracing::debug!("Registering provider '{}' as '{}'", kind, unique_id);
            container.register_concrete(
                unique_id,
                Concrete::new(Autoload::Eager, move |c| {
                    ServiceProvider::new(constructor(), &provider_id, c)
                }),
            )?;
        }
        Ok(())
    }

    fn constructor(&self, kind: &Value, unique_id: &str) -> Result<ProviderConstructor> {
        kind.as_str()
            .and_then(|kind| self.catalog.get(kind))
            .ok_or_else(|| FulcrumError::UnknownProvider {
                kind: kind.to_string(),
                unique_id: unique_id.to_string(),
            })
    }
}

impl Default for ProviderHandler {
    fn default() -> Self {
        Self::new(ProviderCatalog::builtin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::Host;

    fn providers(entries: &[(&str, &str)]) -> Mapping {
        entries
            .iter()
            .map(|(id, kind)| (id.to_string(), Value::from(*kind)))
            .collect()
    }

    #[test]
    fn test_builtin_kinds() {
        assert_eq!(
            ProviderCatalog::builtin().kinds(),
            vec!["asset", "post_type", "shortcode", "template", "widget", "metabox"]
        );
    }

    #[test]
    fn test_register_builds_providers() {
        let container = Container::default();
        let handler = ProviderHandler::default();
        handler
            .register(
                &container,
                &providers(&[("provider.asset", "asset"), ("provider.shortcode", "shortcode")]),
            )
            .unwrap();

        assert!(container.is_resolved("provider.asset"));
        let provider = container.get::<ServiceProvider>("provider.shortcode").unwrap();
        assert_eq!(provider.name(), "shortcode");
        assert_eq!(provider.provider_id(), "provider.shortcode");
    }

    #[test]
    fn test_unknown_kind() {
        let container = Container::default();
        let handler = ProviderHandler::default();
        let err = handler
            .register(&container, &providers(&[("provider.schema", "schema")]))
            .unwrap_err();

        assert!(matches!(
            err,
            FulcrumError::UnknownProvider { ref kind, ref unique_id }
                if kind == "schema" && unique_id == "provider.schema"
        ));
        assert!(!container.has("provider.schema"));
    }

    #[test]
    fn test_non_string_kind_is_unknown() {
        let container = Container::default();
        let mut entries = Mapping::new();
        entries.insert("provider.bad".to_string(), Value::from(3));

        let err = ProviderHandler::default()
            .register(&container, &entries)
            .unwrap_err();
        assert!(matches!(err, FulcrumError::UnknownProvider { .. }));
    }

    #[test]
    fn test_custom_kind() {
        struct Custom;

        impl Provider for Custom {
            fn name(&self) -> &str {
                "custom"
            }

            fn get_concrete(&self, _config: Mapping, _unique_id: &str, _defaults: Option<Value>) -> Result<Concrete> {
                Ok(Concrete::new(Autoload::Lazy, |_| Ok(())))
            }
        }

        let container = Container::new(Host::default());
        let handler = ProviderHandler::new(ProviderCatalog::new().with("custom", || Custom));
        handler
            .register(&container, &providers(&[("provider.custom", "custom")]))
            .unwrap();
        assert_eq!(
            container.get::<ServiceProvider>("provider.custom").unwrap().name(),
            "custom"
        );
    }
}
