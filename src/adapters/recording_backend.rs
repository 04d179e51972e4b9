// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory feature backend.

use crate::domain::{Config, Result, Value};
use crate::ports::{FeatureBackend, FeatureKind};
use indexmap::IndexMap;
use std::cell::RefCell;

/// A `FeatureBackend` that records what it is handed.
///
/// Registrations are kept in the order they arrive. The "current page" used for
/// conditionally loaded assets can be set explicitly; without one no page matches.
///
/// # Examples
///
/// ```rust
/// use fulcrum::adapters::RecordingBackend;
/// use fulcrum::domain::Config;
/// use fulcrum::ports::{FeatureBackend, FeatureKind};
///
/// # fn main() -> fulcrum::domain::Result<()> {
/// let backend = RecordingBackend::new();
/// backend.register(FeatureKind::Script, "main-js", &Config::default())?;
/// assert!(backend.is_registered(FeatureKind::Script, "main-js"));
/// assert_eq!(backend.names(FeatureKind::Script), vec!["main-js".to_string()]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct RecordingBackend {
    registered: RefCell<IndexMap<(FeatureKind, String), Config>>,
    current_page: RefCell<Option<String>>,
}

impl RecordingBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the slug of the page being served.
    pub fn set_current_page(&self, page: Option<&str>) {
        *self.current_page.borrow_mut() = page.map(str::to_string);
    }

    /// Returns the names registered for `kind`, in registration order.
    pub fn names(&self, kind: FeatureKind) -> Vec<String> {
        self.registered
            .borrow()
            .keys()
            .filter(|(k, _)| *k == kind)
            .map(|(_, name)| name.clone())
            .collect()
    }

    /// Returns the configuration a feature was registered with.
    pub fn config(&self, kind: FeatureKind, name: &str) -> Option<Config> {
        self.registered
            .borrow()
            .get(&(kind, name.to_string()))
            .cloned()
    }

    /// Returns the total number of registered features.
    pub fn len(&self) -> usize {
        self.registered.borrow().len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.registered.borrow().is_empty()
    }
}

impl FeatureBackend for RecordingBackend {
    fn register(&self, kind: FeatureKind, name: &str, config: &Config) -> Result<()> {
        tracing::debug!("Registering {} '{}'", kind, name);
        self.registered
            .borrow_mut()
            .insert((kind, name.to_string()), config.clone());
        Ok(())
    }

    fn deregister(&self, kind: FeatureKind, name: &str) -> Result<()> {
        tracing::debug!("Deregistering {} '{}'", kind, name);
        self.registered
            .borrow_mut()
            .shift_remove(&(kind, name.to_string()));
        Ok(())
    }

    fn is_registered(&self, kind: FeatureKind, name: &str) -> bool {
        self.registered
            .borrow()
            .contains_key(&(kind, name.to_string()))
    }

    /// Matches the current page against a slug or a list of slugs.
    ///
    /// An empty list matches any page.
    fn is_current_page(&self, pages: &Value) -> bool {
        let current = self.current_page.borrow();
        let Some(current) = current.as_deref() else {
            return false;
        };

        match pages {
            Value::Sequence(list) if list.is_empty() => true,
            Value::Sequence(list) => list
                .iter()
                .filter_map(Value::to_key_string)
                .any(|page| page == current),
            Value::Mapping(map) if map.is_empty() => true,
            Value::Mapping(map) => map
                .values()
                .filter_map(Value::to_key_string)
                .any(|page| page == current),
            scalar => scalar.to_key_string().as_deref() == Some(current),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_deregister() {
        let backend = RecordingBackend::new();
        assert!(backend.is_empty());

        backend
            .register(FeatureKind::Style, "theme", &Config::default())
            .unwrap();
        backend
            .register(FeatureKind::Script, "theme", &Config::default())
            .unwrap();
        assert_eq!(backend.len(), 2);

        backend.deregister(FeatureKind::Style, "theme").unwrap();
        assert!(!backend.is_registered(FeatureKind::Style, "theme"));
        assert!(backend.is_registered(FeatureKind::Script, "theme"));
    }

    #[test]
    fn test_keeps_config() {
        let backend = RecordingBackend::new();
        let config = Config::new(Value::from([("version", "1.0")])).unwrap();
        backend
            .register(FeatureKind::Script, "main", &config)
            .unwrap();
        assert_eq!(backend.config(FeatureKind::Script, "main"), Some(config));
        assert_eq!(backend.config(FeatureKind::Script, "other"), None);
    }

    #[test]
    fn test_current_page_matching() {
        let backend = RecordingBackend::new();
        let pages = Value::Sequence(vec![Value::from("about"), Value::from("contact")]);
        assert!(!backend.is_current_page(&pages));

        backend.set_current_page(Some("contact"));
        assert!(backend.is_current_page(&pages));
        assert!(backend.is_current_page(&Value::from("contact")));
        assert!(backend.is_current_page(&Value::Sequence(vec![])));
        assert!(!backend.is_current_page(&Value::from("home")));
    }
}
