// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration declarations.
//!
//! A declaration is either a tree given inline or a reference to a tree held somewhere
//! else (usually a YAML file) that a `DeclarationLoader` knows how to fetch.

use crate::domain::errors::Result;
use crate::domain::value::{Mapping, Value};
use crate::ports::DeclarationLoader;

/// An inline tree or a reference to an external one.
#[derive(Clone, Debug, PartialEq)]
pub enum Declaration {
    /// A literal tree.
    Tree(Value),
    /// A reference resolved through a loader, e.g. `"config/asset.yaml"`.
    Reference(String),
}

impl Declaration {
    /// Interprets a configuration value as a declaration.
    ///
    /// Strings are references; everything else is taken literally.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(reference) => Declaration::Reference(reference),
            tree => Declaration::Tree(tree),
        }
    }

    /// Resolves the declaration into a tree.
    ///
    /// Literal trees are returned as-is; references are handed to `loader`, whose
    /// errors propagate unchanged.
    pub fn resolve(&self, loader: &dyn DeclarationLoader) -> Result<Value> {
        match self {
            Declaration::Tree(value) => Ok(value.clone()),
            Declaration::Reference(reference) => {
                tracing::debug!(
                    "Loading declaration '{}' through loader '{}'",
                    reference,
                    loader.name()
                );
                loader.load(reference)
            }
        }
    }
}

impl From<Value> for Declaration {
    fn from(value: Value) -> Self {
        Declaration::Tree(value)
    }
}

impl From<Mapping> for Declaration {
    fn from(map: Mapping) -> Self {
        Declaration::Tree(Value::Mapping(map))
    }
}

impl From<&str> for Declaration {
    fn from(reference: &str) -> Self {
        Declaration::Reference(reference.to_string())
    }
}

impl From<String> for Declaration {
    fn from(reference: String) -> Self {
        Declaration::Reference(reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryLoader;
    use crate::domain::FulcrumError;

    #[test]
    fn test_from_value() {
        assert_eq!(
            Declaration::from_value(Value::from("config/foo.yaml")),
            Declaration::Reference("config/foo.yaml".to_string())
        );
        assert_eq!(
            Declaration::from_value(Value::mapping()),
            Declaration::Tree(Value::mapping())
        );
    }

    #[test]
    fn test_resolve_tree_skips_loader() {
        let loader = MemoryLoader::new();
        let tree = Value::from([("a", 1)]);
        assert_eq!(Declaration::from(tree.clone()).resolve(&loader).unwrap(), tree);
    }

    #[test]
    fn test_resolve_reference() {
        let loader = MemoryLoader::new().with_declaration("cpt-foo", Value::from([("a", 1)]));
        let value = Declaration::from("cpt-foo").resolve(&loader).unwrap();
        assert_eq!(value, Value::from([("a", 1)]));

        let err = Declaration::from("missing").resolve(&loader).unwrap_err();
        assert!(matches!(err, FulcrumError::DeclarationNotFound { .. }));
    }
}
