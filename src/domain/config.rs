// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration tree wrapper.
//!
//! `Config` holds one module's settings and layers them over that module's defaults:
//! the caller's values win at every nesting level, and defaults the caller did not
//! mention survive untouched.

use crate::domain::arr;
use crate::domain::declaration::Declaration;
use crate::domain::errors::{FulcrumError, Result};
use crate::domain::value::{Mapping, Value};
use crate::ports::DeclarationLoader;
use serde::de::DeserializeOwned;

/// A configuration tree with dot-notation access.
///
/// # Examples
///
/// ```
/// use fulcrum::domain::{Config, Value};
///
/// # fn main() -> fulcrum::domain::Result<()> {
/// let defaults = Value::from([("a", Value::from(1)), ("b", Value::from([("x", 1), ("y", 2)]))]);
/// let source = Value::from([("b", Value::from([("x", 9)]))]);
///
/// let config = Config::with_defaults(source, defaults)?;
/// assert_eq!(config.get("a"), Some(&Value::from(1)));
/// assert_eq!(config.get("b.x"), Some(&Value::from(9)));
/// assert_eq!(config.get("b.y"), Some(&Value::from(2)));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Config {
    tree: Mapping,
}

impl Config {
    /// Creates a configuration from a literal tree.
    ///
    /// The root must be a mapping; anything else is rejected with `InvalidRoot`.
    pub fn new(tree: impl Into<Value>) -> Result<Self> {
        Ok(Self {
            tree: into_mapping(tree.into())?,
        })
    }

    /// Creates a configuration directly from a mapping.
    pub fn from_mapping(tree: Mapping) -> Self {
        Self { tree }
    }

    /// Creates a configuration whose `source` values override `defaults` recursively.
    pub fn with_defaults(source: impl Into<Value>, defaults: impl Into<Value>) -> Result<Self> {
        let mut tree = into_mapping(defaults.into())?;
        arr::replace_recursive(&mut tree, &into_mapping(source.into())?);
        Ok(Self { tree })
    }

    /// Creates a configuration from declarations, resolving references through `loader`.
    ///
    /// A reference that is empty, unknown or unreadable fails the construction.
    pub fn load(
        source: Declaration,
        defaults: Option<Declaration>,
        loader: &dyn DeclarationLoader,
    ) -> Result<Self> {
        let source = source.resolve(loader)?;
        match defaults {
            Some(defaults) => Self::with_defaults(source, defaults.resolve(loader)?),
            None => Self::new(source),
        }
    }

    /// Returns the full tree.
    pub fn all(&self) -> &Mapping {
        &self.tree
    }

    /// Consumes the configuration and returns its tree.
    pub fn into_inner(self) -> Mapping {
        self.tree
    }

    /// Returns `true` if `path` resolves to a value.
    pub fn has(&self, path: &str) -> bool {
        arr::has(&self.tree, path)
    }

    /// Returns the value at `path`.
    pub fn get(&self, path: &str) -> Option<&Value> {
        arr::get(&self.tree, path)
    }

    /// Returns a clone of the value at `path`, or `default` when it does not resolve.
    pub fn get_or(&self, path: &str, default: impl Into<Value>) -> Value {
        arr::get_or(&self.tree, path, default)
    }

    /// Returns the string at `path`, if the value there is a string.
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    /// Returns the truthiness of the value at `path`; unresolved paths are `false`.
    pub fn get_bool(&self, path: &str) -> bool {
        self.get(path).map_or(false, Value::is_truthy)
    }

    /// Returns `true` if the value at `path` is a collection (non-empty if required).
    pub fn is_array(&self, path: &str, require_non_empty: bool) -> bool {
        arr::is_array(&self.tree, path, require_non_empty)
    }

    /// Assigns `value` to the top-level `key`.
    ///
    /// The key is used verbatim: `push("a.b", v)` creates a key named `"a.b"`. Use
    /// [`Config::set`] for dot-aware assignment.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.tree.insert(key.into(), value.into());
    }

    /// Assigns `value` at the dot path `path`, creating intermediate mappings.
    ///
    /// A key pushed verbatim as `path` is overwritten in place, so `get(path)` always
    /// sees the new value.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) {
        arr::set(&mut self.tree, path, value.into());
    }

    /// Merges `tree` into this configuration; incoming values win at every level.
    pub fn merge(&mut self, tree: &Mapping) {
        arr::replace_recursive(&mut self.tree, tree);
    }

    /// Converts the tree into a typed structure.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        let value = serde_yaml::to_value(&self.tree).map_err(|e| FulcrumError::ParseError {
            message: format!("Failed to encode configuration tree: {}", e),
            source: Some(Box::new(e)),
        })?;
        serde_yaml::from_value(value).map_err(|e| FulcrumError::ParseError {
            message: format!(
                "Failed to convert configuration into {}: {}",
                std::any::type_name::<T>(),
                e
            ),
            source: Some(Box::new(e)),
        })
    }
}

impl From<Mapping> for Config {
    fn from(tree: Mapping) -> Self {
        Self::from_mapping(tree)
    }
}

fn into_mapping(value: Value) -> Result<Mapping> {
    match value {
        Value::Mapping(map) => Ok(map),
        other => Err(FulcrumError::InvalidRoot {
            found: other.type_name().to_string(),
        }),
    }
}
