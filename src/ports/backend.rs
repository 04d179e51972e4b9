// SPDX-License-Identifier: MIT OR Apache-2.0

//! Feature backend trait definition.
//!
//! The backend is the host platform's registry of live features: asset pipeline,
//! shortcode table, post type registry, metabox screens, widgets and templates. The pipeline never looks
//! inside it; built features only call its synchronous entry points.

use crate::domain::{Config, Result, Value};
use std::fmt;

/// The families of features a backend accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    /// A script asset.
    Script,
    /// A stylesheet asset.
    Style,
    /// A shortcode handler.
    Shortcode,
    /// A custom post type.
    PostType,
    /// An edit screen metabox.
    Metabox,
    /// A set of plugin-supplied view templates.
    Template,
    /// A sidebar widget.
    Widget,
}

impl FeatureKind {
    /// Returns the kind's name as used in logs and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureKind::Script => "script",
            FeatureKind::Style => "style",
            FeatureKind::Shortcode => "shortcode",
            FeatureKind::PostType => "post_type",
            FeatureKind::Metabox => "metabox",
            FeatureKind::Template => "template",
            FeatureKind::Widget => "widget",
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The host platform's feature registry.
///
/// # Examples
///
/// ```rust
/// use fulcrum::domain::{Config, Result};
/// use fulcrum::ports::{FeatureBackend, FeatureKind};
///
/// struct Discard;
///
/// impl FeatureBackend for Discard {
///     fn register(&self, _kind: FeatureKind, _name: &str, _config: &Config) -> Result<()> {
///         Ok(())
///     }
///
///     fn deregister(&self, _kind: FeatureKind, _name: &str) -> Result<()> {
///         Ok(())
///     }
///
///     fn is_registered(&self, _kind: FeatureKind, _name: &str) -> bool {
///         false
///     }
/// }
/// ```
pub trait FeatureBackend {
    /// Registers the feature `name` of `kind`, described by its built configuration.
    fn register(&self, kind: FeatureKind, name: &str, config: &Config) -> Result<()>;

    /// Removes the feature `name` of `kind`.
    fn deregister(&self, kind: FeatureKind, name: &str) -> Result<()>;

    /// Returns `true` if the feature `name` of `kind` is currently registered.
    fn is_registered(&self, kind: FeatureKind, name: &str) -> bool;

    /// Returns `true` if the page being served is one of `pages`.
    ///
    /// Used by conditionally loaded assets. Hosts without a notion of pages keep the
    /// default, which treats every page as a match.
    fn is_current_page(&self, _pages: &Value) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_kind_names() {
        assert_eq!(FeatureKind::Script.to_string(), "script");
        assert_eq!(FeatureKind::PostType.as_str(), "post_type");
        assert_eq!(format!("{}", FeatureKind::Metabox), "metabox");
        assert_eq!(FeatureKind::Widget.as_str(), "widget");
    }
}
