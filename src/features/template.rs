// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin-supplied templates.
//!
//! A `Template` tells the host which of its view files a plugin can stand in for:
//! single, archive, category, taxonomy and tag views of the plugin's post types, and
//! page templates chosen per page. Every lookup falls back to the file the host had
//! already picked when the plugin's folder holds no readable replacement.

use crate::domain::{Config, Declaration, FulcrumError, Mapping, Result, Value};
use crate::features::{self, Feature};
use crate::ports::hooks::events;
use crate::ports::{FeatureKind, LifecycleHooks, Provider};
use crate::service::provider::{instantiate_config, register_features_on};
use crate::service::{Autoload, Concrete};
use std::any::Any;
use std::path::{Path, PathBuf};

/// The kind of view the host is rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemplateView {
    /// A single post.
    Single,
    /// A post type archive.
    Archive,
    /// A category archive.
    Category,
    /// A custom taxonomy archive.
    Taxonomy,
    /// A tag archive.
    Tag,
}

impl TemplateView {
    fn flag(&self) -> &'static str {
        match self {
            TemplateView::Single => "use_single",
            TemplateView::Archive => "use_archive",
            TemplateView::Category => "use_category",
            TemplateView::Taxonomy => "use_tax",
            TemplateView::Tag => "use_tag",
        }
    }
}

/// A plugin's template overrides.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    config: Config,
}

impl Template {
    /// Creates a template set, checking for a `template_folder_path`.
    pub fn new(name: impl Into<String>, config: Config) -> Result<Self> {
        let name = name.into();
        if config
            .get_str("template_folder_path")
            .map_or(true, str::is_empty)
        {
            return Err(FulcrumError::feature(
                "template",
                name,
                "A template requires a template_folder_path",
            ));
        }
        Ok(Self { name, config })
    }

    /// Returns the folder replacement files are looked up in.
    pub fn folder(&self) -> &Path {
        Path::new(self.config.get_str("template_folder_path").unwrap_or_default())
    }

    /// Returns the post types the overrides apply to.
    ///
    /// `post_type` is either a single name or a list of names.
    pub fn post_types(&self) -> Vec<String> {
        match self.config.get("post_type") {
            Some(Value::Sequence(list)) => list
                .iter()
                .filter_map(Value::to_key_string)
                .filter(|name| !name.is_empty())
                .collect(),
            Some(Value::String(name)) if !name.is_empty() => vec![name.clone()],
            _ => Vec::new(),
        }
    }

    /// Returns `true` if the overrides apply to `post_type`.
    pub fn serves_post_type(&self, post_type: &str) -> bool {
        self.post_types().iter().any(|name| name == post_type)
    }

    /// Returns `true` if overrides are enabled for `view`.
    pub fn uses(&self, view: TemplateView) -> bool {
        self.config.get_bool(view.flag())
    }

    /// Returns the page templates offered in the page attributes box, file → label.
    pub fn page_templates(&self) -> Mapping {
        self.config
            .get("templates")
            .and_then(Value::as_mapping)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns the path of `file_name` in the template folder, if it is a readable file.
    pub fn locate(&self, file_name: &str) -> Option<PathBuf> {
        let path = self.folder().join(file_name);
        path.is_file().then_some(path)
    }

    /// Picks the file for a `view` of a `post_type` post.
    ///
    /// `current` is the host's pick. A host fallback to `index.php` is kept as is;
    /// otherwise `{slug}-{post_type}.php` from the template folder replaces it, where
    /// `slug` is the stem of `current`.
    pub fn include_template(&self, current: &Path, post_type: &str, view: TemplateView) -> PathBuf {
        let is_index = current.file_name().map_or(true, |name| name == "index.php");
        if is_index || !self.serves_post_type(post_type) || !self.uses(view) {
            return current.to_path_buf();
        }

        let slug = current
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default();
        self.locate(&format!("{}-{}.php", slug, post_type))
            .unwrap_or_else(|| current.to_path_buf())
    }

    /// Picks the archive file for `post_type`: `archive-{post_type}.php`.
    pub fn archive_template(&self, current: &Path, post_type: &str) -> PathBuf {
        if !self.serves_post_type(post_type) {
            return current.to_path_buf();
        }
        self.locate(&format!("archive-{}.php", post_type))
            .unwrap_or_else(|| current.to_path_buf())
    }

    /// Picks the archive file for the configured taxonomy: `taxonomy-{tax}.php`.
    pub fn taxonomy_template(&self, current: &Path, taxonomy: &str) -> PathBuf {
        let configured = self.config.get_str("tax").unwrap_or_default();
        if !self.uses(TemplateView::Taxonomy) || configured.is_empty() || configured != taxonomy {
            return current.to_path_buf();
        }
        self.locate(&format!("taxonomy-{}.php", taxonomy))
            .unwrap_or_else(|| current.to_path_buf())
    }

    /// Picks the page template `assigned` to a page, when page templates are enabled.
    pub fn page_template(&self, current: &Path, assigned: &str) -> PathBuf {
        if !self.config.get_bool("use_page_templates") || assigned.is_empty() {
            return current.to_path_buf();
        }
        self.locate(assigned).unwrap_or_else(|| current.to_path_buf())
    }
}

impl Feature for Template {
    fn kind(&self) -> FeatureKind {
        FeatureKind::Template
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn config(&self) -> &Config {
        &self.config
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Provider for template overrides.
///
/// Registration template:
///
/// ```yaml
/// autoload: true
/// config: ''   # required: a tree or a declaration reference
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateProvider;

impl TemplateProvider {
    /// The defaults every template configuration is layered over.
    pub fn template_defaults() -> Mapping {
        let mut defaults = Mapping::new();
        defaults.insert("template_folder_path".to_string(), Value::from(""));
        defaults.insert("post_type".to_string(), Value::from(""));
        for flag in ["use_single", "use_archive", "use_category"] {
            defaults.insert(flag.to_string(), Value::Bool(false));
        }
        defaults.insert("tax".to_string(), Value::from(""));
        for flag in ["use_tax", "use_tag", "use_page_templates"] {
            defaults.insert(flag.to_string(), Value::Bool(false));
        }
        defaults.insert("templates".to_string(), Value::mapping());
        defaults
    }
}

impl Provider for TemplateProvider {
    fn name(&self) -> &str {
        "template"
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

    fn defaults(&self) -> Option<Declaration> {
        Some(Declaration::from(Self::template_defaults()))
    }

    fn init_events(&self, provider_id: &str, hooks: &dyn LifecycleHooks) {
        register_features_on(hooks, events::INIT, provider_id);
    }

    fn get_concrete(&self, config: Mapping, unique_id: &str, defaults: Option<Value>) -> Result<Concrete> {
        let autoload = Autoload::from_value(config.get("autoload").unwrap_or(&Value::Null));
        let name = unique_id.to_string();

        Ok(features::concrete(autoload, move |container| {
            let template_config = instantiate_config(container.loader(), &config, defaults.as_ref())?;
            Template::new(name.clone(), template_config)
        }))
    }
}
