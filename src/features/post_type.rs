// SPDX-License-Identifier: MIT OR Apache-2.0

//! Custom post types.
//!
//! A post type's configuration carries the registration `args` plus a few
//! conveniences that are expanded before the type reaches the backend: generated
//! labels, a computed `supports` list, comma-separated `taxonomies`, and the
//! `add_feed` flag controlling whether the type appears in feeds.

use crate::domain::{Config, Declaration, FulcrumError, Mapping, Result, Value};
use crate::features::{self, Feature};
use crate::ports::hooks::events;
use crate::ports::{FeatureKind, LifecycleHooks, Provider};
use crate::service::provider::{instantiate_config, register_features_on};
use crate::service::{Autoload, Concrete, Container};
use std::any::Any;

/// Features a plain post supports out of the box.
const POST_SUPPORTS: [&str; 10] = [
    "title",
    "editor",
    "author",
    "thumbnail",
    "excerpt",
    "trackbacks",
    "custom-fields",
    "comments",
    "revisions",
    "post-formats",
];

const PAGE_ATTRIBUTES: &str = "page-attributes";

/// A custom post type.
#[derive(Debug, Clone)]
pub struct PostType {
    name: String,
    config: Config,
}

impl PostType {
    /// Creates a post type named `name`.
    ///
    /// `add_feed` is normalized to `false` unless it is exactly `true`.
    pub fn new(name: impl Into<String>, mut config: Config) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(FulcrumError::feature(
                "post_type",
                name,
                "For Custom Post Type Configuration, the Post type cannot be empty",
            ));
        }
        if config.all().is_empty() {
            let message = format!(
                "For Custom Post Type Configuration, the config for [{}] cannot be empty",
                name
            );
            return Err(FulcrumError::feature("post_type", name, message));
        }

        if config.get("add_feed") != Some(&Value::Bool(true)) {
            config.push("add_feed", false);
        }

        Ok(Self { name, config })
    }

    /// Returns the post type name.
    pub fn post_type(&self) -> &str {
        &self.name
    }

    /// Returns `true` if the post type is added to feeds.
    pub fn adds_to_feed(&self) -> bool {
        self.config.get_bool("add_feed")
    }

    /// Returns the registration arguments handed to the backend.
    pub fn args(&self) -> Mapping {
        let mut args = self.configured_args();

        if !args.get("labels").map_or(false, Value::is_truthy) {
            args.insert("labels".to_string(), Value::Mapping(self.labels()));
        }

        let supports = self.supports(&args);
        args.insert("supports".to_string(), Value::Sequence(supports));

        if let Some(Value::String(taxonomies)) = args.get("taxonomies") {
            let taxonomies = taxonomies
                .split(',')
                .map(str::trim)
                .filter(|taxonomy| !taxonomy.is_empty())
                .map(Value::from)
                .collect();
            args.insert("taxonomies".to_string(), Value::Sequence(taxonomies));
        }

        args
    }

    /// Returns the admin labels: generated defaults overlaid by `args.labels`.
    pub fn labels(&self) -> Mapping {
        let singular = self
            .config
            .get_str("singular_name")
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| title_case(&self.name.replace(['-', '_'], " ")));
        let plural = self
            .config
            .get_str("plural_name")
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}s", singular));

        let mut labels = Mapping::new();
        let mut label = |key: &str, text: String| {
            labels.insert(key.to_string(), Value::String(text));
        };
        label("name", plural.clone());
        label("singular_name", singular.clone());
        label("add_new", "Add New".to_string());
        label("add_new_item", format!("Add New {}", singular));
        label("edit_item", format!("Edit {}", singular));
        label("new_item", format!("New {}", singular));
        label("view_item", format!("View {}", singular));
        label("search_items", format!("Search {}", plural));
        label("not_found", format!("No {} found", singular.to_lowercase()));
        label(
            "not_found_in_trash",
            format!("No {} found in Trash", plural.to_lowercase()),
        );
        label("parent_item_colon", String::new());
        label("all_items", format!("All {}", plural));
        label("menu_name", plural);

        if let Some(configured) = self.config.get("args.labels").and_then(Value::as_mapping) {
            labels.extend(configured.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        labels
    }

    /// Returns the features the post type supports.
    ///
    /// An explicit `args.supports` list is used as given. Otherwise the plain post
    /// features are combined with `additional_supports` (a mapping of feature to
    /// on/off). Hierarchical types always gain `page-attributes`.
    pub fn supports(&self, args: &Mapping) -> Vec<Value> {
        let mut supports: Vec<Value> = match args.get("supports") {
            Some(Value::Sequence(list)) => list.clone(),
            Some(Value::Mapping(map)) => map.values().cloned().collect(),
            Some(Value::Bool(false)) | Some(Value::Null) => Vec::new(),
            Some(scalar @ Value::String(_)) => vec![scalar.clone()],
            Some(_) | None => {
                let mut enabled: Mapping = POST_SUPPORTS
                    .iter()
                    .map(|feature| (feature.to_string(), Value::Bool(true)))
                    .collect();
                if let Some(additional) = self
                    .config
                    .get("additional_supports")
                    .and_then(Value::as_mapping)
                {
                    enabled.extend(additional.iter().map(|(k, v)| (k.clone(), v.clone())));
                }
                enabled
                    .into_iter()
                    .filter(|(_, on)| on.is_truthy())
                    .map(|(feature, _)| Value::String(feature))
                    .collect()
            }
        };

        let is_hierarchical = args.get("hierarchical").map_or(false, Value::is_truthy);
        if is_hierarchical && !supports.iter().any(|s| s.as_str() == Some(PAGE_ATTRIBUTES)) {
            supports.push(Value::from(PAGE_ATTRIBUTES));
        }
        supports
    }

    /// Applies `columns_filter` to the admin list columns.
    ///
    /// A truthy `cb` entry becomes the bulk-select checkbox.
    pub fn columns(&self, mut columns: Mapping) -> Mapping {
        if let Some(filter) = self.config.get("columns_filter").and_then(Value::as_mapping) {
            for (column, value) in filter {
                let value = if column == "cb" && value.is_truthy() {
                    Value::from("<input type=\"checkbox\" />")
                } else {
                    value.clone()
                };
                columns.insert(column.clone(), value);
            }
        }
        columns
    }

    /// Adds the configured `sortable_columns` to `sortable`.
    pub fn sortable_columns(&self, mut sortable: Mapping) -> Mapping {
        let keys: Vec<String> = match self.config.get("sortable_columns") {
            Some(Value::Mapping(map)) => map.keys().cloned().collect(),
            Some(Value::Sequence(list)) => list.iter().filter_map(Value::to_key_string).collect(),
            _ => Vec::new(),
        };
        for key in keys {
            sortable.insert(key.clone(), Value::String(key));
        }
        sortable
    }

    /// Adds this post type to, or removes it from, a feed query's `post_type` list.
    ///
    /// Queries that are not feeds, or that do not name post types, are returned as-is.
    pub fn filter_feed_query(&self, mut query: Mapping) -> Mapping {
        if !query.contains_key("feed") {
            return query;
        }

        let mut post_types: Vec<Value> = match query.get("post_type") {
            Some(Value::Sequence(list)) if !list.is_empty() => list.clone(),
            Some(value) if value.is_truthy() && !value.is_array() => vec![value.clone()],
            _ => return query,
        };

        let index = post_types
            .iter()
            .position(|post_type| post_type.as_str() == Some(self.name.as_str()));
        match (index, self.adds_to_feed()) {
            (None, true) => post_types.push(Value::from(self.name.as_str())),
            (Some(index), false) => {
                post_types.remove(index);
            }
            _ => {}
        }

        query.insert("post_type".to_string(), Value::Sequence(post_types));
        query
    }

    fn configured_args(&self) -> Mapping {
        self.config
            .get("args")
            .and_then(Value::as_mapping)
            .cloned()
            .unwrap_or_default()
    }
}

impl Feature for PostType {
    fn kind(&self) -> FeatureKind {
        FeatureKind::PostType
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn config(&self) -> &Config {
        &self.config
    }

    fn register(&self, container: &Container) -> Result<()> {
        container
            .backend()
            .register(FeatureKind::PostType, &self.name, &Config::from_mapping(self.args()))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Provider for custom post types.
///
/// Registration template:
///
/// ```yaml
/// autoload: false
/// post_type_name: ''   # required
/// config: {}           # or a declaration reference
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PostTypeProvider;

impl PostTypeProvider {
    /// The defaults every post type configuration is layered over.
    pub fn post_type_defaults() -> Mapping {
        ["args", "columns_filter", "columns_data"]
            .iter()
            .map(|key| (key.to_string(), Value::mapping()))
            .collect()
    }
}

impl Provider for PostTypeProvider {
    fn name(&self) -> &str {
        "post_type"
    }

    fn skip_queue(&self) -> bool {
        true
    }

    fn default_structure(&self) -> Mapping {
        let mut structure = Mapping::new();
        structure.insert("autoload".to_string(), Value::Bool(false));
        structure.insert("post_type_name".to_string(), Value::from(""));
        structure.insert("config".to_string(), Value::mapping());
        structure
    }

    fn defaults(&self) -> Option<Declaration> {
        Some(Declaration::from(Self::post_type_defaults()))
    }

    fn init_events(&self, provider_id: &str, hooks: &dyn LifecycleHooks) {
        register_features_on(hooks, events::INIT, provider_id);
    }

    fn get_concrete(&self, config: Mapping, _unique_id: &str, defaults: Option<Value>) -> Result<Concrete> {
        let autoload = Autoload::from_value(config.get("autoload").unwrap_or(&Value::Null));
        let name = config
            .get("post_type_name")
            .and_then(Value::to_key_string)
            .unwrap_or_default();

        Ok(features::concrete(autoload, move |container| {
            let post_type_config = instantiate_config(container.loader(), &config, defaults.as_ref())?;
            PostType::new(name.clone(), post_type_config)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::RecordingBackend;
    use crate::service::{Host, ServiceProvider};
    use std::rc::Rc;

    fn config(yaml: &str) -> Config {
        Config::new(serde_yaml::from_str::<Value>(yaml).unwrap()).unwrap()
    }

    fn book(yaml: &str) -> PostType {
        PostType::new("book", config(yaml)).unwrap()
    }

    #[test]
    fn test_new_validates() {
        let err = PostType::new("", config("args: {}\n")).unwrap_err();
        assert!(matches!(err, FulcrumError::FeatureError { ref feature, .. } if feature == "post_type"));

        let err = PostType::new("book", Config::default()).unwrap_err();
        assert!(matches!(err, FulcrumError::FeatureError { ref unique_id, .. } if unique_id == "book"));
    }

    #[test]
    fn test_add_feed_only_when_exactly_true() {
        assert!(book("add_feed: true\n").adds_to_feed());
        assert!(!book("add_feed: 'yes'\n").adds_to_feed());
        assert!(!book("add_feed: 1\n").adds_to_feed());
        assert!(!book("args: {}\n").adds_to_feed());
    }

    #[test]
    fn test_taxonomies_string_is_split() {
        let args = book("args:\n  taxonomies: 'genre, author'\n").args();
        assert_eq!(
            args.get("taxonomies"),
            Some(&Value::Sequence(vec![Value::from("genre"), Value::from("author")]))
        );

        let args = book("args:\n  taxonomies: [genre]\n").args();
        assert_eq!(
            args.get("taxonomies"),
            Some(&Value::Sequence(vec![Value::from("genre")]))
        );
    }

    #[test]
    fn test_generated_labels() {
        let labels = book("singular_name: Book\nplural_name: Books\nargs: {}\n").labels();
        assert_eq!(labels.get("name"), Some(&Value::from("Books")));
        assert_eq!(labels.get("add_new_item"), Some(&Value::from("Add New Book")));
        assert_eq!(labels.get("not_found"), Some(&Value::from("No book found")));
        assert_eq!(labels.get("not_found_in_trash"), Some(&Value::from("No books found in Trash")));

        let labels = PostType::new("book-review", config("args: {}\n")).unwrap().labels();
        assert_eq!(labels.get("singular_name"), Some(&Value::from("Book Review")));
        assert_eq!(labels.get("menu_name"), Some(&Value::from("Book Reviews")));
    }

    #[test]
    fn test_configured_labels_win() {
        let post_type = book("singular_name: Book\nargs:\n  labels:\n    menu_name: Library\n");
        assert_eq!(post_type.labels().get("menu_name"), Some(&Value::from("Library")));
        assert_eq!(post_type.labels().get("edit_item"), Some(&Value::from("Edit Book")));

        // Configured labels are passed through untouched.
        let args = post_type.args();
        let labels = args.get("labels").and_then(Value::as_mapping).unwrap();
        assert_eq!(labels.len(), 1);
    }

    #[test]
    fn test_supports() {
        let args = book("args: {}\nadditional_supports:\n  comments: false\n  page-attributes: true\n").args();
        let supports = args.get("supports").and_then(Value::as_sequence).unwrap();
        assert!(supports.contains(&Value::from("title")));
        assert!(supports.contains(&Value::from("page-attributes")));
        assert!(!supports.contains(&Value::from("comments")));

        let args = book("args:\n  hierarchical: true\n  supports: [title]\n").args();
        assert_eq!(
            args.get("supports"),
            Some(&Value::Sequence(vec![Value::from("title"), Value::from("page-attributes")]))
        );
    }

    #[test]
    fn test_columns() {
        let post_type = book("columns_filter:\n  cb: true\n  title: Title\n  genre: Genre\nsortable_columns:\n  genre: genre\n");
        let columns = post_type.columns(Mapping::new());
        assert_eq!(columns.get("cb"), Some(&Value::from("<input type=\"checkbox\" />")));
        assert_eq!(columns.get("genre"), Some(&Value::from("Genre")));

        let sortable = post_type.sortable_columns(Mapping::new());
        assert_eq!(sortable.get("genre"), Some(&Value::from("genre")));
    }

    #[test]
    fn test_feed_query() {
        let query = |yaml: &str| serde_yaml::from_str::<Mapping>(yaml).unwrap();

        let in_feed = book("add_feed: true\n");
        let filtered = in_feed.filter_feed_query(query("feed: rss2\npost_type: [post]\n"));
        assert_eq!(
            filtered.get("post_type"),
            Some(&Value::Sequence(vec![Value::from("post"), Value::from("book")]))
        );

        let out_of_feed = book("args: {}\n");
        let filtered = out_of_feed.filter_feed_query(query("feed: rss2\npost_type: [post, book]\n"));
        assert_eq!(
            filtered.get("post_type"),
            Some(&Value::Sequence(vec![Value::from("post")]))
        );

        let untouched = query("s: books\n");
        assert_eq!(in_feed.filter_feed_query(untouched.clone()), untouched);
    }

    #[test]
    fn test_provider_registers_lazily_and_on_init() {
        let backend = Rc::new(RecordingBackend::new());
        let container = Container::new(Host::new(
            Rc::new(crate::adapters::EventHooks::new()),
            backend.clone(),
            Rc::new(crate::adapters::MemoryLoader::new()),
        ));
        container
            .register_concrete(
                "provider.post_type",
                Concrete::new(Autoload::Eager, |c| {
                    ServiceProvider::new(Box::new(PostTypeProvider), "provider.post_type", c)
                }),
            )
            .unwrap();
        let provider = container.get::<ServiceProvider>("provider.post_type").unwrap();

        let registration: Mapping = serde_yaml::from_str(
            "post_type_name: book\nconfig:\n  singular_name: Book\n  args:\n    public: true\n",
        )
        .unwrap();
        provider.register(&container, registration, "cpt.book").unwrap();
        assert!(!container.is_resolved("cpt.book"));

        container.do_action(events::INIT).unwrap();
        assert!(container.is_resolved("cpt.book"));

        let registered = backend.config(FeatureKind::PostType, "book").unwrap();
        assert!(registered.get_bool("public"));
        assert_eq!(registered.get_str("labels.singular_name"), Some("Book"));
    }

    #[test]
    fn test_missing_name_is_rejected() {
        let container = Container::default();
        let provider = ServiceProvider::new(Box::new(PostTypeProvider), "provider.post_type", &container).unwrap();
        let registration: Mapping = serde_yaml::from_str("config:\n  args: {}\n").unwrap();

        let err = provider.register(&container, registration, "cpt.book").unwrap_err();
        assert!(matches!(err, FulcrumError::MissingConfigKey { ref key, .. } if key == "post_type_name"));
    }
}
