// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML file declaration loader.
//!
//! This module provides a loader that resolves declaration references to YAML files
//! below a base directory.

use crate::domain::{FulcrumError, Result, Value};
use crate::ports::DeclarationLoader;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum allowed file size for YAML declaration files (10MB)
/// This prevents denial of service attacks via extremely large files
const MAX_YAML_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// YAML parser producing configuration trees.
///
/// # Examples
///
/// ```rust
/// use fulcrum::adapters::YamlParser;
///
/// let parser = YamlParser::new();
/// let yaml_content = "args:\n  public: true\n  menu_position: 5";
/// let result = parser.parse(yaml_content).unwrap();
/// let args = result.as_mapping().unwrap()["args"].as_mapping().unwrap();
/// assert_eq!(args["menu_position"].as_i64(), Some(5));
/// ```
#[derive(Debug, Clone)]
pub struct YamlParser;

impl YamlParser {
    /// Creates a new YAML parser.
    pub fn new() -> Self {
        YamlParser
    }

    /// Parses YAML text into a tree.
    ///
    /// An empty document parses to `Value::Null`.
    pub fn parse(&self, content: &str) -> Result<Value> {
        if content.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_yaml::from_str(content).map_err(|e| FulcrumError::ParseError {
            message: format!("Failed to parse YAML: {}", e),
            source: Some(Box::new(e)),
        })
    }

    /// Returns the file extensions tried for references given without one.
    pub fn supported_extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}

impl Default for YamlParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Declaration loader for YAML files.
///
/// References are paths relative to the loader's base directory (absolute paths are
/// used as-is). A reference without an extension is also tried with `.yaml` and
/// `.yml`. Every loaded document must have a mapping at its root.
///
/// # Examples
///
/// ```rust,no_run
/// use fulcrum::adapters::YamlFileLoader;
/// use fulcrum::ports::DeclarationLoader;
///
/// // Resolve references below a plugin's config directory
/// let loader = YamlFileLoader::new("/srv/plugin/config");
/// let tree = loader.load("post-type/book.yaml").unwrap();
///
/// // Or below the OS configuration directory
/// let loader = YamlFileLoader::from_default_location("myplugin", "com.example").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct YamlFileLoader {
    /// Directory references are resolved against
    base_dir: PathBuf,
    /// YAML parser
    parser: YamlParser,
}

impl YamlFileLoader {
    /// Creates a loader resolving references against `base_dir`.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            parser: YamlParser::new(),
        }
    }

    /// Creates a loader rooted at the OS-appropriate configuration directory.
    ///
    /// This method uses the `directories` crate to determine the appropriate
    /// configuration directory for the current operating system.
    ///
    /// # Arguments
    ///
    /// * `app_name` - The application name (e.g., "myplugin")
    /// * `qualifier` - The organization/qualifier (e.g., "com.example")
    pub fn from_default_location(app_name: &str, qualifier: &str) -> Result<Self> {
        let proj_dirs =
            ProjectDirs::from(qualifier, "", app_name).ok_or_else(|| FulcrumError::ParseError {
                message: "Failed to determine project directories".to_string(),
                source: None,
            })?;

        Ok(Self::new(proj_dirs.config_dir()))
    }

    /// Returns the directory references are resolved against.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Maps a reference to the file that will be read.
    fn locate(&self, reference: &str) -> PathBuf {
        let path = self.base_dir.join(reference);
        if path.exists() || path.extension().is_some() {
            return path;
        }

        self.parser
            .supported_extensions()
            .iter()
            .map(|ext| path.with_extension(ext))
            .find(|candidate| candidate.exists())
            .unwrap_or(path)
    }

    fn read(&self, reference: &str, path: &Path) -> Result<String> {
        let unreadable = |e: std::io::Error| FulcrumError::UnreadableDeclaration {
            reference: reference.to_string(),
            source: e,
        };

        // Check file size before reading to prevent DoS via large files
        let metadata = fs::metadata(path).map_err(unreadable)?;
        if metadata.len() > MAX_YAML_FILE_SIZE {
            return Err(FulcrumError::DeclarationTooLarge {
                reference: reference.to_string(),
                size: metadata.len(),
                max: MAX_YAML_FILE_SIZE,
            });
        }

        fs::read_to_string(path).map_err(unreadable)
    }
}

impl DeclarationLoader for YamlFileLoader {
    fn name(&self) -> &str {
        "yaml-file"
    }

    fn load(&self, reference: &str) -> Result<Value> {
        if reference.trim().is_empty() {
            return Err(FulcrumError::EmptyDeclaration);
        }

        let path = self.locate(reference);
        let content = self.read(reference, &path)?;

        match self.parser.parse(&content)? {
            tree @ Value::Mapping(_) => Ok(tree),
            other => Err(FulcrumError::InvalidRoot {
                found: other.type_name().to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_yaml_parser_nested() {
        let parser = YamlParser::new();
        let yaml = r#"
args:
  labels:
    name: Books
  public: true
"#;
        let result = parser.parse(yaml).unwrap();
        let args = result.as_mapping().unwrap()["args"].as_mapping().unwrap();

        assert_eq!(args["public"], Value::Bool(true));
        assert_eq!(
            args["labels"].as_mapping().unwrap()["name"].as_str(),
            Some("Books")
        );
    }

    #[test]
    fn test_yaml_parser_preserves_order() {
        let parser = YamlParser::new();
        let result = parser.parse("zeta: 1\nalpha: 2\nmid: 3\n").unwrap();
        let keys: Vec<&String> = result.as_mapping().unwrap().keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_yaml_parser_mixed_types() {
        let parser = YamlParser::new();
        let yaml = r#"
string_value: hello
number_value: 42
float_value: 1.5
bool_value: true
null_value: null
list_value: [a, b]
"#;
        let result = parser.parse(yaml).unwrap();
        let map = result.as_mapping().unwrap();

        assert_eq!(map["string_value"], Value::from("hello"));
        assert_eq!(map["number_value"], Value::Int(42));
        assert_eq!(map["float_value"], Value::Float(1.5));
        assert_eq!(map["bool_value"], Value::Bool(true));
        assert_eq!(map["null_value"], Value::Null);
        assert_eq!(
            map["list_value"],
            Value::Sequence(vec![Value::from("a"), Value::from("b")])
        );
    }

    #[test]
    fn test_yaml_parser_scalar_keys() {
        let parser = YamlParser::new();
        let result = parser.parse("columns:\n  1: first\n  2: second\ntrue: x\n").unwrap();
        let map = result.as_mapping().unwrap();

        let columns = map["columns"].as_mapping().unwrap();
        assert_eq!(columns.keys().collect::<Vec<_>>(), vec!["1", "2"]);
        assert_eq!(columns["2"], Value::from("second"));
        assert_eq!(map["1"], Value::from("x"));
    }

    #[test]
    fn test_yaml_parser_invalid() {
        let parser = YamlParser::new();
        let yaml = "invalid: yaml: content:";
        let result = parser.parse(yaml);

        assert!(matches!(result, Err(FulcrumError::ParseError { .. })));
    }

    #[test]
    fn test_yaml_parser_supported_extensions() {
        let parser = YamlParser::default();
        let extensions = parser.supported_extensions();

        assert_eq!(extensions.len(), 2);
        assert!(extensions.contains(&"yaml"));
        assert!(extensions.contains(&"yml"));
    }

    #[test]
    fn test_loader_absolute_path() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "handle: main-js\nversion: '1.0'").unwrap();

        let loader = YamlFileLoader::new("/does/not/matter");
        let tree = loader.load(temp_file.path().to_str().unwrap()).unwrap();

        assert_eq!(loader.name(), "yaml-file");
        assert_eq!(tree.as_mapping().unwrap()["handle"].as_str(), Some("main-js"));
    }

    #[test]
    fn test_loader_relative_to_base_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("defaults.yaml"), "in_footer: true\n").unwrap();

        let loader = YamlFileLoader::new(dir.path());
        assert_eq!(loader.base_dir(), dir.path());

        let tree = loader.load("defaults.yaml").unwrap();
        assert_eq!(tree.as_mapping().unwrap()["in_footer"], Value::Bool(true));
    }

    #[test]
    fn test_loader_tries_extensions() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("shortcode.yml"), "shortcode: qa\n").unwrap();

        let loader = YamlFileLoader::new(dir.path());
        let tree = loader.load("shortcode").unwrap();
        assert_eq!(tree.as_mapping().unwrap()["shortcode"].as_str(), Some("qa"));
    }

    #[test]
    fn test_loader_scalar_keys() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("book.yaml"),
            "columns_filter:\n  1: title\n  2: author\n",
        )
        .unwrap();

        let tree = YamlFileLoader::new(dir.path()).load("book").unwrap();
        let columns = tree.as_mapping().unwrap()["columns_filter"].as_mapping().unwrap();
        assert_eq!(columns["1"], Value::from("title"));
        assert_eq!(columns["2"], Value::from("author"));
    }

    #[test]
    fn test_loader_empty_reference() {
        let loader = YamlFileLoader::new(".");
        assert!(matches!(loader.load(""), Err(FulcrumError::EmptyDeclaration)));
        assert!(matches!(loader.load("  "), Err(FulcrumError::EmptyDeclaration)));
    }

    #[test]
    fn test_loader_missing_file() {
        let dir = TempDir::new().unwrap();
        let loader = YamlFileLoader::new(dir.path());
        let err = loader.load("nonexistent.yaml").unwrap_err();

        assert!(matches!(
            err,
            FulcrumError::UnreadableDeclaration { ref reference, .. } if reference == "nonexistent.yaml"
        ));
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_loader_rejects_non_mapping_root() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("list.yaml"), "- a\n- b\n").unwrap();
        fs::write(dir.path().join("empty.yaml"), "").unwrap();

        let loader = YamlFileLoader::new(dir.path());
        assert!(matches!(
            loader.load("list.yaml"),
            Err(FulcrumError::InvalidRoot { ref found }) if found == "sequence"
        ));
        assert!(matches!(
            loader.load("empty.yaml"),
            Err(FulcrumError::InvalidRoot { ref found }) if found == "null"
        ));
    }
}
