// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory declaration loader.

use crate::domain::{FulcrumError, Result, Value};
use crate::ports::DeclarationLoader;
use indexmap::IndexMap;

/// Declaration loader serving named trees held in memory.
///
/// Useful for embedding declarations in a binary and for tests.
///
/// # Examples
///
/// ```rust
/// use fulcrum::adapters::MemoryLoader;
/// use fulcrum::domain::Value;
/// use fulcrum::ports::DeclarationLoader;
///
/// let loader = MemoryLoader::new().with_declaration("asset.defaults", Value::from([("in_footer", true)]));
/// assert!(loader.load("asset.defaults").is_ok());
/// assert!(loader.load("missing").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    declarations: IndexMap<String, Value>,
}

impl MemoryLoader {
    /// Creates an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a declaration, builder style.
    pub fn with_declaration(mut self, reference: impl Into<String>, tree: impl Into<Value>) -> Self {
        self.insert(reference, tree);
        self
    }

    /// Adds or replaces a declaration.
    pub fn insert(&mut self, reference: impl Into<String>, tree: impl Into<Value>) {
        self.declarations.insert(reference.into(), tree.into());
    }
}

impl DeclarationLoader for MemoryLoader {
    fn name(&self) -> &str {
        "memory"
    }

    fn load(&self, reference: &str) -> Result<Value> {
        if reference.is_empty() {
            return Err(FulcrumError::EmptyDeclaration);
        }

        self.declarations
            .get(reference)
            .cloned()
            .ok_or_else(|| FulcrumError::DeclarationNotFound {
                reference: reference.to_string(),
                loader: self.name().to_string(),
            })
    }
}
