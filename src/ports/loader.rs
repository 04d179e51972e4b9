// SPDX-License-Identifier: MIT OR Apache-2.0

//! Declaration loader trait definition.
//!
//! This module defines the `DeclarationLoader` trait, which turns a path-like reference
//! into a configuration tree. `Config` construction and provider defaults both go
//! through it whenever a declaration is not given inline.

use crate::domain::{Result, Value};

/// A trait for resolving external configuration declarations.
///
/// Loading is synchronous. Implementations must distinguish an empty reference
/// (`FulcrumError::EmptyDeclaration`) from one that cannot be resolved
/// (`UnreadableDeclaration` or `DeclarationNotFound`).
///
/// # Examples
///
/// ```rust
/// use fulcrum::domain::{FulcrumError, Result, Value};
/// use fulcrum::ports::DeclarationLoader;
///
/// struct Fixed;
///
/// impl DeclarationLoader for Fixed {
///     fn name(&self) -> &str {
///         "fixed"
///     }
///
///     fn load(&self, reference: &str) -> Result<Value> {
///         if reference.is_empty() {
///             return Err(FulcrumError::EmptyDeclaration);
///         }
///         Ok(Value::from([("loaded", reference)]))
///     }
/// }
///
/// assert!(Fixed.load("").is_err());
/// assert!(Fixed.load("defaults").is_ok());
/// ```
pub trait DeclarationLoader {
    /// Returns the name of this loader, used in logs and error messages.
    fn name(&self) -> &str;

    /// Loads the tree identified by `reference`.
    ///
    /// # Returns
    ///
    /// * `Ok(Value)` - The loaded tree
    /// * `Err(FulcrumError)` - The reference was empty, unknown, unreadable or malformed
    fn load(&self, reference: &str) -> Result<Value>;
}
