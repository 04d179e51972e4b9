// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the fulcrum crate.
//!
//! Every failure in the registration pipeline is fatal and synchronous: errors are
//! raised where a misconfiguration is detected and propagate to the host unchanged.
//! All errors use `thiserror` for proper error handling and conversion.

use thiserror::Error;

/// The main error type for configuration and registration operations.
///
/// The variants fall into three families:
///
/// - **Configuration errors**: a declaration could not be loaded, a tree has the wrong
///   shape, or a provider was handed an incomplete feature configuration.
/// - **Resolution errors**: a container lookup could not produce a value.
/// - **Feature errors**: a feature object rejected its configuration or the host
///   backend rejected the feature.
///
/// It is marked as `#[non_exhaustive]` to allow for future additions without breaking
/// backwards compatibility.
///
/// # Examples
///
/// ```
/// use fulcrum::domain::errors::FulcrumError;
///
/// fn lookup() -> Result<(), FulcrumError> {
///     Err(FulcrumError::BindingNotFound {
///         unique_id: "provider.asset".to_string(),
///     })
/// }
///
/// assert!(lookup().is_err());
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FulcrumError {
    /// A declaration reference was empty.
    #[error("A configuration declaration reference must not be empty")]
    EmptyDeclaration,

    /// A declaration reference could not be read.
    #[error("The configuration declaration '{reference}' is not readable")]
    UnreadableDeclaration {
        /// The reference that could not be read
        reference: String,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A loader has no declaration registered under the reference.
    #[error("The configuration declaration '{reference}' was not found by loader '{loader}'")]
    DeclarationNotFound {
        /// The reference that was requested
        reference: String,
        /// The name of the loader that was asked
        loader: String,
    },

    /// A declaration exceeded the maximum size a loader accepts.
    #[error("The configuration declaration '{reference}' is too large: {size} bytes (max {max} bytes)")]
    DeclarationTooLarge {
        /// The reference that was rejected
        reference: String,
        /// The size of the declaration in bytes
        size: u64,
        /// The maximum accepted size in bytes
        max: u64,
    },

    /// Failed to parse a declaration or to convert a tree into a typed structure.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A configuration tree root was not a mapping.
    #[error("A configuration tree must be a mapping, found {found}")]
    InvalidRoot {
        /// The type name of the value that was found instead
        found: String,
    },

    /// A provider was asked to register a feature without a unique ID.
    #[error("For the service provider [{provider}], the container unique ID cannot be empty")]
    EmptyUniqueId {
        /// The provider that rejected the registration
        provider: String,
    },

    /// A feature configuration is missing a key required by the provider's template.
    #[error("For the service provider for unique ID [{unique_id}], the {key} cannot be empty [provider {provider}]")]
    MissingConfigKey {
        /// The unique ID being registered
        unique_id: String,
        /// The missing or blank key
        key: String,
        /// The provider that rejected the registration
        provider: String,
    },

    /// A provider kind has no constructor in the catalog.
    #[error("The provider kind [{kind}] was not found and could not be registered as [{unique_id}]")]
    UnknownProvider {
        /// The unknown kind
        kind: String,
        /// The unique ID the provider was to be registered under
        unique_id: String,
    },

    /// No binding exists for the requested identifier.
    #[error("No binding is registered for [{unique_id}]")]
    BindingNotFound {
        /// The identifier that was looked up
        unique_id: String,
    },

    /// Resolving a binding required resolving the same binding again.
    #[error("Circular resolution detected while building [{unique_id}]")]
    CircularBinding {
        /// The identifier that was re-entered
        unique_id: String,
    },

    /// A resolved value did not have the requested type.
    #[error("The binding [{unique_id}] does not hold a value of type {expected}")]
    TypeMismatch {
        /// The identifier that was looked up
        unique_id: String,
        /// The requested type name
        expected: String,
    },

    /// A feature rejected its configuration or could not be handed to the backend.
    #[error("The {feature} [{unique_id}] is misconfigured: {message}")]
    FeatureError {
        /// The identifier of the offending feature
        unique_id: String,
        /// The feature family, e.g. "asset"
        feature: String,
        /// What went wrong
        message: String,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl FulcrumError {
    /// Creates a `FeatureError` for the given feature family and identifier.
    pub fn feature(
        feature: impl Into<String>,
        unique_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        FulcrumError::FeatureError {
            unique_id: unique_id.into(),
            feature: feature.into(),
            message: message.into(),
        }
    }

    /// Returns `true` for errors raised while loading or validating configuration.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            FulcrumError::EmptyDeclaration
                | FulcrumError::UnreadableDeclaration { .. }
                | FulcrumError::DeclarationNotFound { .. }
                | FulcrumError::DeclarationTooLarge { .. }
                | FulcrumError::ParseError { .. }
                | FulcrumError::InvalidRoot { .. }
                | FulcrumError::EmptyUniqueId { .. }
                | FulcrumError::MissingConfigKey { .. }
                | FulcrumError::UnknownProvider { .. }
        )
    }

    /// Returns `true` for errors raised while resolving a container binding.
    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            FulcrumError::BindingNotFound { .. }
                | FulcrumError::CircularBinding { .. }
                | FulcrumError::TypeMismatch { .. }
        )
    }
}

/// A specialized Result type for fulcrum operations.
pub type Result<T> = std::result::Result<T, FulcrumError>;
