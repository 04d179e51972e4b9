// SPDX-License-Identifier: MIT OR Apache-2.0

//! Feature provider trait definition.
//!
//! A provider specializes the container's generic registration for one feature
//! family. It declares the shape a feature configuration must have, supplies the
//! family's defaults, and builds the factory that turns a validated configuration into
//! a live feature. Validation, queueing and forwarding are common to every family and
//! live in `service::ServiceProvider`.

use crate::domain::{Declaration, Mapping, Result, Value};
use crate::ports::LifecycleHooks;
use crate::service::{Concrete, Container};

/// Returns the template every provider starts from: `autoload` and `config`.
pub fn base_structure() -> Mapping {
    let mut structure = Mapping::new();
    structure.insert("autoload".to_string(), Value::Bool(false));
    structure.insert("config".to_string(), Value::from(""));
    structure
}

/// The per-family half of the provider pipeline.
///
/// # Examples
///
/// ```rust
/// use fulcrum::domain::{Mapping, Result, Value};
/// use fulcrum::ports::Provider;
/// use fulcrum::service::{Autoload, Concrete};
///
/// struct Greeting;
///
/// impl Provider for Greeting {
///     fn name(&self) -> &str {
///         "greeting"
///     }
///
///     fn get_concrete(
///         &self,
///         config: Mapping,
///         _unique_id: &str,
///         _defaults: Option<Value>,
///     ) -> Result<Concrete> {
///         let autoload = Autoload::from_value(&config["autoload"]);
///         let text = config["config"].to_string();
///         Ok(Concrete::new(autoload, move |_| Ok(text.clone())))
///     }
/// }
/// ```
pub trait Provider {
    /// Returns the provider's name, used in logs and error messages.
    fn name(&self) -> &str;

    /// Returns `true` if registrations go straight to the container instead of the
    /// provider's queue.
    fn skip_queue(&self) -> bool {
        false
    }

    /// Returns the template merged under every incoming feature configuration.
    ///
    /// Every key of the template must be present and non-blank after the merge; blank
    /// template values therefore mark required keys.
    fn default_structure(&self) -> Mapping {
        base_structure()
    }

    /// Returns the family's defaults, deep-merged under each feature's own `config`.
    fn defaults(&self) -> Option<Declaration> {
        None
    }

    /// Returns `false` to silently ignore registrations in the current host context.
    fn accepts(&self, _container: &Container) -> bool {
        true
    }

    /// Attaches the provider's lifecycle callbacks.
    ///
    /// `provider_id` is the container identifier the provider itself is registered
    /// under, so callbacks can look it up again when they fire.
    fn init_events(&self, _provider_id: &str, _hooks: &dyn LifecycleHooks) {}

    /// Builds the registration record for one validated feature configuration.
    ///
    /// `config` is the merged, validated configuration; `defaults` is the resolved
    /// family defaults, if the provider declares any.
    fn get_concrete(
        &self,
        config: Mapping,
        unique_id: &str,
        defaults: Option<Value>,
    ) -> Result<Concrete>;
}
