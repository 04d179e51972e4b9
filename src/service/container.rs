// SPDX-License-Identifier: MIT OR Apache-2.0

//! The service container.
//!
//! The container maps identifiers to realized values or to factories that build them,
//! and applies a per-entry autoload policy at registration time. It is also the
//! context object of the whole pipeline: factories, lifecycle callbacks and providers
//! all receive it by reference, and through it reach the host's ports.

use crate::adapters::{EventHooks, RecordingBackend, YamlFileLoader};
use crate::domain::{FulcrumError, Result, Value};
use crate::ports::{DeclarationLoader, FeatureBackend, LifecycleHooks};
use indexmap::IndexMap;
use once_cell::unsync::OnceCell;
use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A value held by the container.
pub type Service = Rc<dyn Any>;

/// A deferred constructor for a container value.
pub type Factory = Rc<dyn Fn(&Container) -> Result<Service>>;

/// A post-construction callback run on a freshly built value.
pub type AutoloadHook = Rc<dyn Fn(&Service) -> Result<()>>;

/// When a registered factory runs.
#[derive(Clone)]
pub enum Autoload {
    /// Build at registration time and hand the value back to the caller.
    Eager,
    /// Build on first lookup.
    Lazy,
    /// Build at registration time and pass the value to the callback instead of
    /// returning it.
    Hook(AutoloadHook),
}

impl Autoload {
    /// Interprets a configuration `autoload` entry: truthy values are eager.
    pub fn from_value(value: &Value) -> Self {
        if value.is_truthy() {
            Autoload::Eager
        } else {
            Autoload::Lazy
        }
    }
}

impl fmt::Debug for Autoload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Autoload::Eager => f.write_str("Eager"),
            Autoload::Lazy => f.write_str("Lazy"),
            Autoload::Hook(_) => f.write_str("Hook(..)"),
        }
    }
}

/// A registration record: a factory and the policy that decides when it runs.
#[derive(Clone)]
pub struct Concrete {
    /// The autoload policy.
    pub autoload: Autoload,
    /// The factory building the value.
    pub factory: Factory,
}

impl Concrete {
    /// Creates a record from a typed factory.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fulcrum::service::{Autoload, Concrete, Container};
    ///
    /// # fn main() -> fulcrum::domain::Result<()> {
    /// let container = Container::default();
    /// let built = container.register_concrete("answer", Concrete::new(Autoload::Eager, |_| Ok(42u32)))?;
    /// assert!(built.is_some());
    /// assert_eq!(*container.get::<u32>("answer")?, 42);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new<T, F>(autoload: Autoload, factory: F) -> Self
    where
        T: Any,
        F: Fn(&Container) -> Result<T> + 'static,
    {
        Self {
            autoload,
            factory: Rc::new(move |container| Ok(Rc::new(factory(container)?) as Service)),
        }
    }

    /// Creates a record from an untyped factory.
    pub fn from_factory(autoload: Autoload, factory: Factory) -> Self {
        Self { autoload, factory }
    }
}

impl fmt::Debug for Concrete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Concrete")
            .field("autoload", &self.autoload)
            .finish_non_exhaustive()
    }
}

/// The ports supplied by the embedding application.
#[derive(Clone)]
pub struct Host {
    hooks: Rc<dyn LifecycleHooks>,
    backend: Rc<dyn FeatureBackend>,
    loader: Rc<dyn DeclarationLoader>,
    is_admin: bool,
}

impl Host {
    /// Creates a host from its ports. The admin flag starts off.
    pub fn new(
        hooks: Rc<dyn LifecycleHooks>,
        backend: Rc<dyn FeatureBackend>,
        loader: Rc<dyn DeclarationLoader>,
    ) -> Self {
        Self {
            hooks,
            backend,
            loader,
            is_admin: false,
        }
    }

    /// Sets whether the current request is an administrative one.
    pub fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }
}

impl Default for Host {
    /// In-process adapters with declarations resolved from the working directory.
    fn default() -> Self {
        Self::new(
            Rc::new(EventHooks::new()),
            Rc::new(RecordingBackend::new()),
            Rc::new(YamlFileLoader::new(".")),
        )
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("loader", &self.loader.name())
            .field("is_admin", &self.is_admin)
            .finish_non_exhaustive()
    }
}

struct Binding {
    factory: Option<Factory>,
    value: OnceCell<Service>,
}

impl Binding {
    fn deferred(factory: Factory) -> Self {
        Self {
            factory: Some(factory),
            value: OnceCell::new(),
        }
    }

    fn realized(value: Service) -> Self {
        Self {
            factory: None,
            value: OnceCell::with_value(value),
        }
    }
}

/// Identifier → value registry with memoized lazy resolution.
///
/// Identifier collisions overwrite the previous entry. Lookups of unknown
/// identifiers fail with `BindingNotFound`.
///
/// # Examples
///
/// ```rust
/// use fulcrum::domain::Value;
/// use fulcrum::service::{Autoload, Concrete, Container};
///
/// # fn main() -> fulcrum::domain::Result<()> {
/// let container = Container::default();
/// container.set_parameter("plugin.version", "1.0.0");
/// container.register_concrete(
///     "greeting",
///     Concrete::new(Autoload::Lazy, |c| {
///         let version = c.parameter("plugin.version")?;
///         Ok(format!("hello from {}", version))
///     }),
/// )?;
///
/// assert!(!container.is_resolved("greeting"));
/// assert_eq!(*container.get::<String>("greeting")?, "hello from 1.0.0");
/// assert!(container.is_resolved("greeting"));
/// # Ok(())
/// # }
/// ```
pub struct Container {
    bindings: RefCell<IndexMap<String, Rc<Binding>>>,
    resolving: RefCell<Vec<String>>,
    host: Host,
}

impl Container {
    /// Creates an empty container bound to `host`.
    pub fn new(host: Host) -> Self {
        Self {
            bindings: RefCell::new(IndexMap::new()),
            resolving: RefCell::new(Vec::new()),
            host,
        }
    }

    /// Registers a record under `unique_id`, applying its autoload policy.
    ///
    /// Returns the built value for `Autoload::Eager` and `None` otherwise. Factory and
    /// hook errors propagate; the binding stays registered (and unresolved) in that
    /// case.
    pub fn register_concrete(&self, unique_id: &str, concrete: Concrete) -> Result<Option<Service>> {
        let Concrete { autoload, factory } = concrete;
        self.bind(unique_id, Binding::deferred(factory));

        match autoload {
            Autoload::Eager => self.resolve(unique_id).map(Some),
            Autoload::Lazy => Ok(None),
            Autoload::Hook(hook) => {
                let service = self.resolve(unique_id)?;
                hook(&service)?;
                Ok(None)
            }
        }
    }

    /// Stores a realized configuration value under `unique_id`.
    pub fn set_parameter(&self, unique_id: &str, value: impl Into<Value>) {
        self.bind(unique_id, Binding::realized(Rc::new(value.into())));
    }

    /// Returns a clone of the configuration value stored under `unique_id`.
    pub fn parameter(&self, unique_id: &str) -> Result<Value> {
        Ok(self.get::<Value>(unique_id)?.as_ref().clone())
    }

    /// Returns the value stored under `unique_id`, building it on first lookup.
    pub fn resolve(&self, unique_id: &str) -> Result<Service> {
        let binding = self.binding(unique_id)?;
        if let Some(service) = binding.value.get() {
            return Ok(Rc::clone(service));
        }

        let factory = binding
            .factory
            .clone()
            .ok_or_else(|| FulcrumError::BindingNotFound {
                unique_id: unique_id.to_string(),
            })?;

        self.enter(unique_id)?;
        tracing::debug!("Building container entry '{}'", unique_id);
        let built = factory(self);
        self.leave(unique_id);

        let service = built?;
        Ok(Rc::clone(binding.value.get_or_init(|| service)))
    }

    /// Returns the value stored under `unique_id` as a `T`.
    pub fn get<T: Any>(&self, unique_id: &str) -> Result<Rc<T>> {
        self.resolve(unique_id)?
            .downcast::<T>()
            .map_err(|_| FulcrumError::TypeMismatch {
                unique_id: unique_id.to_string(),
                expected: std::any::type_name::<T>().to_string(),
            })
    }

    /// Returns `true` if an entry exists under `unique_id`.
    pub fn has(&self, unique_id: &str) -> bool {
        self.bindings.borrow().contains_key(unique_id)
    }

    /// Returns `true` if the entry under `unique_id` holds a built value.
    pub fn is_resolved(&self, unique_id: &str) -> bool {
        self.bindings
            .borrow()
            .get(unique_id)
            .map_or(false, |binding| binding.value.get().is_some())
    }

    /// Returns every registered identifier in registration order.
    pub fn ids(&self) -> Vec<String> {
        self.bindings.borrow().keys().cloned().collect()
    }

    /// Returns the host's lifecycle scheduler.
    pub fn hooks(&self) -> &dyn LifecycleHooks {
        self.host.hooks.as_ref()
    }

    /// Returns the host's feature backend.
    pub fn backend(&self) -> &dyn FeatureBackend {
        self.host.backend.as_ref()
    }

    /// Returns the host's declaration loader.
    pub fn loader(&self) -> &dyn DeclarationLoader {
        self.host.loader.as_ref()
    }

    /// Returns `true` when serving an administrative request.
    pub fn is_admin(&self) -> bool {
        self.host.is_admin
    }

    /// Fires `event` on the host scheduler with this container as context.
    pub fn do_action(&self, event: &str) -> Result<()> {
        self.host.hooks.do_action(event, self)
    }

    fn bind(&self, unique_id: &str, binding: Binding) {
        let previous = self
            .bindings
            .borrow_mut()
            .insert(unique_id.to_string(), Rc::new(binding));
        if previous.is_some() {
            tracing::debug!("Overwriting container entry '{}'", unique_id);
        }
    }

    fn binding(&self, unique_id: &str) -> Result<Rc<Binding>> {
        self.bindings
            .borrow()
            .get(unique_id)
            .cloned()
            .ok_or_else(|| FulcrumError::BindingNotFound {
                unique_id: unique_id.to_string(),
            })
    }

    fn enter(&self, unique_id: &str) -> Result<()> {
        let mut resolving = self.resolving.borrow_mut();
        if resolving.iter().any(|id| id == unique_id) {
            return Err(FulcrumError::CircularBinding {
                unique_id: unique_id.to_string(),
            });
        }
        resolving.push(unique_id.to_string());
        Ok(())
    }

    fn leave(&self, unique_id: &str) {
        let mut resolving = self.resolving.borrow_mut();
        if let Some(pos) = resolving.iter().rposition(|id| id == unique_id) {
            resolving.remove(pos);
        }
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new(Host::default())
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("ids", &self.ids())
            .field("host", &self.host)
            .finish()
    }
}
