// SPDX-License-Identifier: MIT OR Apache-2.0

//! The common half of the provider pipeline.
//!
//! `ServiceProvider` wraps one `Provider` and runs the steps every feature family
//! shares: merge an incoming registration over the provider's template, validate it,
//! obtain a registration record, and either forward it to the container or queue it
//! until a later lifecycle event flushes the queue.

use crate::domain::{Config, Declaration, FulcrumError, Mapping, Result, Value};
use crate::features;
use crate::ports::hooks::DEFAULT_PRIORITY;
use crate::ports::{DeclarationLoader, LifecycleHooks, Provider};
use crate::service::{Concrete, Container, Service};
use indexmap::{IndexMap, IndexSet};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// The outcome of [`ServiceProvider::register`].
#[derive(Debug)]
pub enum Registration {
    /// The record went straight to the container; holds the value if it was built.
    Forwarded(Option<Service>),
    /// The record waits in the provider's queue.
    Queued,
    /// The provider does not accept registrations in this host context.
    Skipped,
}

/// A provider instance bound to a container.
pub struct ServiceProvider {
    provider: Box<dyn Provider>,
    provider_id: String,
    defaults: Option<Value>,
    queued: RefCell<IndexMap<String, Concrete>>,
    unique_ids: RefCell<IndexSet<String>>,
}

impl ServiceProvider {
    /// Binds `provider` to `container` under the identifier `provider_id`.
    ///
    /// The provider's defaults are resolved now, so an unreadable defaults
    /// declaration fails here. Lifecycle callbacks are attached only if the provider
    /// accepts the current host context.
    pub fn new(provider: Box<dyn Provider>, provider_id: &str, container: &Container) -> Result<Self> {
        let defaults = provider
            .defaults()
            .map(|declaration| declaration.resolve(container.loader()))
            .transpose()?;

        if provider.accepts(container) {
            provider.init_events(provider_id, container.hooks());
        }

        tracing::debug!("Initialized {} provider as '{}'", provider.name(), provider_id);
        Ok(Self {
            provider,
            provider_id: provider_id.to_string(),
            defaults,
            queued: RefCell::new(IndexMap::new()),
            unique_ids: RefCell::new(IndexSet::new()),
        })
    }

    /// Returns the wrapped provider's name.
    pub fn name(&self) -> &str {
        self.provider.name()
    }

    /// Returns the container identifier this provider is registered under.
    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    /// Returns the resolved family defaults.
    pub fn defaults(&self) -> Option<&Value> {
        self.defaults.as_ref()
    }

    /// Validates a feature configuration and forwards or queues its record.
    ///
    /// `config` is shallow-merged over the provider's template; every template key
    /// must then be present and non-blank. Nothing reaches the container or the queue
    /// when validation fails.
    pub fn register(&self, container: &Container, config: Mapping, unique_id: &str) -> Result<Registration> {
        if !self.provider.accepts(container) {
            tracing::debug!(
                "The {} provider ignores '{}' in this context",
                self.name(),
                unique_id
            );
            return Ok(Registration::Skipped);
        }

        let config = self.validate(config, unique_id)?;
        let concrete = self
            .provider
            .get_concrete(config, unique_id, self.defaults.clone())?;

        if self.provider.skip_queue() {
            return self.forward(container, unique_id, concrete).map(Registration::Forwarded);
        }

        tracing::debug!("Queued '{}' on the {} provider", unique_id, self.name());
        self.queued.borrow_mut().insert(unique_id.to_string(), concrete);
        Ok(Registration::Queued)
    }

    /// Forwards every queued record to the container, in registration order.
    ///
    /// The queue is drained: each record is forwarded exactly once. Returns the number
    /// of records forwarded.
    pub fn register_queue(&self, container: &Container) -> Result<usize> {
        let queued = std::mem::take(&mut *self.queued.borrow_mut());
        let count = queued.len();
        if count > 0 {
            tracing::debug!("Flushing {} queued records from the {} provider", count, self.name());
        }

        for (unique_id, concrete) in queued {
            self.forward(container, &unique_id, concrete)?;
        }
        Ok(count)
    }

    /// Registers every forwarded feature with the host backend, once per identifier.
    pub fn register_features(&self, container: &Container) -> Result<()> {
        let unique_ids = self.unique_ids();
        for unique_id in unique_ids {
            features::resolve(container, &unique_id)?.register(container)?;
        }
        Ok(())
    }

    /// Builds a feature's configuration from a validated registration.
    pub fn instantiate_config(&self, container: &Container, config: &Mapping) -> Result<Config> {
        instantiate_config(container.loader(), config, self.defaults.as_ref())
    }

    /// Returns the identifiers forwarded to the container so far, in first-forward
    /// order. A re-registered identifier appears once.
    pub fn unique_ids(&self) -> Vec<String> {
        self.unique_ids.borrow().iter().cloned().collect()
    }

    /// Returns the identifiers waiting in the queue.
    pub fn queued_ids(&self) -> Vec<String> {
        self.queued.borrow().keys().cloned().collect()
    }

    /// Returns `true` if records are waiting in the queue.
    pub fn has_queued(&self) -> bool {
        !self.queued.borrow().is_empty()
    }

    fn validate(&self, config: Mapping, unique_id: &str) -> Result<Mapping> {
        if unique_id.is_empty() {
            return Err(FulcrumError::EmptyUniqueId {
                provider: self.name().to_string(),
            });
        }

        let template = self.provider.default_structure();
        let mut merged = template.clone();
        merged.extend(config);

        for key in template.keys() {
            if merged.get(key).map_or(true, Value::is_blank) {
                tracing::warn!(
                    "Rejected '{}' on the {} provider: '{}' is missing",
                    unique_id,
                    self.name(),
                    key
                );
                return Err(FulcrumError::MissingConfigKey {
                    unique_id: unique_id.to_string(),
                    key: key.clone(),
                    provider: self.name().to_string(),
                });
            }
        }
        Ok(merged)
    }

    fn forward(&self, container: &Container, unique_id: &str, concrete: Concrete) -> Result<Option<Service>> {
        self.unique_ids.borrow_mut().insert(unique_id.to_string());
        container.register_concrete(unique_id, concrete)
    }
}

impl fmt::Debug for ServiceProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceProvider")
            .field("name", &self.name())
            .field("provider_id", &self.provider_id)
            .field("queued", &self.queued_ids())
            .field("unique_ids", &self.unique_ids())
            .finish()
    }
}

/// Builds a feature `Config` from the `config` entry of a validated registration.
///
/// The entry is either a literal tree or a declaration reference resolved through
/// `loader`; `defaults`, when given, sit underneath it.
pub fn instantiate_config(
    loader: &dyn DeclarationLoader,
    config: &Mapping,
    defaults: Option<&Value>,
) -> Result<Config> {
    let source = Declaration::from_value(config.get("config").cloned().unwrap_or_default());
    Config::load(source, defaults.cloned().map(Declaration::Tree), loader)
}

/// Attaches a callback registering the provider's features when `event` fires.
pub fn register_features_on(hooks: &dyn LifecycleHooks, event: &str, provider_id: &str) {
    let provider_id = provider_id.to_string();
    hooks.add_action(
        event,
        DEFAULT_PRIORITY,
        Rc::new(move |container: &Container| {
            container
                .get::<ServiceProvider>(&provider_id)?
                .register_features(container)
        }),
    );
}

/// Attaches a callback flushing the provider's queue, then registering its features,
/// when `event` fires.
pub fn flush_queue_on(hooks: &dyn LifecycleHooks, event: &str, provider_id: &str) {
    let provider_id = provider_id.to_string();
    hooks.add_action(
        event,
        DEFAULT_PRIORITY,
        Rc::new(move |container: &Container| {
            let provider = container.get::<ServiceProvider>(&provider_id)?;
            provider.register_queue(container)?;
            provider.register_features(container)
        }),
    );
}
