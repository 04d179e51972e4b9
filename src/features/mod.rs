// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in feature families.
//!
//! Each family pairs a `Provider` (validation template, defaults, lifecycle wiring)
//! with a feature type that hands itself to the host's `FeatureBackend`. Features are
//! stored in the container as `Rc<dyn Feature>` so providers and addons can register
//! them without knowing their concrete type.

pub mod asset;
pub mod metabox;
pub mod post_type;
pub mod shortcode;
pub mod template;
pub mod widget;

pub use asset::{Asset, AssetProvider};
pub use metabox::{Metabox, MetaboxProvider};
pub use post_type::{PostType, PostTypeProvider};
pub use shortcode::{Shortcode, ShortcodeProvider};
pub use template::{Template, TemplateProvider, TemplateView};
pub use widget::{Widget, WidgetProvider};

use crate::domain::{Config, Result};
use crate::ports::FeatureKind;
use crate::service::{Autoload, Concrete, Container};
use std::any::Any;
use std::rc::Rc;

/// The capability set shared by every feature.
pub trait Feature: Any {
    /// Returns the feature family.
    fn kind(&self) -> FeatureKind;

    /// Returns the name the feature is registered under in the backend.
    fn name(&self) -> &str;

    /// Returns the feature's configuration.
    fn config(&self) -> &Config;

    /// Hands the feature to the host backend.
    fn register(&self, container: &Container) -> Result<()> {
        container.backend().register(self.kind(), self.name(), self.config())
    }

    /// Removes the feature from the host backend.
    fn deregister(&self, container: &Container) -> Result<()> {
        container.backend().deregister(self.kind(), self.name())
    }

    /// Returns `true` if the backend currently holds the feature.
    fn is_registered(&self, container: &Container) -> bool {
        container.backend().is_registered(self.kind(), self.name())
    }

    /// Returns `self` for downcasting to the concrete feature type.
    fn as_any(&self) -> &dyn Any;
}

/// Wraps a feature constructor into a registration record.
pub fn concrete<T, F>(autoload: Autoload, build: F) -> Concrete
where
    T: Feature,
    F: Fn(&Container) -> Result<T> + 'static,
{
    Concrete::new(autoload, move |container| {
        Ok(Rc::new(build(container)?) as Rc<dyn Feature>)
    })
}

/// Looks up the feature stored under `unique_id`, building it if needed.
pub fn resolve(container: &Container, unique_id: &str) -> Result<Rc<dyn Feature>> {
    let feature = container.get::<Rc<dyn Feature>>(unique_id)?;
    Ok(Rc::clone(&*feature))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::RecordingBackend;
    use crate::domain::FulcrumError;
    use crate::ports::FeatureBackend;
    use crate::service::Host;

    struct Banner {
        config: Config,
    }

    impl Feature for Banner {
        fn kind(&self) -> FeatureKind {
            FeatureKind::Shortcode
        }

        fn name(&self) -> &str {
            "banner"
        }

        fn config(&self) -> &Config {
            &self.config
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_concrete_and_resolve() {
        let backend = Rc::new(RecordingBackend::new());
        let host = Host::new(
            Rc::new(crate::adapters::EventHooks::new()),
            backend.clone(),
            Rc::new(crate::adapters::MemoryLoader::new()),
        );
        let container = Container::new(host);

        container
            .register_concrete(
                "banner",
                concrete(Autoload::Lazy, |_| {
                    Ok(Banner {
                        config: Config::default(),
                    })
                }),
            )
            .unwrap();

        let feature = resolve(&container, "banner").unwrap();
        assert!(feature.as_any().downcast_ref::<Banner>().is_some());
        assert!(!feature.is_registered(&container));

        feature.register(&container).unwrap();
        assert!(backend.is_registered(FeatureKind::Shortcode, "banner"));

        feature.deregister(&container).unwrap();
        assert!(!feature.is_registered(&container));
    }

    #[test]
    fn test_resolve_non_feature() {
        let container = Container::default();
        container.set_parameter("plain", 1);
        assert!(matches!(
            resolve(&container, "plain"),
            Err(FulcrumError::TypeMismatch { .. })
        ));
    }
}
