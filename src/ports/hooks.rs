// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lifecycle hook scheduler trait definition.
//!
//! Providers split their work in two phases: they queue feature registrations while
//! the host boots and flush them when a later lifecycle event fires. This module
//! defines the `LifecycleHooks` trait through which they attach to those events.

use crate::domain::Result;
use crate::service::Container;
use std::rc::Rc;

/// Type alias for lifecycle callbacks.
///
/// A callback receives the container that is being booted so it can look up the
/// services it needs at the time the event fires.
pub type HookCallback = Rc<dyn Fn(&Container) -> Result<()>>;

/// The priority used when a caller has no ordering preference.
pub const DEFAULT_PRIORITY: i32 = 10;

/// Names of the lifecycle events the built-in providers attach to.
pub mod events {
    /// Fired once every plugin has been loaded.
    pub const PLUGINS_LOADED: &str = "plugins_loaded";
    /// Fired by the framework bootstrap once it has been loaded.
    pub const FULCRUM_IS_LOADED: &str = "fulcrum_is_loaded";
    /// Fired when the host initializes its feature registries.
    pub const INIT: &str = "init";
    /// Fired when front-end assets should be enqueued.
    pub const ENQUEUE_SCRIPTS: &str = "wp_enqueue_scripts";
    /// Fired when the post edit screen loads.
    pub const LOAD_POST: &str = "load-post.php";
    /// Fired when the new post screen loads.
    pub const LOAD_POST_NEW: &str = "load-post-new.php";
    /// Fired when the host initializes its widget registry.
    pub const WIDGETS_INIT: &str = "widgets_init";
    /// Fired once queued widgets have been registered.
    pub const FULCRUM_WIDGET_INIT: &str = "fulcrum_widget_init";
}

/// A named, ordered callback scheduler supplied by the host.
///
/// Callbacks attached to an event run when it fires, by ascending priority and, for
/// equal priorities, in the order they were attached. Execution is synchronous and
/// on the calling thread.
pub trait LifecycleHooks {
    /// Attaches `callback` to `event` at `priority`.
    fn add_action(&self, event: &str, priority: i32, callback: HookCallback);

    /// Fires `event`, running every attached callback.
    ///
    /// The first callback error stops the dispatch and is returned.
    fn do_action(&self, event: &str, container: &Container) -> Result<()>;
}
