// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process lifecycle hook scheduler.

use crate::domain::Result;
use crate::ports::{HookCallback, LifecycleHooks};
use crate::service::Container;
use std::cell::RefCell;
use std::collections::HashMap;

struct Action {
    priority: i32,
    callback: HookCallback,
}

/// A `LifecycleHooks` implementation keeping callbacks in memory.
///
/// Callbacks attached while an event is being dispatched take effect on the next
/// dispatch.
///
/// # Examples
///
/// ```rust
/// use fulcrum::adapters::EventHooks;
/// use fulcrum::ports::LifecycleHooks;
/// use fulcrum::service::Container;
/// use std::rc::Rc;
///
/// # fn main() -> fulcrum::domain::Result<()> {
/// let hooks = EventHooks::new();
/// hooks.add_action("init", 10, Rc::new(|c: &Container| {
///     c.set_parameter("initialized", true);
///     Ok(())
/// }));
///
/// let container = Container::default();
/// hooks.do_action("init", &container)?;
/// assert!(container.parameter("initialized")?.is_truthy());
/// assert_eq!(hooks.fired("init"), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct EventHooks {
    actions: RefCell<HashMap<String, Vec<Action>>>,
    fired: RefCell<HashMap<String, usize>>,
}

impl EventHooks {
    /// Creates a scheduler with no callbacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of callbacks attached to `event`.
    pub fn count(&self, event: &str) -> usize {
        self.actions.borrow().get(event).map_or(0, Vec::len)
    }

    /// Returns `true` if any callback is attached to `event`.
    pub fn has_action(&self, event: &str) -> bool {
        self.count(event) > 0
    }

    /// Returns how many times `event` has been fired.
    pub fn fired(&self, event: &str) -> usize {
        self.fired.borrow().get(event).copied().unwrap_or(0)
    }
}

impl LifecycleHooks for EventHooks {
    fn add_action(&self, event: &str, priority: i32, callback: HookCallback) {
        tracing::debug!("Adding action to '{}' at priority {}", event, priority);
        let mut actions = self.actions.borrow_mut();
        let queue = actions.entry(event.to_string()).or_default();
        // Stable: equal priorities keep attachment order.
        let pos = queue.partition_point(|action| action.priority <= priority);
        queue.insert(pos, Action { priority, callback });
    }

    fn do_action(&self, event: &str, container: &Container) -> Result<()> {
        *self.fired.borrow_mut().entry(event.to_string()).or_default() += 1;

        let callbacks: Vec<HookCallback> = self
            .actions
            .borrow()
            .get(event)
            .map(|queue| queue.iter().map(|action| action.callback.clone()).collect())
            .unwrap_or_default();

        tracing::debug!("Firing '{}' ({} callbacks)", event, callbacks.len());
        for callback in callbacks {
            callback(container)?;
        }
        Ok(())
    }
}
