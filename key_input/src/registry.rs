// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Priority ordered fan out of finished keys.
//!
//! Consumers (the prompt editor, a dialog, a global shortcut layer) subscribe with a
//! [`Priority`]. A key is offered to consumers from the highest tier down, and inside a
//! tier to the most recently registered consumer first. This stack discipline models
//! nested modal UI: the dialog that opened last sees keys first. The first handler that
//! returns `true` (consumed) stops the broadcast.
//!
//! ```text
//! Critical ─▶ [h7]
//! High     ─▶ [h2, h5]      offered h5, then h2
//! Normal   ─▶ (empty, not in the active tier list)
//! Low      ─▶ [h1]
//! ```
//!
//! The descending list of non empty tiers is cached and only rebuilt when a tier
//! appears or becomes empty, so a broadcast does no sorting.
//!
//! [`SharedKeyRegistry`] is the handle given out to consumers. It invokes handlers on a
//! snapshot taken outside its lock, so a handler may subscribe or unsubscribe (itself
//! included) while a key is being broadcast.

use crate::{KeyEvent, panic_message};
use std::{collections::HashMap,
          fmt::{Debug, Formatter},
          panic::{AssertUnwindSafe, catch_unwind},
          sync::{Arc, Mutex, MutexGuard, PoisonError}};
use strum_macros::{Display, EnumIter};

/// Ordered from lowest to highest.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Display, EnumIter)]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Critical,
}

/// A key consumer. Returns `true` when it consumed the key.
pub type SharedKeyHandler = Arc<dyn Fn(&KeyEvent) -> bool + Send + Sync>;

/// Wrap a closure as a [`SharedKeyHandler`]. Keep a clone of the returned value to be
/// able to unsubscribe later.
pub fn key_handler(
    handler: impl Fn(&KeyEvent) -> bool + Send + Sync + 'static,
) -> SharedKeyHandler {
    Arc::new(handler)
}

/// Handlers are identified by the allocation they point to.
fn is_same_handler(lhs: &SharedKeyHandler, rhs: &SharedKeyHandler) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(lhs), Arc::as_ptr(rhs))
}

#[derive(Default)]
pub struct KeyRegistry {
    /// Insertion ordered handlers per tier. A tier present here is never empty.
    tiers: HashMap<Priority, Vec<SharedKeyHandler>>,
    /// Keys of `tiers`, highest first.
    active_priorities: Vec<Priority>,
    #[cfg(test)]
    active_priorities_rebuild_count: usize,
}

impl Debug for KeyRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let tier_sizes: Vec<_> = self
            .active_priorities
            .iter()
            .map(|priority| (*priority, self.tiers.get(priority).map_or(0, Vec::len)))
            .collect();
        f.debug_struct("KeyRegistry")
            .field("tiers", &tier_sizes)
            .finish()
    }
}

impl KeyRegistry {
    /// Register `handler` at `priority`. If it is already registered (at any priority)
    /// it is moved, and becomes the most recent registration of the new tier.
    pub fn subscribe(&mut self, handler: SharedKeyHandler, priority: Priority) {
        self.remove(&handler);
        let tier = self.tiers.entry(priority).or_default();
        tier.push(handler);
        if tier.len() == 1 {
            self.rebuild_active_priorities();
        }
    }

    /// Remove `handler`. Returns `false` (and does nothing) if it isn't registered.
    pub fn unsubscribe(&mut self, handler: &SharedKeyHandler) -> bool { self.remove(handler) }

    /// Offer `key` to handlers in priority order until one consumes it. Returns `true`
    /// if some handler consumed it. A panicking handler is logged and counts as not
    /// consuming the key.
    pub fn broadcast(&self, key: &KeyEvent) -> bool {
        offer_in_order(self.in_dispatch_order(), key)
    }

    /// Handlers in the order a broadcast visits them.
    pub fn in_dispatch_order(&self) -> impl Iterator<Item = (Priority, &SharedKeyHandler)> {
        self.active_priorities.iter().flat_map(move |priority| {
            let priority = *priority;
            self.tiers
                .get(&priority)
                .into_iter()
                .flat_map(|tier| tier.iter().rev())
                .map(move |handler| (priority, handler))
        })
    }

    /// Non empty tiers, highest first.
    #[must_use]
    pub fn active_priorities(&self) -> &[Priority] { &self.active_priorities }

    #[must_use]
    pub fn len(&self) -> usize { self.tiers.values().map(Vec::len).sum() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.tiers.is_empty() }

    fn remove(&mut self, handler: &SharedKeyHandler) -> bool {
        let Some((priority, index)) = self.tiers.iter().find_map(|(priority, tier)| {
            tier.iter()
                .position(|it| is_same_handler(it, handler))
                .map(|index| (*priority, index))
        }) else {
            return false;
        };

        if let Some(tier) = self.tiers.get_mut(&priority) {
            tier.remove(index);
            if tier.is_empty() {
                self.tiers.remove(&priority);
                self.rebuild_active_priorities();
            }
        }
        true
    }

    fn rebuild_active_priorities(&mut self) {
        let mut priorities: Vec<Priority> = self.tiers.keys().copied().collect();
        priorities.sort_unstable_by(|lhs, rhs| rhs.cmp(lhs));
        self.active_priorities = priorities;
        #[cfg(test)]
        {
            self.active_priorities_rebuild_count += 1;
        }
    }
}

fn offer_in_order<'a>(
    handlers: impl IntoIterator<Item = (Priority, &'a SharedKeyHandler)>,
    key: &KeyEvent,
) -> bool {
    for (priority, handler) in handlers {
        match catch_unwind(AssertUnwindSafe(|| handler(key))) {
            Ok(true) => return true,
            Ok(false) => {}
            Err(payload) => {
                tracing::error!(
                    message = "Key handler panicked, treated as not consumed",
                    priority = %priority,
                    key = %key,
                    panic = %panic_message(payload.as_ref())
                );
            }
        }
    }
    false
}

/// Cloneable, thread safe handle to a [`KeyRegistry`].
#[derive(Debug, Clone, Default)]
pub struct SharedKeyRegistry {
    inner: Arc<Mutex<KeyRegistry>>,
}

impl SharedKeyRegistry {
    pub fn subscribe(&self, handler: SharedKeyHandler, priority: Priority) {
        self.lock().subscribe(handler, priority);
    }

    pub fn unsubscribe(&self, handler: &SharedKeyHandler) -> bool {
        self.lock().unsubscribe(handler)
    }

    /// Same as [`KeyRegistry::broadcast`], with the lock released while handlers run.
    pub fn broadcast(&self, key: &KeyEvent) -> bool {
        let snapshot: Vec<(Priority, SharedKeyHandler)> = self
            .lock()
            .in_dispatch_order()
            .map(|(priority, handler)| (priority, handler.clone()))
            .collect();
        offer_in_order(
            snapshot.iter().map(|(priority, handler)| (*priority, handler)),
            key,
        )
    }

    #[must_use]
    pub fn active_priorities(&self) -> Vec<Priority> {
        self.lock().active_priorities().to_vec()
    }

    #[must_use]
    pub fn len(&self) -> usize { self.lock().len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.lock().is_empty() }

    /// No handler runs under this lock and the registry never panics while holding it,
    /// so a poisoned lock still guards a consistent registry.
    fn lock(&self) -> MutexGuard<'_, KeyRegistry> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests_registry {
    use super::*;
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    type CallLog = Arc<Mutex<Vec<&'static str>>>;

    fn recording_handler(log: &CallLog, label: &'static str, consume: bool) -> SharedKeyHandler {
        let log = log.clone();
        key_handler(move |_key| {
            log.lock().unwrap().push(label);
            consume
        })
    }

    fn key() -> KeyEvent { KeyEvent::insertable_text("a", "a") }

    #[test]
    fn priority_is_totally_ordered() {
        let all: Vec<Priority> = Priority::iter().collect();
        assert_eq!(
            all,
            vec![Priority::Low, Priority::Normal, Priority::High, Priority::Critical]
        );
        assert!(all.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(Priority::default(), Priority::Normal);
    }

    #[test]
    fn high_tier_in_reverse_registration_order_then_low() {
        let log = CallLog::default();
        let mut registry = KeyRegistry::default();
        registry.subscribe(recording_handler(&log, "low", false), Priority::Low);
        registry.subscribe(recording_handler(&log, "high 1", false), Priority::High);
        registry.subscribe(recording_handler(&log, "high 2", false), Priority::High);

        assert!(!registry.broadcast(&key()));
        assert_eq!(*log.lock().unwrap(), vec!["high 2", "high 1", "low"]);
    }

    #[test]
    fn consumed_stops_broadcast() {
        let log = CallLog::default();
        let mut registry = KeyRegistry::default();
        registry.subscribe(recording_handler(&log, "low", false), Priority::Low);
        registry.subscribe(recording_handler(&log, "high 1", true), Priority::High);
        registry.subscribe(recording_handler(&log, "high 2", false), Priority::High);

        assert!(registry.broadcast(&key()));
        assert_eq!(*log.lock().unwrap(), vec!["high 2", "high 1"]);
    }

    #[test]
    fn resubscribe_replaces_priority() {
        let log = CallLog::default();
        let mut registry = KeyRegistry::default();
        let handler = recording_handler(&log, "moved", false);
        registry.subscribe(recording_handler(&log, "normal", false), Priority::Normal);
        registry.subscribe(handler.clone(), Priority::Low);
        registry.subscribe(handler.clone(), Priority::Critical);

        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.active_priorities(),
            &[Priority::Critical, Priority::Normal]
        );
        registry.broadcast(&key());
        assert_eq!(*log.lock().unwrap(), vec!["moved", "normal"]);
    }

    #[test]
    fn unsubscribe_twice_is_noop() {
        let log = CallLog::default();
        let mut registry = KeyRegistry::default();
        let handler = recording_handler(&log, "only", true);
        registry.subscribe(handler.clone(), Priority::High);

        assert!(registry.unsubscribe(&handler));
        assert!(!registry.unsubscribe(&handler));
        assert!(registry.is_empty());
        assert_eq!(registry.active_priorities(), &[] as &[Priority]);
        assert!(!registry.broadcast(&key()));
    }

    #[test]
    fn equal_closures_are_distinct_handlers() {
        let log = CallLog::default();
        let mut registry = KeyRegistry::default();
        let first = recording_handler(&log, "same", false);
        let second = recording_handler(&log, "same", false);
        registry.subscribe(first.clone(), Priority::Normal);
        registry.subscribe(second, Priority::Normal);
        assert!(registry.unsubscribe(&first));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn active_tiers_rebuilt_only_on_emptiness_transitions() {
        let log = CallLog::default();
        let mut registry = KeyRegistry::default();
        let first = recording_handler(&log, "1", false);
        let second = recording_handler(&log, "2", false);

        registry.subscribe(first.clone(), Priority::Normal);
        assert_eq!(registry.active_priorities_rebuild_count, 1);

        registry.subscribe(second.clone(), Priority::Normal);
        registry.broadcast(&key());
        registry.broadcast(&key());
        assert_eq!(registry.active_priorities_rebuild_count, 1);

        registry.unsubscribe(&first);
        assert_eq!(registry.active_priorities_rebuild_count, 1);

        registry.unsubscribe(&second);
        assert_eq!(registry.active_priorities_rebuild_count, 2);
    }

    #[test]
    fn panicking_handler_is_skipped() {
        let log = CallLog::default();
        let mut registry = KeyRegistry::default();
        registry.subscribe(recording_handler(&log, "low", true), Priority::Low);
        registry.subscribe(key_handler(|_| -> bool { panic!("handler bug") }), Priority::High);

        assert!(registry.broadcast(&key()));
        assert_eq!(*log.lock().unwrap(), vec!["low"]);
    }

    #[test]
    fn shared_handler_can_unsubscribe_itself_during_broadcast() {
        let registry = SharedKeyRegistry::default();
        let slot: Arc<Mutex<Option<SharedKeyHandler>>> = Arc::default();
        let handler = {
            let registry = registry.clone();
            let slot = slot.clone();
            key_handler(move |_key| {
                if let Some(me) = slot.lock().unwrap().take() {
                    registry.unsubscribe(&me);
                }
                true
            })
        };
        *slot.lock().unwrap() = Some(handler.clone());
        registry.subscribe(handler, Priority::High);

        assert!(registry.broadcast(&key()));
        assert!(registry.is_empty());
        assert!(!registry.broadcast(&key()));
    }

    #[test]
    fn shared_registry_matches_inner_order() {
        let log = CallLog::default();
        let registry = SharedKeyRegistry::default();
        registry.subscribe(recording_handler(&log, "normal", false), Priority::Normal);
        registry.subscribe(recording_handler(&log, "critical", false), Priority::Critical);

        assert!(!registry.broadcast(&key()));
        assert_eq!(*log.lock().unwrap(), vec!["critical", "normal"]);
        assert_eq!(
            registry.active_priorities(),
            vec![Priority::Critical, Priority::Normal]
        );
        assert_eq!(registry.len(), 2);
    }
}
