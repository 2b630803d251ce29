//! # Subscription index.
//!
//! Maps an [`EventType`] to the ordered list of subscriptions for that type.
//! The index is **not** synchronized; [`EventSystem`](crate::EventSystem)
//! holds it behind a lock.
//!
//! ## Invariants
//! - A key is never present with an empty list.
//! - Removing an entry that is not present is a bookkeeping bug in the
//!   caller and panics.

use std::collections::HashMap;
use std::sync::Arc;

use crate::events::EventType;

use super::{SubscriptionRef, Target};

#[derive(Default)]
pub(crate) struct SubscriptionIndex {
    map: HashMap<EventType, Vec<SubscriptionRef>>,
}

impl SubscriptionIndex {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends `sub` to the list for `ty`, creating the list if absent.
    pub(crate) fn add(&mut self, ty: EventType, sub: SubscriptionRef) {
        debug_assert_eq!(sub.event_type(), ty);
        self.map.entry(ty).or_default().push(sub);
    }

    /// Removes exactly `sub` (by pointer) from the list for `ty`.
    ///
    /// # Panics
    /// If `sub` is not indexed under `ty`.
    pub(crate) fn remove(&mut self, ty: EventType, sub: &SubscriptionRef) {
        let Some(list) = self.map.get_mut(&ty) else {
            panic!("subscription index has no entries for `{ty}`");
        };
        let Some(pos) = list.iter().position(|s| Arc::ptr_eq(s, sub)) else {
            panic!("subscription not present in index for `{ty}`");
        };

        list.remove(pos);
        if list.is_empty() {
            self.map.remove(&ty);
        }
    }

    /// Lazy, restartable view of the entries for `ty` (empty if absent).
    pub(crate) fn lookup(&self, ty: EventType) -> impl Iterator<Item = &SubscriptionRef> + Clone {
        self.map.get(&ty).into_iter().flatten()
    }

    /// First entry for `ty` matching `target` (live entries only).
    pub(crate) fn find(&self, ty: EventType, target: &Target) -> Option<&SubscriptionRef> {
        self.lookup(ty).find(|s| s.matches(target))
    }

    /// All `(type, entries)` pairs, in unspecified order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (EventType, &[SubscriptionRef])> {
        self.map.iter().map(|(ty, list)| (*ty, list.as_slice()))
    }

    /// Drops every dead entry and every key left empty. Returns the number removed.
    pub(crate) fn sweep(&mut self) -> usize {
        let mut removed = 0;
        self.map.retain(|_, list| {
            let before = list.len();
            list.retain(|s| !s.is_dead());
            removed += before - list.len();
            !list.is_empty()
        });
        removed
    }

    /// Number of entries (live or dead) under `ty`.
    pub(crate) fn len_for(&self, ty: EventType) -> usize {
        self.map.get(&ty).map_or(0, Vec::len)
    }

    /// Number of event types with at least one entry.
    pub(crate) fn type_count(&self) -> usize {
        self.map.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HandlerError;
    use crate::handlers::{EventFn, EventFnRef};
    use crate::subscriptions::Subscription;

    struct Ping;
    struct Pong;

    fn ping_fn() -> EventFnRef<Ping> {
        EventFn::arc("ping", |_: Arc<Ping>| async { Ok::<_, HandlerError>(()) })
    }

    fn pong_fn() -> EventFnRef<Pong> {
        EventFn::arc("pong", |_: Arc<Pong>| async { Ok::<_, HandlerError>(()) })
    }

    fn erased<T: crate::Event>(f: &EventFnRef<T>) -> SubscriptionRef {
        Arc::new(Subscription::delegate(f))
    }

    #[test]
    fn test_add_and_lookup() {
        let mut index = SubscriptionIndex::new();
        let (a, b) = (ping_fn(), ping_fn());
        index.add(EventType::of::<Ping>(), erased(&a));
        index.add(EventType::of::<Ping>(), erased(&b));

        assert_eq!(index.len_for(EventType::of::<Ping>()), 2);
        assert_eq!(index.lookup(EventType::of::<Pong>()).count(), 0);

        let view = index.lookup(EventType::of::<Ping>());
        assert_eq!(view.clone().count(), 2);
        assert_eq!(view.count(), 2, "lookup view must be restartable");
    }

    #[test]
    fn test_remove_last_entry_drops_key() {
        let mut index = SubscriptionIndex::new();
        let a = ping_fn();
        let sub = erased(&a);
        index.add(EventType::of::<Ping>(), Arc::clone(&sub));
        assert_eq!(index.type_count(), 1);

        index.remove(EventType::of::<Ping>(), &sub);
        assert_eq!(index.type_count(), 0);
    }

    #[test]
    fn test_remove_keeps_siblings() {
        let mut index = SubscriptionIndex::new();
        let (a, b) = (ping_fn(), ping_fn());
        let (sa, sb) = (erased(&a), erased(&b));
        index.add(EventType::of::<Ping>(), Arc::clone(&sa));
        index.add(EventType::of::<Ping>(), Arc::clone(&sb));

        index.remove(EventType::of::<Ping>(), &sa);
        assert_eq!(index.len_for(EventType::of::<Ping>()), 1);
        assert!(index.find(EventType::of::<Ping>(), &Target::delegate(&b)).is_some());
        assert!(index.find(EventType::of::<Ping>(), &Target::delegate(&a)).is_none());
    }

    #[test]
    #[should_panic(expected = "not present in index")]
    fn test_remove_missing_entry_panics() {
        let mut index = SubscriptionIndex::new();
        let (a, b) = (ping_fn(), ping_fn());
        index.add(EventType::of::<Ping>(), erased(&a));
        index.remove(EventType::of::<Ping>(), &erased(&b));
    }

    #[test]
    #[should_panic(expected = "no entries")]
    fn test_remove_from_unknown_type_panics() {
        let mut index = SubscriptionIndex::new();
        let a = ping_fn();
        index.remove(EventType::of::<Ping>(), &erased(&a));
    }

    #[test]
    fn test_sweep_removes_dead_and_empty_keys() {
        let mut index = SubscriptionIndex::new();
        let (a, b) = (ping_fn(), ping_fn());
        let c = pong_fn();
        index.add(EventType::of::<Ping>(), erased(&a));
        index.add(EventType::of::<Ping>(), erased(&b));
        index.add(EventType::of::<Pong>(), erased(&c));

        drop(a);
        drop(c);
        assert_eq!(index.sweep(), 2);
        assert_eq!(index.len_for(EventType::of::<Ping>()), 1);
        assert_eq!(index.type_count(), 1);
        assert_eq!(index.sweep(), 0);
        assert_eq!(index.iter().count(), 1);
    }
}
