//! Explicit observer registration
//!
//! Subscribing returns a [`Subscription`], which is the disposer: handing it
//! back to [`Subscribers::unsubscribe`] removes the registration. Presenters
//! keep their subscription for as long as they are mounted and dispose it on
//! teardown.

use std::collections::BTreeMap;

/// Identifies one registration; used to route notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Disposer handed out at subscribe time
#[must_use = "a Subscription must be handed back to unsubscribe on teardown"]
#[derive(Debug, PartialEq, Eq)]
pub struct Subscription {
    id: SubscriptionId,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }
}

/// Registry of subscriptions keyed by topic
#[derive(Debug)]
pub struct Subscribers<T> {
    next_id: u64,
    entries: BTreeMap<SubscriptionId, T>,
}

impl<T> Default for Subscribers<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: BTreeMap::new(),
        }
    }
}

impl<T: PartialEq> Subscribers<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, topic: T) -> Subscription {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.insert(id, topic);
        Subscription { id }
    }

    /// Remove a registration. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.entries.remove(&subscription.id).is_some()
    }

    /// Registrations for `topic`, oldest first
    pub fn recipients(&self, topic: &T) -> Vec<SubscriptionId> {
        self.entries
            .iter()
            .filter(|(_, t)| *t == topic)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipients_match_topic() {
        let mut subs = Subscribers::new();
        let a = subs.subscribe("added");
        let b = subs.subscribe("changed");
        let c = subs.subscribe("added");

        assert_eq!(subs.recipients(&"added"), vec![a.id(), c.id()]);
        assert_eq!(subs.recipients(&"changed"), vec![b.id()]);
        assert!(subs.recipients(&"other").is_empty());
    }

    #[test]
    fn test_unsubscribe_disposes_registration() {
        let mut subs = Subscribers::new();
        let a = subs.subscribe(1);
        let a_id = a.id();
        assert_eq!(subs.len(), 1);

        assert!(subs.unsubscribe(a));
        assert!(subs.is_empty());
        assert!(!subs.recipients(&1).contains(&a_id));
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut subs = Subscribers::new();
        let a = subs.subscribe(1);
        let a_id = a.id();
        assert!(subs.unsubscribe(a));
        let b = subs.subscribe(1);
        assert_ne!(a_id, b.id());
    }
}
