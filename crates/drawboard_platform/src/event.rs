//! Single-threaded event streams with owned subscriptions
//!
//! [`EventSource`] models a native notification stream (the global touch
//! frame feed, a view's invalidate requests). Subscribing hands back a
//! [`Subscription`]; the handler stays registered until that handle is
//! unsubscribed or dropped, whichever happens first.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use slotmap::{new_key_type, SlotMap};
use tracing::trace;

use crate::input::TouchFrame;

new_key_type! {
    /// Identifier of one registered handler
    pub struct SubscriberId;
}

type Handler<T> = Rc<dyn Fn(&T)>;
type Registry<T> = RefCell<SlotMap<SubscriberId, Handler<T>>>;

/// A multicast event stream
///
/// Cloning shares the underlying subscriber list.
pub struct EventSource<T> {
    registry: Rc<Registry<T>>,
}

/// The platform-wide touch frame stream
pub type TouchFrameSource = EventSource<TouchFrame>;

impl<T: 'static> EventSource<T> {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(SlotMap::with_key())),
        }
    }

    /// Register `handler` for every subsequent event
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&T) + 'static,
    {
        let id = self.registry.borrow_mut().insert(Rc::new(handler));
        let registry: Weak<Registry<T>> = Rc::downgrade(&self.registry);
        trace!("subscribed {:?}", id);

        Subscription {
            release: Some(Box::new(move || {
                if let Some(registry) = registry.upgrade() {
                    // Drop the handler after the borrow ends; its captures may
                    // hold subscriptions to this same source.
                    let removed = registry.borrow_mut().remove(id);
                    drop(removed);
                    trace!("unsubscribed {:?}", id);
                }
            })),
        }
    }

    /// Deliver `event` to every subscriber, returning how many were called
    ///
    /// Handlers may subscribe or unsubscribe while the event is being
    /// delivered. A handler removed mid-dispatch is not called; one added
    /// mid-dispatch first sees the next event.
    pub fn emit(&self, event: &T) -> usize {
        let snapshot: Vec<(SubscriberId, Handler<T>)> = self
            .registry
            .borrow()
            .iter()
            .map(|(id, handler)| (id, Rc::clone(handler)))
            .collect();

        let mut delivered = 0;
        for (id, handler) in snapshot {
            if !self.registry.borrow().contains_key(id) {
                continue;
            }
            handler(event);
            delivered += 1;
        }
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.borrow().len()
    }
}

impl<T: 'static> Default for EventSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for EventSource<T> {
    fn clone(&self) -> Self {
        Self {
            registry: Rc::clone(&self.registry),
        }
    }
}

impl<T> fmt::Debug for EventSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSource")
            .field("subscribers", &self.registry.borrow().len())
            .finish()
    }
}

/// Owned registration on an [`EventSource`]
///
/// Released exactly once: by [`Subscription::unsubscribe`] or on drop.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Remove the handler from its source
    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_emit_reaches_all_subscribers() {
        let source = EventSource::<u32>::new();
        let sum = Rc::new(Cell::new(0));

        let s1 = {
            let sum = sum.clone();
            source.subscribe(move |v| sum.set(sum.get() + v))
        };
        let s2 = {
            let sum = sum.clone();
            source.subscribe(move |v| sum.set(sum.get() + v * 10))
        };

        assert_eq!(source.emit(&2), 2);
        assert_eq!(sum.get(), 22);
        drop((s1, s2));
    }

    #[test]
    fn test_unsubscribe_and_drop_release_once() {
        let source = EventSource::<()>::new();
        let hits = Rc::new(Cell::new(0));

        let sub = {
            let hits = hits.clone();
            source.subscribe(move |_| hits.set(hits.get() + 1))
        };
        let other = source.subscribe(|_| {});
        assert_eq!(source.subscriber_count(), 2);

        sub.unsubscribe();
        assert_eq!(source.subscriber_count(), 1);
        source.emit(&());
        assert_eq!(hits.get(), 0);

        drop(other);
        assert_eq!(source.subscriber_count(), 0);
    }

    #[test]
    fn test_subscription_outliving_source() {
        let source = EventSource::<()>::new();
        let sub = source.subscribe(|_| {});
        drop(source);
        sub.unsubscribe();
    }

    #[test]
    fn test_handler_can_unsubscribe_another_during_emit() {
        let source = EventSource::<()>::new();
        let victim_calls = Rc::new(Cell::new(0));
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let killer = {
            let slot = slot.clone();
            source.subscribe(move |_| {
                slot.borrow_mut().take();
            })
        };
        let victim = {
            let calls = victim_calls.clone();
            source.subscribe(move |_| calls.set(calls.get() + 1))
        };
        *slot.borrow_mut() = Some(victim);

        assert_eq!(source.emit(&()), 1);
        assert_eq!(victim_calls.get(), 0);
        assert_eq!(source.subscriber_count(), 1);
        drop(killer);
    }
}
