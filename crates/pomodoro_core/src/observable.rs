//! Observable value with synchronous change notification.
//!
//! # Responsibility
//! - Own one value plus an ordered set of listeners.
//! - Replay the current value to every new subscriber.
//! - Notify all listeners after each `set`/`update`.
//!
//! # Invariants
//! - Listeners run in subscription order, on the caller's thread.
//! - No internal borrow is held while a listener runs, so listeners may read,
//!   mutate, subscribe or unsubscribe without panicking.
//! - A change made from inside a listener is delivered after the current
//!   listener returns; the round in progress stops and a new round with the
//!   latest value reaches every listener, the mutating one included.
//! - A listener never receives a value older than one it already received.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

type Listener<T> = Rc<RefCell<dyn FnMut(&T)>>;

struct Inner<T> {
    value: T,
    listeners: BTreeMap<u64, Listener<T>>,
    next_listener_id: u64,
    notifying: bool,
    pending: bool,
}

/// Single-threaded observable container.
///
/// Cloning yields another handle to the same value and listener set.
pub struct Observable<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + 'static> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                value,
                listeners: BTreeMap::new(),
                next_listener_id: 0,
                notifying: false,
                pending: false,
            })),
        }
    }

    /// Returns a clone of the current value.
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Runs `f` against the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Registers `callback` and immediately calls it with the current value.
    pub fn subscribe(&self, callback: impl FnMut(&T) + 'static) -> Subscription {
        let listener: Listener<T> = Rc::new(RefCell::new(callback));
        let (id, snapshot, nested) = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_listener_id;
            inner.next_listener_id += 1;
            inner.listeners.insert(id, Rc::clone(&listener));
            let nested = inner.notifying;
            inner.notifying = true;
            (id, inner.value.clone(), nested)
        };

        (&mut *listener.borrow_mut())(&snapshot);
        if !nested {
            // Changes made by the replayed callback are delivered here.
            self.drain();
        }

        let weak: Weak<RefCell<Inner<T>>> = Rc::downgrade(&self.inner);
        Subscription {
            detach: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.borrow_mut().listeners.remove(&id);
                }
            })),
        }
    }

    /// Replaces the value and notifies every listener.
    pub fn set(&self, value: T) {
        self.inner.borrow_mut().value = value;
        self.notify();
    }

    /// Mutates the value in place, notifies every listener, and returns the
    /// closure's result.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let result = f(&mut self.inner.borrow_mut().value);
        self.notify();
        result
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    fn notify(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.pending = true;
            if inner.notifying {
                return;
            }
            inner.notifying = true;
        }
        self.drain();
    }

    /// Delivers rounds until no change is pending. Must only run while
    /// `notifying` is set by the caller.
    fn drain(&self) {
        loop {
            let (snapshot, listeners) = {
                let mut inner = self.inner.borrow_mut();
                if !inner.pending {
                    inner.notifying = false;
                    return;
                }
                inner.pending = false;
                let listeners: Vec<(u64, Listener<T>)> = inner
                    .listeners
                    .iter()
                    .map(|(id, listener)| (*id, Rc::clone(listener)))
                    .collect();
                (inner.value.clone(), listeners)
            };

            for (id, listener) in listeners {
                {
                    let inner = self.inner.borrow();
                    if inner.pending {
                        break;
                    }
                    if !inner.listeners.contains_key(&id) {
                        continue;
                    }
                }
                (&mut *listener.borrow_mut())(&snapshot);
            }
        }
    }
}

/// Handle returned by [`Observable::subscribe`].
///
/// Dropping the handle keeps the listener registered; call
/// [`Subscription::unsubscribe`] to remove it.
pub struct Subscription {
    detach: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Removes the listener. Calling it after the observable is gone is a no-op.
    pub fn unsubscribe(mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.detach.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Observable;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn subscribe_replays_current_value() {
        let observable = Observable::new(7);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let _sub = observable.subscribe(move |value| sink.borrow_mut().push(*value));
        assert_eq!(*seen.borrow(), vec![7]);
    }

    #[test]
    fn set_and_update_notify_in_subscription_order() {
        let observable = Observable::new(0);
        let log = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&log);
        let _a = observable.subscribe(move |value| first.borrow_mut().push(("a", *value)));
        let second = Rc::clone(&log);
        let _b = observable.subscribe(move |value| second.borrow_mut().push(("b", *value)));
        log.borrow_mut().clear();

        observable.set(1);
        let doubled = observable.update(|value| {
            *value *= 10;
            *value
        });

        assert_eq!(doubled, 10);
        assert_eq!(
            *log.borrow(),
            vec![("a", 1), ("b", 1), ("a", 10), ("b", 10)]
        );
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let observable = Observable::new(String::from("x"));
        let count = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&count);

        let sub = observable.subscribe(move |_| *counter.borrow_mut() += 1);
        assert_eq!(observable.subscriber_count(), 1);
        sub.unsubscribe();
        assert_eq!(observable.subscriber_count(), 0);

        observable.set(String::from("y"));
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn unsubscribe_after_drop_is_noop() {
        let observable = Observable::new(1);
        let sub = observable.subscribe(|_| {});
        drop(observable);
        sub.unsubscribe();
    }

    #[test]
    fn listener_can_subscribe_during_notification() {
        let observable = Observable::new(0);
        let nested = observable.clone();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let _outer = observable.subscribe(move |value| {
            if *value == 1 {
                let inner_sink = Rc::clone(&sink);
                let _inner = nested.subscribe(move |v| inner_sink.borrow_mut().push(*v));
            }
        });

        observable.set(1);
        assert_eq!(*seen.borrow(), vec![1]);

        observable.set(2);
        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[test]
    fn listener_mutation_delivers_latest_value_to_every_listener() {
        let observable = Observable::new(0);
        let writer = observable.clone();
        let first_seen = Rc::new(RefCell::new(Vec::new()));
        let second_seen = Rc::new(RefCell::new(Vec::new()));

        let first_sink = Rc::clone(&first_seen);
        let _first = observable.subscribe(move |value| {
            first_sink.borrow_mut().push(*value);
            if *value == 1 {
                writer.set(2);
            }
        });
        let second_sink = Rc::clone(&second_seen);
        let _second = observable.subscribe(move |value| second_sink.borrow_mut().push(*value));

        observable.set(1);

        assert_eq!(observable.get(), 2);
        assert_eq!(*first_seen.borrow(), vec![0, 1, 2]);
        assert_eq!(*second_seen.borrow(), vec![0, 2]);
    }

    #[test]
    fn mutation_from_replay_reaches_existing_listeners() {
        let observable = Observable::new(0);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _watcher = observable.subscribe(move |value| sink.borrow_mut().push(*value));

        let writer = observable.clone();
        let _late = observable.subscribe(move |value| {
            if *value == 0 {
                writer.set(5);
            }
        });

        assert_eq!(*seen.borrow(), vec![0, 5]);
    }
}
