#![forbid(unsafe_code)]

//! Shared, version-tracked values with change notification.
//!
//! # Design
//!
//! [`Observable<T>`] keeps its value in `Rc<RefCell<..>>`. Clones are handles
//! to the same cell. Subscribers are held weakly; the strong reference lives
//! in the [`Subscription`] guard returned by [`Observable::subscribe`], so
//! dropping the guard is all it takes to unsubscribe.
//!
//! Two write paths exist:
//!
//! - [`Observable::set`] / [`Observable::update`] notify only when the value
//!   actually changed (`PartialEq`).
//! - [`Observable::publish`] always stores, bumps the version, and notifies.
//!   The settings holder uses it so that every explicit setter call reaches
//!   observers exactly once.
//!
//! # Failure Modes
//!
//! - **Re-entrant writes**: allowed. The borrow is released before callbacks
//!   run, so a callback may call `set` on the same observable; the nested
//!   notification runs before the outer loop continues.
//! - **Leaked guards**: callbacks whose `Subscription` is never dropped stay
//!   registered. Dead weak references are pruned lazily on notify.

use std::any::Any;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, debug_span};
use web_time::Instant;

use super::batch;

type CallbackRc<T> = Rc<dyn Fn(&T)>;
type CallbackWeak<T> = Weak<dyn Fn(&T)>;

struct ObservableInner<T> {
    value: T,
    version: u64,
    /// Pruned on notify.
    subscribers: Vec<CallbackWeak<T>>,
}

/// A shared, version-tracked value with change notification.
///
/// # Invariants
///
/// 1. `version` increments by exactly 1 on each notifying write.
/// 2. `set(v)` where `v == current` is a no-op; `publish(v)` never is.
/// 3. Subscribers are notified in registration order.
/// 4. A dropped [`Subscription`] is never called again.
pub struct Observable<T> {
    inner: Rc<RefCell<ObservableInner<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("subscriber_count", &inner.subscribers.len())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Version 0, no subscribers.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ObservableInner {
                value,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Borrow the current value without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Store `value` and notify, unless it equals the current value.
    pub fn set(&self, value: T) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return;
            }
            inner.value = value;
            inner.version += 1;
        }
        self.notify();
    }

    /// Store `value` and notify unconditionally.
    pub fn publish(&self, value: T) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.value = value;
            inner.version += 1;
        }
        self.notify();
    }

    /// Mutate in place; notifies only if the value changed.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let changed = {
            let mut inner = self.inner.borrow_mut();
            let old = inner.value.clone();
            f(&mut inner.value);
            if inner.value != old {
                inner.version += 1;
                true
            } else {
                false
            }
        };
        if changed {
            self.notify();
        }
    }

    /// Register `callback` for every notifying write.
    ///
    /// The callback stays registered until the returned guard is dropped.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let strong: CallbackRc<T> = Rc::new(callback);
        self.inner
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&strong));
        Subscription {
            _guard: Box::new(strong),
        }
    }

    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Registered subscribers, including dropped ones not yet pruned.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    fn notify(&self) {
        let callbacks: Vec<CallbackRc<T>> = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|w| w.strong_count() > 0);
            inner
                .subscribers
                .iter()
                .filter_map(Weak::upgrade)
                .collect()
        };

        if callbacks.is_empty() {
            return;
        }

        let observers = callbacks.len() as u64;

        if batch::is_batching() {
            batch::record_change();
            for cb in callbacks {
                let key = Rc::as_ptr(&cb) as *const () as usize;
                let source = self.clone();
                batch::defer_or_run_keyed(key, move || {
                    let latest = source.get();
                    cb(&latest);
                });
            }
            return;
        }

        let value = self.inner.borrow().value.clone();
        let start = Instant::now();
        let _span = debug_span!(
            "hue.propagate",
            changes = 1_u64,
            observers,
            duration_us = tracing::field::Empty
        )
        .entered();

        for cb in &callbacks {
            cb(&value);
        }

        let duration_us = start.elapsed().as_micros() as u64;
        tracing::Span::current().record("duration_us", duration_us);
        debug!(duration_us, observers, "change propagated");
    }
}

/// RAII guard for one or more subscriber callbacks.
///
/// Dropping it releases the strong references; the observables' weak
/// entries stop upgrading immediately and are pruned on the next notify.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    _guard: Box<dyn Any>,
}

impl Subscription {
    /// One guard that keeps several subscriptions alive together.
    pub fn combine(parts: Vec<Subscription>) -> Self {
        Self {
            _guard: Box::new(parts),
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
