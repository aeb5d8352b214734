#![forbid(unsafe_code)]

//! Coalescing of [`Observable`](super::Observable) notifications.
//!
//! Inside a [`BatchScope`] values update immediately but notifications are
//! queued. When the outermost scope drops, each queued callback fires once
//! with the latest value. Applying a whole configuration (theme mode and
//! locale together) inside one scope gives observers a single consistent
//! view instead of an intermediate state.
//!
//! ```ignore
//! let _batch = BatchScope::new();
//! settings.set_theme_mode(ThemeMode::Dark); // deferred
//! settings.set_locale(arabic);              // deferred
//! // observers run here, once each
//! ```
//!
//! # Invariants
//!
//! 1. Nested scopes are allowed; only the outermost one flushes.
//! 2. Deferred callbacks run in first-enqueue order.
//! 3. A panicking callback does not stop the others; the first panic is
//!    re-raised after all callbacks ran.

use std::cell::RefCell;

use tracing::{debug, debug_span};
use web_time::Instant;

type DeferredNotify = Box<dyn FnOnce()>;

struct DeferredEntry {
    key: Option<usize>,
    notify: DeferredNotify,
}

struct BatchContext {
    depth: u32,
    deferred: Vec<DeferredEntry>,
    /// Writes coalesced into this batch.
    changes: u64,
}

thread_local! {
    static BATCH_CTX: RefCell<Option<BatchContext>> = const { RefCell::new(None) };
}

/// True while a [`BatchScope`] is alive on this thread.
pub fn is_batching() -> bool {
    BATCH_CTX.with(|ctx| ctx.borrow().is_some())
}

/// Queue `f` for the end of the current batch, or run it now when no batch
/// is active. Returns `true` if it was queued.
pub fn defer_or_run(f: impl FnOnce() + 'static) -> bool {
    BATCH_CTX.with(|ctx| {
        let mut guard = ctx.borrow_mut();
        if let Some(batch) = guard.as_mut() {
            batch.deferred.push(DeferredEntry {
                key: None,
                notify: Box::new(f),
            });
            true
        } else {
            drop(guard);
            f();
            false
        }
    })
}

/// Like [`defer_or_run`], but a second entry with the same `key` replaces
/// the first while keeping its queue position.
pub fn defer_or_run_keyed(key: usize, f: impl FnOnce() + 'static) -> bool {
    BATCH_CTX.with(|ctx| {
        let mut guard = ctx.borrow_mut();
        if let Some(batch) = guard.as_mut() {
            match batch.deferred.iter_mut().find(|e| e.key == Some(key)) {
                Some(entry) => entry.notify = Box::new(f),
                None => batch.deferred.push(DeferredEntry {
                    key: Some(key),
                    notify: Box::new(f),
                }),
            }
            true
        } else {
            drop(guard);
            f();
            false
        }
    })
}

/// Count one coalesced write against the active batch.
pub(crate) fn record_change() {
    BATCH_CTX.with(|ctx| {
        if let Some(batch) = ctx.borrow_mut().as_mut() {
            batch.changes = batch.changes.saturating_add(1);
        }
    });
}

type PanicPayload = Box<dyn std::any::Any + Send>;

/// Run everything queued so far. Returns `false` when the queue was empty.
fn flush(first_panic: &mut Option<PanicPayload>) -> bool {
    let (changes, deferred): (u64, Vec<DeferredNotify>) = BATCH_CTX.with(|ctx| {
        match ctx.borrow_mut().as_mut() {
            Some(batch) => {
                let deferred = std::mem::take(&mut batch.deferred)
                    .into_iter()
                    .map(|entry| entry.notify)
                    .collect();
                (std::mem::take(&mut batch.changes), deferred)
            }
            None => (0, Vec::new()),
        }
    });

    if deferred.is_empty() {
        return false;
    }

    let observers = deferred.len() as u64;
    let start = Instant::now();
    let _span = debug_span!(
        "hue.propagate",
        changes,
        observers,
        duration_us = tracing::field::Empty
    )
    .entered();

    for notify in deferred {
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(notify));
        if let Err(payload) = result
            && first_panic.is_none()
        {
            *first_panic = Some(payload);
        }
    }

    let duration_us = start.elapsed().as_micros() as u64;
    tracing::Span::current().record("duration_us", duration_us);
    debug!(duration_us, changes, observers, "batched changes propagated");
    true
}

/// RAII guard for a batch. See the module docs.
pub struct BatchScope {
    is_root: bool,
}

impl BatchScope {
    #[must_use]
    pub fn new() -> Self {
        let is_root = BATCH_CTX.with(|ctx| {
            let mut guard = ctx.borrow_mut();
            match guard.as_mut() {
                Some(batch) => {
                    batch.depth += 1;
                    false
                }
                None => {
                    *guard = Some(BatchContext {
                        depth: 1,
                        deferred: Vec::new(),
                        changes: 0,
                    });
                    true
                }
            }
        });
        Self { is_root }
    }

    /// Callbacks queued in the current batch.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        BATCH_CTX.with(|ctx| ctx.borrow().as_ref().map_or(0, |b| b.deferred.len()))
    }
}

impl Default for BatchScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BatchScope {
    fn drop(&mut self) {
        let should_flush = BATCH_CTX.with(|ctx| match ctx.borrow_mut().as_mut() {
            Some(batch) => {
                batch.depth -= 1;
                batch.depth == 0
            }
            None => false,
        });

        if should_flush {
            // Callbacks that write while flushing queue into the same
            // context, so drain until nothing new arrives.
            let mut first_panic = None;
            while flush(&mut first_panic) {}
            BATCH_CTX.with(|ctx| *ctx.borrow_mut() = None);
            if let Some(payload) = first_panic {
                std::panic::resume_unwind(payload);
            }
        }
    }
}

impl std::fmt::Debug for BatchScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchScope")
            .field("is_root", &self.is_root)
            .field("pending", &self.pending_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::Observable;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn batch_defers_and_coalesces() {
        let obs = Observable::new(0);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let _sub = obs.subscribe(move |v| log.borrow_mut().push(*v));

        {
            let _batch = BatchScope::new();
            obs.set(1);
            obs.set(2);
            obs.set(3);
            assert!(seen.borrow().is_empty());
            assert_eq!(obs.get(), 3);
        }
        assert_eq!(*seen.borrow(), vec![3]);
    }

    #[test]
    fn nested_batch_only_outermost_flushes() {
        let obs = Observable::new(0);
        let count = Rc::new(Cell::new(0u32));
        let c = Rc::clone(&count);
        let _sub = obs.subscribe(move |_| c.set(c.get() + 1));

        {
            let _outer = BatchScope::new();
            {
                let _inner = BatchScope::new();
                obs.set(1);
            }
            assert_eq!(count.get(), 0);
            assert!(is_batching());
        }
        assert_eq!(count.get(), 1);
        assert!(!is_batching());
    }

    #[test]
    fn defer_or_run_without_batch_runs_now() {
        let hit = Rc::new(Cell::new(false));
        let h = Rc::clone(&hit);
        assert!(!defer_or_run(move || h.set(true)));
        assert!(hit.get());
    }

    #[test]
    fn keyed_entries_keep_first_position_latest_callback() {
        let log = Rc::new(RefCell::new(Vec::new()));
        {
            let batch = BatchScope::new();
            for (key, tag) in [(1, "a1"), (2, "b"), (1, "a2")] {
                let log = Rc::clone(&log);
                defer_or_run_keyed(key, move || log.borrow_mut().push(tag));
            }
            assert_eq!(batch.pending_count(), 2);
        }
        assert_eq!(*log.borrow(), vec!["a2", "b"]);
    }

    #[test]
    fn two_observables_one_flush() {
        let a = Observable::new(0);
        let b = Observable::new(String::new());
        let order = Rc::new(RefCell::new(Vec::new()));
        let (oa, ob) = (Rc::clone(&order), Rc::clone(&order));
        let _sa = a.subscribe(move |v| oa.borrow_mut().push(format!("a={v}")));
        let _sb = b.subscribe(move |v| ob.borrow_mut().push(format!("b={v}")));

        {
            let _batch = BatchScope::new();
            b.set("x".into());
            a.set(1);
            a.set(2);
        }
        assert_eq!(*order.borrow(), vec!["b=x", "a=2"]);
    }

    #[test]
    fn writes_during_flush_are_delivered() {
        let source = Observable::new(0);
        let mirror = Observable::new(0);
        let seen = Rc::new(Cell::new(0));

        let target = mirror.clone();
        let _forward = source.subscribe(move |v| target.set(*v * 10));
        let s = Rc::clone(&seen);
        let _watch = mirror.subscribe(move |v| s.set(*v));

        {
            let _batch = BatchScope::new();
            source.set(4);
        }
        assert_eq!(seen.get(), 40);
        assert!(!is_batching());
    }

    #[test]
    fn panicking_callback_does_not_starve_others() {
        let obs = Observable::new(0);
        let reached = Rc::new(Cell::new(false));
        let r = Rc::clone(&reached);
        let _bad = obs.subscribe(|_| panic!("observer failed"));
        let _good = obs.subscribe(move |_| r.set(true));

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _batch = BatchScope::new();
            obs.set(1);
        }));
        assert!(result.is_err());
        assert!(reached.get());
        assert!(!is_batching());
    }

    #[test]
    fn empty_batch_is_harmless() {
        let batch = BatchScope::new();
        assert_eq!(batch.pending_count(), 0);
        drop(batch);
        assert!(!is_batching());
    }
}
