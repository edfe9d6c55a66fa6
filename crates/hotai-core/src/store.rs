//! Observable in-memory state container.
//!
//! A [`Store`] holds one value and notifies registered observers
//! synchronously, in subscription order, every time the value is replaced.
//! Persistence is not special-cased: it is an ordinary observer registered
//! by the infrastructure layer.
//!
//! ```ignore
//! let store = Store::new(Settings::default());
//! let sub = store.subscribe(|s: &Settings| println!("model = {:?}", s.model));
//! store.update(|s| s.model = Some("gpt-4o".into()))?;
//! sub.unsubscribe();
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};
use std::thread::{self, ThreadId};

use crate::error::Result;

/// Receives every value a store takes on.
///
/// Returning an error does not stop delivery to the remaining observers; the
/// first error is handed back to the caller of [`Store::set`].
pub trait StoreObserver<T>: Send + Sync {
    fn on_change(&self, value: &T) -> Result<()>;
}

struct FnObserver<F>(F);

impl<T, F> StoreObserver<T> for FnObserver<F>
where
    F: Fn(&T) + Send + Sync,
{
    fn on_change(&self, value: &T) -> Result<()> {
        (self.0)(value);
        Ok(())
    }
}

type ObserverList<T> = Vec<(u64, Arc<dyn StoreObserver<T>>)>;

struct Inner<T> {
    value: RwLock<T>,
    observers: RwLock<ObserverList<T>>,
    next_id: AtomicU64,
    /// Serializes writers so observers see values in write order.
    write_gate: Mutex<()>,
    /// Thread currently holding `write_gate`
    gate_owner: Mutex<Option<ThreadId>>,
}

/// Held for the duration of a write and its notifications.
struct WriteGate<'a> {
    owner: &'a Mutex<Option<ThreadId>>,
    _guard: MutexGuard<'a, ()>,
}

impl Drop for WriteGate<'_> {
    fn drop(&mut self) {
        *self.owner.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// Shared handle to an observable value. Clones refer to the same store.
///
/// Writes are last-write-wins; no merging is attempted. Observers may read
/// the store and subscribe to it while being notified, but must not write to
/// the store that is notifying them.
pub struct Store<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Store<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(Inner {
                value: RwLock::new(initial),
                observers: RwLock::new(Vec::new()),
                next_id: AtomicU64::new(0),
                write_gate: Mutex::new(()),
                gate_owner: Mutex::new(None),
            }),
        }
    }

    /// Returns a copy of the current value.
    pub fn get(&self) -> T {
        self.read_value().clone()
    }

    /// Runs `f` against the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.read_value())
    }

    /// Replaces the value and notifies every observer before returning.
    pub fn set(&self, value: T) -> Result<()> {
        let _gate = self.enter_gate();
        let snapshot = value.clone();
        *self.write_value() = value;
        self.notify(&snapshot)
    }

    /// Applies `f` to a copy of the current value, stores the result, then
    /// notifies like [`Store::set`]. `f` may read the store.
    pub fn update(&self, f: impl FnOnce(&mut T)) -> Result<()> {
        let _gate = self.enter_gate();
        let mut next = self.get();
        f(&mut next);
        *self.write_value() = next.clone();
        self.notify(&next)
    }

    /// Registers a callback, invokes it once with the current value and then
    /// on every change until the returned handle is unsubscribed.
    pub fn subscribe<F>(&self, callback: F) -> Subscription<T>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let observer: Arc<dyn StoreObserver<T>> = Arc::new(FnObserver(callback));
        let (subscription, _) = self.register(observer, true);
        subscription
    }

    /// Registers a fallible observer. The initial delivery of the current
    /// value is reported through the returned result; the observer stays
    /// registered either way.
    pub fn observe(&self, observer: Arc<dyn StoreObserver<T>>) -> (Subscription<T>, Result<()>) {
        self.register(observer, true)
    }

    /// Registers a fallible observer that only sees future changes.
    pub fn attach(&self, observer: Arc<dyn StoreObserver<T>>) -> Subscription<T> {
        let (subscription, _) = self.register(observer, false);
        subscription
    }

    fn register(
        &self,
        observer: Arc<dyn StoreObserver<T>>,
        deliver_current: bool,
    ) -> (Subscription<T>, Result<()>) {
        // A callback subscribing during notification already holds the gate
        let _gate = (!self.gate_held_here()).then(|| self.enter_gate());
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::clone(&observer)));

        let initial = if deliver_current {
            observer.on_change(&self.get())
        } else {
            Ok(())
        };
        (
            Subscription {
                id,
                store: Arc::downgrade(&self.inner),
            },
            initial,
        )
    }

    fn enter_gate(&self) -> WriteGate<'_> {
        let guard = self.inner.write_gate.lock().unwrap_or_else(PoisonError::into_inner);
        *self.inner.gate_owner.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(thread::current().id());
        WriteGate {
            owner: &self.inner.gate_owner,
            _guard: guard,
        }
    }

    fn gate_held_here(&self) -> bool {
        *self.inner.gate_owner.lock().unwrap_or_else(PoisonError::into_inner)
            == Some(thread::current().id())
    }

    fn notify(&self, value: &T) -> Result<()> {
        let observers: Vec<Arc<dyn StoreObserver<T>>> = self
            .inner
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, o)| Arc::clone(o))
            .collect();

        let mut first_error = None;
        for observer in observers {
            if let Err(e) = observer.on_change(value) {
                tracing::error!("[Store] Observer failed: {}", e);
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn read_value(&self) -> std::sync::RwLockReadGuard<'_, T> {
        self.inner.value.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_value(&self) -> std::sync::RwLockWriteGuard<'_, T> {
        self.inner.value.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Default + Clone + Send + Sync + 'static> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Handle returned by [`Store::subscribe`] and [`Store::observe`].
///
/// Dropping the handle keeps the observer registered; call
/// [`Subscription::unsubscribe`] to remove it.
pub struct Subscription<T> {
    id: u64,
    store: Weak<Inner<T>>,
}

impl<T> Subscription<T> {
    pub fn unsubscribe(self) {
        if let Some(inner) = self.store.upgrade() {
            inner
                .observers
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HotaiError;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str) -> Box<dyn Fn(&i32) + Send + Sync>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let log_for_factory = Arc::clone(&log);
        let factory = move |tag: &str| -> Box<dyn Fn(&i32) + Send + Sync> {
            let log = Arc::clone(&log_for_factory);
            let tag = tag.to_string();
            Box::new(move |v: &i32| log.lock().unwrap().push(format!("{}:{}", tag, v)))
        };
        (log, factory)
    }

    struct FailingObserver;

    impl StoreObserver<i32> for FailingObserver {
        fn on_change(&self, _value: &i32) -> Result<()> {
            Err(HotaiError::storage("disk gone"))
        }
    }

    #[test]
    fn test_subscribe_delivers_current_value_immediately() {
        let store = Store::new(7);
        let (log, make) = recorder();
        let _sub = store.subscribe(make("a"));
        assert_eq!(*log.lock().unwrap(), vec!["a:7"]);
    }

    #[test]
    fn test_notifications_in_subscription_order() {
        let store = Store::new(0);
        let (log, make) = recorder();
        let _a = store.subscribe(make("a"));
        let _b = store.subscribe(make("b"));
        log.lock().unwrap().clear();

        store.set(1).unwrap();
        store.update(|v| *v += 1).unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["a:1", "b:1", "a:2", "b:2"]);
        assert_eq!(store.get(), 2);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let store = Store::new(0);
        let (log, make) = recorder();
        let sub = store.subscribe(make("a"));
        sub.unsubscribe();

        store.set(5).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["a:0"]);
    }

    #[test]
    fn test_last_write_wins() {
        let store = Store::new(String::new());
        store.set("first".to_string()).unwrap();
        store.set("second".to_string()).unwrap();
        assert_eq!(store.get(), "second");
        assert_eq!(store.with(|s| s.len()), 6);
    }

    #[test]
    fn test_failing_observer_reports_error_but_others_still_notified() {
        let store = Store::new(0);
        let (sub, initial) = store.observe(Arc::new(FailingObserver));
        assert!(initial.is_err());
        let (log, make) = recorder();
        let _after = store.subscribe(make("b"));

        let result = store.set(3);
        assert!(result.unwrap_err().is_storage());
        assert_eq!(store.get(), 3);
        assert_eq!(*log.lock().unwrap(), vec!["b:0", "b:3"]);

        sub.unsubscribe();
        assert!(store.set(4).is_ok());
    }

    #[test]
    fn test_attach_skips_current_value() {
        let store = Store::new(0);
        let sub = store.attach(Arc::new(FailingObserver));
        assert!(store.set(1).is_err());
        sub.unsubscribe();
        assert!(store.set(2).is_ok());
    }

    #[test]
    fn test_clones_share_state() {
        let store = Store::new(1);
        let other = store.clone();
        other.set(9).unwrap();
        assert_eq!(store.get(), 9);
    }

    #[test]
    fn test_observer_may_read_store_during_notification() {
        let store = Store::new(0);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let reader = store.clone();
        let seen_in_cb = Arc::clone(&seen);
        let _sub = store.subscribe(move |_| seen_in_cb.lock().unwrap().push(reader.get()));
        store.set(42).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![0, 42]);
    }

    #[test]
    fn test_observer_may_subscribe_during_notification() {
        let (done_tx, done_rx) = std::sync::mpsc::channel();
        thread::spawn(move || {
            let store = Store::new(0);
            let (log, make) = recorder();
            let inner = store.clone();
            let late = Arc::new(Mutex::new(None));
            let late_in_cb = Arc::clone(&late);
            let _sub = store.subscribe(move |v| {
                if *v == 1 {
                    *late_in_cb.lock().unwrap() = Some(inner.subscribe(make("late")));
                }
            });
            store.set(1).unwrap();
            store.set(2).unwrap();
            let _ = done_tx.send(log.lock().unwrap().clone());
        });

        let log = done_rx
            .recv_timeout(std::time::Duration::from_secs(5))
            .expect("subscribing from a callback should not block");
        assert_eq!(log, vec!["late:1", "late:2"]);
    }

    #[test]
    fn test_update_closure_may_read_store() {
        let store = Store::new(10);
        let reader = store.clone();
        store.update(|v| *v = reader.get() * 2).unwrap();
        assert_eq!(store.get(), 20);
    }

    #[test]
    fn test_update_notifies_with_new_value() {
        let store = Store::new(1);
        let (log, make) = recorder();
        let _sub = store.subscribe(make("a"));
        store.update(|v| *v += 4).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["a:1", "a:5"]);
    }
}
