//! Callback registration handles
//!
//! Every platform notification channel hands out a [`Subscription`]. The
//! callback stays registered until the handle is dropped or
//! [`Subscription::unsubscribe`] is called.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, Weak};

/// A registered callback
pub type Callback<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Handle for a registered callback
///
/// When dropped, the callback is unregistered.
#[must_use = "dropping a Subscription unregisters its callback"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Create a subscription that runs `unsubscribe` when released
    pub fn new(unsubscribe: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self { unsubscribe: Some(Box::new(unsubscribe)) }
    }

    /// A subscription with nothing to release
    pub fn empty() -> Self {
        Self { unsubscribe: None }
    }

    /// Unregister the callback now
    pub fn unsubscribe(mut self) {
        self.release();
    }

    /// Check if the callback is still registered through this handle
    pub fn is_active(&self) -> bool {
        self.unsubscribe.is_some()
    }

    fn release(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("active", &self.is_active()).finish()
    }
}

struct Registry<T> {
    next_id: u64,
    callbacks: HashMap<u64, Callback<T>>,
}

/// A set of callbacks that can all be notified with one value
pub struct Listeners<T> {
    registry: Arc<Mutex<Registry<T>>>,
}

impl<T: Clone + 'static> Listeners<T> {
    /// Create an empty listener set
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry { next_id: 0, callbacks: HashMap::new() })),
        }
    }

    /// Register a callback
    pub fn add(&self, callback: Callback<T>) -> Subscription {
        let id = {
            let mut registry = self.registry.lock();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.callbacks.insert(id, callback);
            id
        };

        let registry: Weak<Mutex<Registry<T>>> = Arc::downgrade(&self.registry);
        Subscription::new(move || {
            if let Some(registry) = registry.upgrade() {
                registry.lock().callbacks.remove(&id);
            }
        })
    }

    /// Deliver `value` to every registered callback
    ///
    /// Callbacks run outside the registry lock, so they may register or
    /// unregister listeners themselves.
    pub fn emit(&self, value: T) {
        let callbacks: Vec<Callback<T>> = self.registry.lock().callbacks.values().cloned().collect();
        for callback in callbacks {
            callback(value.clone());
        }
    }

    /// Number of registered callbacks
    pub fn len(&self) -> usize {
        self.registry.lock().callbacks.len()
    }

    /// Check if no callbacks are registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + 'static> Default for Listeners<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, Callback<u32>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let sink = hits.clone();
        let callback: Callback<u32> = Arc::new(move |value| {
            sink.fetch_add(value as usize, Ordering::SeqCst);
        });
        (hits, callback)
    }

    #[test]
    fn test_emit_reaches_all_listeners() {
        let listeners = Listeners::new();
        let (first, cb1) = counter();
        let (second, cb2) = counter();

        let _s1 = listeners.add(cb1);
        let _s2 = listeners.add(cb2);
        assert_eq!(listeners.len(), 2);

        listeners.emit(3);
        assert_eq!(first.load(Ordering::SeqCst), 3);
        assert_eq!(second.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let listeners = Listeners::new();
        let (hits, callback) = counter();

        let subscription = listeners.add(callback);
        drop(subscription);
        assert!(listeners.is_empty());

        listeners.emit(1);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_explicit_unsubscribe() {
        let listeners = Listeners::new();
        let (hits, callback) = counter();

        let subscription = listeners.add(callback);
        assert!(subscription.is_active());
        subscription.unsubscribe();

        listeners.emit(5);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_subscription_outliving_listeners() {
        let listeners = Listeners::new();
        let (_, callback) = counter();
        let subscription = listeners.add(callback);

        drop(listeners);
        // Releasing after the registry is gone must not panic
        drop(subscription);
    }

    #[test]
    fn test_empty_subscription() {
        let subscription = Subscription::empty();
        assert!(!subscription.is_active());
        subscription.unsubscribe();
    }
}
