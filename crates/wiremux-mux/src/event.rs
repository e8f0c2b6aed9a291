use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Handle for removing a previously registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription(u64);

type Callback<T> = Arc<dyn Fn(T) + Send + Sync>;

/// A subscriber list fired synchronously in registration order.
///
/// Emission iterates over a snapshot of the list, so listeners may
/// unsubscribe themselves (or others) from inside a dispatch without
/// invalidating the iteration.
pub struct Signal<T> {
    listeners: Mutex<Vec<(u64, Callback<T>)>>,
    next_id: AtomicU64,
}

impl<T: Clone> Signal<T> {
    pub fn new() -> Self {
        Self {
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a listener; returns the handle that removes it.
    pub fn subscribe(&self, listener: impl Fn(T) + Send + Sync + 'static) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock().push((id, Arc::new(listener)));
        Subscription(id)
    }

    /// Remove a listener. Unknown handles are ignored.
    pub fn unsubscribe(&self, subscription: Subscription) {
        self.lock().retain(|(id, _)| *id != subscription.0);
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no listeners are registered.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Invoke every listener with a clone of `value`.
    pub fn emit(&self, value: T) {
        let snapshot: Vec<Callback<T>> = self
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in snapshot {
            listener(value.clone());
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(u64, Callback<T>)>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self
            .listeners
            .lock()
            .map(|listeners| listeners.len())
            .unwrap_or(0);
        f.debug_struct("Signal").field("listeners", &count).finish()
    }
}
