//! Application foreground/background lifecycle
//!
//! Appearance notifications can be withheld while the process is suspended,
//! so consumers re-poll the system when the app comes back to the foreground.

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::subscription::{Callback, Listeners, Subscription};
use crate::PlatformError;

/// Foreground state of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppLifecycleState {
    /// The app is in the foreground and receiving input
    #[default]
    Active,
    /// The app is backgrounded, suspended, or otherwise not active
    Background,
}

impl AppLifecycleState {
    /// Check if the app is in the foreground
    pub fn is_active(&self) -> bool {
        matches!(self, AppLifecycleState::Active)
    }
}

impl std::str::FromStr for AppLifecycleState {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(AppLifecycleState::Active),
            // iOS reports "inactive" during transitions; treat it as not active
            "background" | "inactive" => Ok(AppLifecycleState::Background),
            _ => Err(PlatformError::UnknownLifecycleState(s.to_string())),
        }
    }
}

/// Callback receiving lifecycle changes
pub type LifecycleCallback = Callback<AppLifecycleState>;

/// Host adapter for foreground/background notifications
pub trait LifecycleSource: Send + Sync {
    /// The current lifecycle state
    fn current(&self) -> AppLifecycleState;

    /// Register for lifecycle changes
    fn on_change(&self, callback: LifecycleCallback) -> Subscription;
}

/// Lifecycle source driven by explicit calls
#[derive(Default)]
pub struct ManualLifecycleSource {
    current: RwLock<AppLifecycleState>,
    listeners: Listeners<AppLifecycleState>,
}

impl ManualLifecycleSource {
    /// Create a source starting in `initial`
    pub fn new(initial: AppLifecycleState) -> Self {
        Self { current: RwLock::new(initial), listeners: Listeners::new() }
    }

    /// Record a lifecycle change and notify listeners
    pub fn set(&self, state: AppLifecycleState) {
        *self.current.write() = state;
        self.listeners.emit(state);
    }

    /// Move to the background
    pub fn background(&self) {
        self.set(AppLifecycleState::Background);
    }

    /// Return to the foreground
    pub fn foreground(&self) {
        self.set(AppLifecycleState::Active);
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl LifecycleSource for ManualLifecycleSource {
    fn current(&self) -> AppLifecycleState {
        *self.current.read()
    }

    fn on_change(&self, callback: LifecycleCallback) -> Subscription {
        self.listeners.add(callback)
    }
}

/// Watches foreground/background transitions
#[derive(Clone)]
pub struct AppLifecycleWatcher {
    source: Arc<dyn LifecycleSource>,
}

impl AppLifecycleWatcher {
    /// Create a watcher over a platform source
    pub fn new(source: Arc<dyn LifecycleSource>) -> Self {
        Self { source }
    }

    /// The current lifecycle state
    pub fn current(&self) -> AppLifecycleState {
        self.source.current()
    }

    /// Subscribe to every lifecycle change
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(AppLifecycleState) + Send + Sync + 'static,
    {
        self.source.on_change(Arc::new(callback))
    }

    /// Subscribe to transitions into the foreground
    ///
    /// Fires only when the state moves from a non-active state to
    /// [`AppLifecycleState::Active`].
    pub fn on_foreground<F>(&self, callback: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let previous = Mutex::new(self.source.current());

        self.subscribe(move |state| {
            let was_active = {
                let mut previous = previous.lock();
                std::mem::replace(&mut *previous, state).is_active()
            };

            if state.is_active() && !was_active {
                tracing::debug!("Application returned to foreground");
                callback();
            }
        })
    }
}
