//! Appearance state for MoodNote
//!
//! [`ThemeStore`] owns the user's [`ThemeMode`], the last known
//! [`SystemAppearance`], and the [`ThemeSnapshot`] every screen renders from.
//! It loads the persisted mode on [`ThemeStore::init`], follows the system
//! appearance while in `FollowSystem` mode, re-polls the system when the app
//! returns to the foreground, and serializes user mode changes through a
//! [`TransitionGuard`].
//!
//! No snapshot is published until the persisted mode has been loaded (or the
//! load timed out), so the first frame never renders in the wrong appearance.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use app_platform::{ManualAppearanceSource, ManualLifecycleSource, SystemAppearance};
//! use app_state::{ThemeStore, ThemeStoreConfig, TransitionOutcome};
//! use storage::{MemoryStorage, ThemeMode};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = ThemeStore::new(
//!     ThemeStoreConfig::default(),
//!     Arc::new(MemoryStorage::new()),
//!     Arc::new(ManualAppearanceSource::new(SystemAppearance::Dark)),
//!     Arc::new(ManualLifecycleSource::default()),
//! );
//! assert!(store.snapshot().is_none());
//!
//! store.init().await;
//! assert!(store.snapshot().unwrap().is_dark);
//!
//! let outcome = store.set_mode(ThemeMode::Light).await;
//! assert_eq!(outcome, TransitionOutcome::Applied(ThemeMode::Light));
//! # }
//! ```

use app_platform::{
    AppLifecycleWatcher, AppearanceSource, LifecycleSource, Subscription, SystemAppearance,
    SystemAppearanceWatcher,
};
use app_ui::theme::{mode_options, status_description, ModeCycler, ModeOption, ModePresentation};
use app_ui::{ResolvedAppearance, ThemeTokens};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::sync::{Arc, Weak};
use std::time::Duration;
use storage::{DurableStorage, ThemeMode, ThemePreference, ThemePreferenceGateway, THEME_MODE_KEY};
use tokio::sync::watch;

use crate::transition::{GuardOutcome, TransitionGuard, DEFAULT_DEBOUNCE};

/// Default bound on the initial preference load (2 seconds)
pub const DEFAULT_INIT_TIMEOUT: Duration = Duration::from_secs(2);

// =============================================================================
// Configuration
// =============================================================================

/// Theme store configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeStoreConfig {
    /// Storage key for the persisted mode
    pub storage_key: String,
    /// Window after a mode change during which further changes are dropped
    pub debounce: Duration,
    /// How long [`ThemeStore::init`] waits for storage before using defaults
    pub init_timeout: Duration,
    /// Mode used when nothing valid is stored
    pub default_mode: ThemeMode,
    /// Render dark when following the system and the system reports nothing
    pub unknown_is_dark: bool,
}

impl Default for ThemeStoreConfig {
    fn default() -> Self {
        Self {
            storage_key: THEME_MODE_KEY.to_string(),
            debounce: DEFAULT_DEBOUNCE,
            init_timeout: DEFAULT_INIT_TIMEOUT,
            default_mode: ThemeMode::FollowSystem,
            unknown_is_dark: false,
        }
    }
}

impl ThemeStoreConfig {
    /// Set the storage key
    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Set the debounce window
    pub fn debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Set the initial load timeout
    pub fn init_timeout(mut self, timeout: Duration) -> Self {
        self.init_timeout = timeout;
        self
    }

    /// Set the fallback mode
    pub fn default_mode(mut self, mode: ThemeMode) -> Self {
        self.default_mode = mode;
        self
    }

    /// Set how an unknown system appearance resolves
    pub fn unknown_is_dark(mut self, dark: bool) -> Self {
        self.unknown_is_dark = dark;
        self
    }
}

// =============================================================================
// Public Types
// =============================================================================

/// Store lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    /// Constructed, `init` not called yet
    Uninitialized,
    /// Waiting for the persisted mode
    Loading,
    /// Snapshots are being published
    Ready,
}

/// What every screen renders from
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeSnapshot {
    /// Render dark
    pub is_dark: bool,
    /// The user's selected mode
    pub mode: ThemeMode,
    /// Whether the mode follows the system
    pub is_system_following: bool,
    /// Tokens for the resolved appearance
    pub tokens: &'static ThemeTokens,
}

impl ThemeSnapshot {
    fn resolve(mode: ThemeMode, system: SystemAppearance, unknown_is_dark: bool) -> Self {
        let resolved = ResolvedAppearance::with_fallback(mode, system, unknown_is_dark);
        Self {
            is_dark: resolved.is_dark,
            mode,
            is_system_following: mode.is_system_following(),
            tokens: resolved.tokens,
        }
    }
}

/// Result of a mode change request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The mode changed
    Applied(ThemeMode),
    /// The requested mode was already active
    Unchanged,
    /// Another change was in flight or its debounce window had not elapsed
    Rejected,
    /// The store is not ready or has been disposed
    NotReady,
}

impl TransitionOutcome {
    /// Check if the mode changed
    pub fn is_applied(&self) -> bool {
        matches!(self, TransitionOutcome::Applied(_))
    }
}

/// Everything the settings screen shows about the current appearance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeStatus {
    /// Selected mode
    pub mode: ThemeMode,
    /// Render dark
    pub is_dark: bool,
    /// Whether the mode follows the system
    pub is_system_following: bool,
    /// Whether a mode change is in flight
    pub is_transitioning: bool,
    /// Mode name
    pub display_name: &'static str,
    /// Mode icon
    pub icon: &'static str,
    /// Mode description
    pub description: &'static str,
    /// Status line, including the live appearance under `FollowSystem`
    pub status_description: String,
}

// =============================================================================
// Store
// =============================================================================

struct StoreState {
    lifecycle: Lifecycle,
    preference: ThemePreference,
    system: SystemAppearance,
    disposed: bool,
}

struct StoreInner {
    config: ThemeStoreConfig,
    gateway: ThemePreferenceGateway,
    appearance: SystemAppearanceWatcher,
    lifecycle: AppLifecycleWatcher,
    guard: TransitionGuard,
    state: RwLock<StoreState>,
    snapshot_tx: watch::Sender<Option<ThemeSnapshot>>,
    subscriptions: Mutex<Vec<Subscription>>,
}

impl StoreInner {
    fn is_accepting(&self) -> bool {
        let state = self.state.read();
        state.lifecycle == Lifecycle::Ready && !state.disposed
    }

    fn publish(&self, state: &StoreState) {
        let snapshot =
            ThemeSnapshot::resolve(state.preference.mode, state.system, self.config.unknown_is_dark);
        self.snapshot_tx.send_replace(Some(snapshot));
    }

    fn apply_system_signal(&self, signal: SystemAppearance) {
        let mut state = self.state.write();
        if state.disposed || state.system == signal {
            return;
        }
        state.system = signal;

        if state.lifecycle != Lifecycle::Ready {
            tracing::debug!("Cached system appearance {} until ready", signal);
            return;
        }
        if !state.preference.mode.is_system_following() {
            tracing::debug!(
                "System appearance {} ignored in {} mode",
                signal,
                state.preference.mode
            );
            return;
        }

        self.publish(&state);
    }

    fn refresh_system_signal(&self) {
        let polled = self.appearance.current();
        tracing::debug!("Re-polled system appearance on resume: {}", polled);
        self.apply_system_signal(polled);
    }

    async fn apply_mode(&self, select: impl FnOnce(ThemeMode) -> ThemeMode) -> TransitionOutcome {
        let (previous, target) = {
            let mut state = self.state.write();
            if state.lifecycle != Lifecycle::Ready || state.disposed {
                return TransitionOutcome::NotReady;
            }
            let previous = state.preference.mode;
            let target = select(previous);
            if target == previous {
                return TransitionOutcome::Unchanged;
            }
            state.preference = ThemePreference::changed(target);
            (previous, target)
        };

        // Persist before publishing; a failed write leaves the new mode in place
        if let Err(e) = self.gateway.save(target).await {
            tracing::warn!("Failed to persist theme mode {}: {}", target, e);
        }

        {
            let state = self.state.read();
            if state.preference.mode == target {
                self.publish(&state);
            }
        }

        tracing::info!("Theme mode changed from {} to {}", previous, target);
        TransitionOutcome::Applied(target)
    }
}

/// Appearance state shared by every screen
///
/// Cloning is cheap; clones share state.
#[derive(Clone)]
pub struct ThemeStore {
    inner: Arc<StoreInner>,
}

impl std::fmt::Debug for ThemeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeStore")
            .field("lifecycle", &self.lifecycle())
            .field("snapshot", &self.snapshot())
            .finish()
    }
}

impl ThemeStore {
    /// Create an uninitialized store
    pub fn new(
        config: ThemeStoreConfig,
        storage: Arc<dyn DurableStorage>,
        appearance_source: Arc<dyn AppearanceSource>,
        lifecycle_source: Arc<dyn LifecycleSource>,
    ) -> Self {
        let gateway = ThemePreferenceGateway::with_key(storage, config.storage_key.clone());
        let guard = TransitionGuard::new(config.debounce);
        let (snapshot_tx, _) = watch::channel(None);

        let state = StoreState {
            lifecycle: Lifecycle::Uninitialized,
            preference: ThemePreference::restored(config.default_mode),
            system: SystemAppearance::Unknown,
            disposed: false,
        };

        Self {
            inner: Arc::new(StoreInner {
                config,
                gateway,
                appearance: SystemAppearanceWatcher::new(appearance_source),
                lifecycle: AppLifecycleWatcher::new(lifecycle_source),
                guard,
                state: RwLock::new(state),
                snapshot_tx,
                subscriptions: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Create a store with the default configuration
    pub fn with_defaults(
        storage: Arc<dyn DurableStorage>,
        appearance_source: Arc<dyn AppearanceSource>,
        lifecycle_source: Arc<dyn LifecycleSource>,
    ) -> Self {
        Self::new(ThemeStoreConfig::default(), storage, appearance_source, lifecycle_source)
    }

    /// The store's configuration
    pub fn config(&self) -> &ThemeStoreConfig {
        &self.inner.config
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Load the persisted mode and start publishing snapshots
    ///
    /// Watchers are attached before the load starts, so a system change that
    /// arrives while loading is applied to the first snapshot. A load that
    /// fails, returns an invalid value, or exceeds the configured timeout
    /// falls back to the default mode. Only the first call has any effect.
    pub async fn init(&self) {
        {
            let mut state = self.inner.state.write();
            if state.lifecycle != Lifecycle::Uninitialized || state.disposed {
                return;
            }
            state.lifecycle = Lifecycle::Loading;
        }

        self.attach_watchers();
        self.inner.apply_system_signal(self.inner.appearance.current());

        let config = &self.inner.config;
        let loaded = tokio::time::timeout(config.init_timeout, self.inner.gateway.load()).await;
        let mode = match loaded {
            Ok(Ok(Some(mode))) => mode,
            Ok(Ok(None)) => {
                tracing::debug!("No stored theme mode, using {}", config.default_mode);
                config.default_mode
            }
            Ok(Err(e)) => {
                tracing::warn!("Failed to load theme mode, using {}: {}", config.default_mode, e);
                config.default_mode
            }
            Err(_) => {
                tracing::warn!(
                    "Loading theme mode timed out after {:?}, using {}",
                    config.init_timeout,
                    config.default_mode
                );
                config.default_mode
            }
        };

        let mut state = self.inner.state.write();
        state.preference = ThemePreference::restored(mode);
        state.lifecycle = Lifecycle::Ready;
        self.inner.publish(&state);
        tracing::info!("Theme store ready in {} mode (system: {})", mode, state.system);
    }

    fn attach_watchers(&self) {
        let weak: Weak<StoreInner> = Arc::downgrade(&self.inner);
        let appearance = self.inner.appearance.subscribe(move |signal| {
            if let Some(inner) = weak.upgrade() {
                inner.apply_system_signal(signal);
            }
        });

        let weak: Weak<StoreInner> = Arc::downgrade(&self.inner);
        let foreground = self.inner.lifecycle.on_foreground(move || {
            if let Some(inner) = weak.upgrade() {
                inner.refresh_system_signal();
            }
        });

        self.inner.subscriptions.lock().extend([appearance, foreground]);
    }

    /// Detach from the platform watchers
    ///
    /// The last snapshot stays readable; mode changes return
    /// [`TransitionOutcome::NotReady`] afterwards.
    pub fn dispose(&self) {
        self.inner.state.write().disposed = true;
        let subscriptions = std::mem::take(&mut *self.inner.subscriptions.lock());
        let detached = subscriptions.len();
        drop(subscriptions);
        tracing::debug!("Theme store disposed, detached {} watchers", detached);
    }

    /// Current lifecycle state
    pub fn lifecycle(&self) -> Lifecycle {
        self.inner.state.read().lifecycle
    }

    /// Check if snapshots are available
    pub fn is_ready(&self) -> bool {
        self.lifecycle() == Lifecycle::Ready
    }

    /// Check if the store has been disposed
    pub fn is_disposed(&self) -> bool {
        self.inner.state.read().disposed
    }

    // =========================================================================
    // Consumer Accessors
    // =========================================================================

    /// The current snapshot, `None` until ready
    pub fn snapshot(&self) -> Option<ThemeSnapshot> {
        *self.inner.snapshot_tx.borrow()
    }

    /// Receive every published snapshot
    ///
    /// Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> watch::Receiver<Option<ThemeSnapshot>> {
        self.inner.snapshot_tx.subscribe()
    }

    /// The stored preference, `None` until ready
    pub fn preference(&self) -> Option<ThemePreference> {
        let state = self.inner.state.read();
        (state.lifecycle == Lifecycle::Ready).then_some(state.preference)
    }

    /// The last system appearance seen
    pub fn system_appearance(&self) -> SystemAppearance {
        self.inner.state.read().system
    }

    /// Check if a mode change would be accepted right now
    pub fn can_switch(&self) -> bool {
        self.inner.is_accepting() && !self.inner.guard.is_busy()
    }

    /// Settings screen status, `None` until ready
    pub fn status(&self) -> Option<ThemeStatus> {
        let snapshot = self.snapshot()?;
        let mode = snapshot.mode;
        Some(ThemeStatus {
            mode,
            is_dark: snapshot.is_dark,
            is_system_following: snapshot.is_system_following,
            is_transitioning: self.inner.guard.is_busy(),
            display_name: mode.display_name(),
            icon: mode.icon(),
            description: mode.description(),
            status_description: status_description(mode, snapshot.is_dark),
        })
    }

    /// Every mode with its labels, marking the active one
    pub fn available_modes(&self) -> Vec<ModeOption> {
        mode_options(self.inner.state.read().preference.mode)
    }

    // =========================================================================
    // Mode Changes
    // =========================================================================

    /// Switch to `mode`
    pub async fn set_mode(&self, mode: ThemeMode) -> TransitionOutcome {
        self.transition(move |_| mode).await
    }

    /// Advance to the next mode in the cycle
    pub async fn toggle_next(&self) -> TransitionOutcome {
        self.transition(ModeCycler::next).await
    }

    /// Step back to the previous mode in the cycle
    pub async fn toggle_previous(&self) -> TransitionOutcome {
        self.transition(ModeCycler::previous).await
    }

    /// Switch back to the configured default mode
    pub async fn reset_to_default(&self) -> TransitionOutcome {
        self.set_mode(self.inner.config.default_mode).await
    }

    async fn transition<F>(&self, select: F) -> TransitionOutcome
    where
        F: Fn(ThemeMode) -> ThemeMode,
    {
        {
            let state = self.inner.state.read();
            if state.lifecycle != Lifecycle::Ready || state.disposed {
                tracing::debug!("Theme change ignored: store is not ready");
                return TransitionOutcome::NotReady;
            }
            // A request for the active mode never engages the guard
            let current = state.preference.mode;
            if select(current) == current {
                return TransitionOutcome::Unchanged;
            }
        }

        let inner = &self.inner;
        match inner.guard.guard(|| inner.apply_mode(&select)).await {
            GuardOutcome::Completed(outcome) => outcome,
            GuardOutcome::Rejected => {
                tracing::debug!("Theme change rejected: a transition is in flight");
                TransitionOutcome::Rejected
            }
        }
    }
}
