//! Operating system appearance (light/dark) signal
//!
//! The host platform owns the appearance setting. This module defines the
//! contract a host adapter implements ([`AppearanceSource`]), an in-process
//! source the host can push values into ([`ManualAppearanceSource`]), and the
//! [`SystemAppearanceWatcher`] the theme store consumes.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::subscription::{Callback, Listeners, Subscription};
use crate::PlatformError;

/// The operating system's current appearance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemAppearance {
    /// The system reports a light appearance
    Light,
    /// The system reports a dark appearance
    Dark,
    /// The system did not report an appearance
    #[default]
    Unknown,
}

impl SystemAppearance {
    /// Map a raw platform value; missing or unrecognized values are `Unknown`
    pub fn from_platform(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.parse().ok())
            .unwrap_or(SystemAppearance::Unknown)
    }

    /// Get the string form
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemAppearance::Light => "light",
            SystemAppearance::Dark => "dark",
            SystemAppearance::Unknown => "unknown",
        }
    }

    /// Check if the system explicitly reports dark
    pub fn is_dark(&self) -> bool {
        matches!(self, SystemAppearance::Dark)
    }
}

impl std::fmt::Display for SystemAppearance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SystemAppearance {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(SystemAppearance::Light),
            "dark" => Ok(SystemAppearance::Dark),
            "unknown" => Ok(SystemAppearance::Unknown),
            _ => Err(PlatformError::UnknownAppearance(s.to_string())),
        }
    }
}

/// Callback receiving appearance changes
pub type AppearanceCallback = Callback<SystemAppearance>;

/// Host adapter for the operating system appearance setting
pub trait AppearanceSource: Send + Sync {
    /// Read the current appearance directly from the system
    fn current(&self) -> SystemAppearance;

    /// Register for change notifications
    ///
    /// Platforms may suppress notifications while the app is backgrounded.
    fn on_change(&self, callback: AppearanceCallback) -> Subscription;
}

/// Appearance source driven by explicit calls
///
/// Hosts that receive appearance changes through FFI push them here. Tests
/// use [`ManualAppearanceSource::set_silently`] to model a platform that
/// changed appearance without delivering a notification.
#[derive(Default)]
pub struct ManualAppearanceSource {
    current: RwLock<SystemAppearance>,
    listeners: Listeners<SystemAppearance>,
}

impl ManualAppearanceSource {
    /// Create a source reporting `initial`
    pub fn new(initial: SystemAppearance) -> Self {
        Self { current: RwLock::new(initial), listeners: Listeners::new() }
    }

    /// Change the appearance and notify listeners
    pub fn set(&self, appearance: SystemAppearance) {
        *self.current.write() = appearance;
        self.listeners.emit(appearance);
    }

    /// Change the appearance without notifying listeners
    pub fn set_silently(&self, appearance: SystemAppearance) {
        *self.current.write() = appearance;
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl AppearanceSource for ManualAppearanceSource {
    fn current(&self) -> SystemAppearance {
        *self.current.read()
    }

    fn on_change(&self, callback: AppearanceCallback) -> Subscription {
        self.listeners.add(callback)
    }
}

/// Watches the operating system appearance
#[derive(Clone)]
pub struct SystemAppearanceWatcher {
    source: Arc<dyn AppearanceSource>,
}

impl SystemAppearanceWatcher {
    /// Create a watcher over a platform source
    pub fn new(source: Arc<dyn AppearanceSource>) -> Self {
        Self { source }
    }

    /// Poll the current appearance
    pub fn current(&self) -> SystemAppearance {
        self.source.current()
    }

    /// Subscribe to appearance changes
    ///
    /// Every delivery is forwarded, including repeats; consumers compare
    /// against the value they last applied.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(SystemAppearance) + Send + Sync + 'static,
    {
        self.source.on_change(Arc::new(move |appearance| {
            tracing::debug!("System appearance reported as {}", appearance);
            callback(appearance);
        }))
    }
}
