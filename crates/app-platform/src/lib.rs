//! Platform signals for MoodNote
//!
//! This crate wraps the host platform's notification channels that the
//! appearance engine observes: the system light/dark setting and the app's
//! foreground/background lifecycle.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod appearance;
pub mod lifecycle;
pub mod subscription;

pub use appearance::{
    AppearanceCallback, AppearanceSource, ManualAppearanceSource, SystemAppearance,
    SystemAppearanceWatcher,
};
pub use lifecycle::{
    AppLifecycleState, AppLifecycleWatcher, LifecycleCallback, LifecycleSource,
    ManualLifecycleSource,
};
pub use subscription::{Callback, Listeners, Subscription};

/// Errors raised while interpreting platform values
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// The platform reported an appearance string we do not recognize
    #[error("Unknown system appearance: {0}")]
    UnknownAppearance(String),

    /// The platform reported a lifecycle string we do not recognize
    #[error("Unknown lifecycle state: {0}")]
    UnknownLifecycleState(String),
}
