//! Application state for MoodNote
//!
//! This crate owns the adaptive appearance state: the [`ThemeStore`] every
//! screen reads its tokens from, and the [`TransitionGuard`] that keeps mode
//! changes from overlapping.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod theme_store;
pub mod transition;

pub use theme_store::{
    Lifecycle, ThemeSnapshot, ThemeStatus, ThemeStore, ThemeStoreConfig, TransitionOutcome,
    DEFAULT_INIT_TIMEOUT,
};
pub use transition::{
    GuardOutcome, TransitionGuard, TransitionPermit, TransitionState, DEFAULT_DEBOUNCE,
};
