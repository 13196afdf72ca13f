//! Storage layer for MoodNote
//!
//! This crate provides the durable key-value boundary and the appearance
//! preference that is persisted through it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod durable;
pub mod kv;
pub mod preferences;

pub use durable::{DurableStorage, MemoryStorage, StorageError};
pub use kv::{KvConfig, KvError, KvStore};
pub use preferences::{
    PreferenceError, ThemeMode, ThemePreference, ThemePreferenceGateway, THEME_MODE_KEY,
};
