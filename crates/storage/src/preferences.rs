//! Appearance preference and its persistence gateway
//!
//! The user's chosen [`ThemeMode`] is the only appearance state that outlives
//! the process. It is stored as a single string under one key; anything else
//! found under that key is treated as if nothing was stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::durable::{DurableStorage, StorageError};

/// Storage key used for the appearance preference
pub const THEME_MODE_KEY: &str = "@MoodNote:themeMode";

/// User-selected appearance mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ThemeMode {
    /// Always render the light appearance
    #[serde(rename = "light")]
    Light,
    /// Always render the dark appearance
    #[serde(rename = "dark")]
    Dark,
    /// Track the operating system's appearance
    #[default]
    #[serde(rename = "system")]
    FollowSystem,
}

impl ThemeMode {
    /// All modes, in cycling order
    pub const ALL: [ThemeMode; 3] = [ThemeMode::Light, ThemeMode::Dark, ThemeMode::FollowSystem];

    /// The persisted string form
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
            ThemeMode::FollowSystem => "system",
        }
    }

    /// Parse a persisted string, `None` for anything unrecognized
    pub fn from_stored(value: &str) -> Option<Self> {
        match value {
            "light" => Some(ThemeMode::Light),
            "dark" => Some(ThemeMode::Dark),
            "system" => Some(ThemeMode::FollowSystem),
            _ => None,
        }
    }

    /// Check if this mode tracks the operating system
    pub fn is_system_following(&self) -> bool {
        matches!(self, ThemeMode::FollowSystem)
    }
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ThemeMode::from_stored(s).ok_or_else(|| format!("Unknown theme mode: {}", s))
    }
}

/// The user's appearance preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemePreference {
    /// Selected mode
    pub mode: ThemeMode,
    /// When the mode was last changed by the user in this process
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl ThemePreference {
    /// A preference restored from storage or defaulted (no known change time)
    pub fn restored(mode: ThemeMode) -> Self {
        Self { mode, last_updated: None }
    }

    /// A preference the user just selected
    pub fn changed(mode: ThemeMode) -> Self {
        Self { mode, last_updated: Some(Utc::now()) }
    }
}

/// Preference persistence errors
#[derive(Debug, Error)]
pub enum PreferenceError {
    /// Reading the stored preference failed
    #[error("Failed to read preference: {0}")]
    Read(#[source] StorageError),

    /// Writing the preference failed
    #[error("Failed to write preference: {0}")]
    Write(#[source] StorageError),
}

/// Result type for preference operations
pub type Result<T> = std::result::Result<T, PreferenceError>;

/// Reads and writes the appearance preference through a [`DurableStorage`]
#[derive(Clone)]
pub struct ThemePreferenceGateway {
    storage: Arc<dyn DurableStorage>,
    key: String,
}

impl ThemePreferenceGateway {
    /// Create a gateway using the default key
    pub fn new(storage: Arc<dyn DurableStorage>) -> Self {
        Self::with_key(storage, THEME_MODE_KEY)
    }

    /// Create a gateway using a custom key
    pub fn with_key(storage: Arc<dyn DurableStorage>, key: impl Into<String>) -> Self {
        Self { storage, key: key.into() }
    }

    /// The key this gateway owns
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the stored mode
    ///
    /// Returns `Ok(None)` when nothing is stored or the stored value is not a
    /// known mode.
    pub async fn load(&self) -> Result<Option<ThemeMode>> {
        let raw = self.storage.get(&self.key).await.map_err(PreferenceError::Read)?;

        Ok(raw.and_then(|value| {
            let mode = ThemeMode::from_stored(&value);
            if mode.is_none() {
                tracing::warn!("Ignoring invalid stored theme mode {:?}", value);
            }
            mode
        }))
    }

    /// Persist a mode
    pub async fn save(&self, mode: ThemeMode) -> Result<()> {
        self.storage
            .set(&self.key, mode.as_str())
            .await
            .map_err(PreferenceError::Write)
    }

    /// Remove the stored mode
    pub async fn clear(&self) -> Result<()> {
        self.storage.remove(&self.key).await.map_err(PreferenceError::Write)
    }
}
