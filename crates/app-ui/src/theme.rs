//! Appearance resolution for MoodNote
//!
//! This module turns the user's [`ThemeMode`] and the last known
//! [`SystemAppearance`] into a concrete light or dark appearance, and
//! provides the cycling order and labels used by the theme toggle.
//!
//! # Usage
//!
//! ```rust
//! use app_platform::SystemAppearance;
//! use app_ui::theme::{resolve, ModeCycler, ResolvedAppearance};
//! use storage::ThemeMode;
//!
//! assert!(resolve(ThemeMode::FollowSystem, SystemAppearance::Dark));
//! assert_eq!(ModeCycler::next(ThemeMode::Light), ThemeMode::Dark);
//!
//! let appearance = ResolvedAppearance::new(ThemeMode::Dark, SystemAppearance::Light);
//! assert_eq!(appearance.tokens.colors.background, "#2c2420");
//! ```

use app_platform::SystemAppearance;
use serde::Serialize;
use storage::ThemeMode;

use crate::tokens::{tokens_for, ThemeTokens};

// =============================================================================
// Resolution
// =============================================================================

/// Decide whether to render dark
///
/// An `Unknown` system signal under `FollowSystem` resolves to light.
pub fn resolve(mode: ThemeMode, system: SystemAppearance) -> bool {
    resolve_with_fallback(mode, system, false)
}

/// Decide whether to render dark, choosing the result for an `Unknown` signal
pub fn resolve_with_fallback(mode: ThemeMode, system: SystemAppearance, unknown_is_dark: bool) -> bool {
    match mode {
        ThemeMode::Light => false,
        ThemeMode::Dark => true,
        ThemeMode::FollowSystem => match system {
            SystemAppearance::Dark => true,
            SystemAppearance::Light => false,
            SystemAppearance::Unknown => unknown_is_dark,
        },
    }
}

/// The appearance actually rendered
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedAppearance {
    /// Render dark
    pub is_dark: bool,
    /// Token set for this appearance
    pub tokens: &'static ThemeTokens,
}

impl ResolvedAppearance {
    /// Resolve with the default `Unknown` policy (light)
    pub fn new(mode: ThemeMode, system: SystemAppearance) -> Self {
        Self::with_fallback(mode, system, false)
    }

    /// Resolve with an explicit `Unknown` policy
    pub fn with_fallback(mode: ThemeMode, system: SystemAppearance, unknown_is_dark: bool) -> Self {
        let is_dark = resolve_with_fallback(mode, system, unknown_is_dark);
        Self { is_dark, tokens: tokens_for(is_dark) }
    }
}

// =============================================================================
// Mode Cycling
// =============================================================================

/// Steps through modes in the fixed order Light → Dark → FollowSystem
pub struct ModeCycler;

impl ModeCycler {
    /// The mode after `mode`
    pub fn next(mode: ThemeMode) -> ThemeMode {
        let modes = ThemeMode::ALL;
        modes[(Self::position(mode) + 1) % modes.len()]
    }

    /// The mode before `mode`
    pub fn previous(mode: ThemeMode) -> ThemeMode {
        let modes = ThemeMode::ALL;
        modes[(Self::position(mode) + modes.len() - 1) % modes.len()]
    }

    fn position(mode: ThemeMode) -> usize {
        match mode {
            ThemeMode::Light => 0,
            ThemeMode::Dark => 1,
            ThemeMode::FollowSystem => 2,
        }
    }
}

// =============================================================================
// Presentation
// =============================================================================

/// Labels shown for a mode in settings and the toggle control
pub trait ModePresentation {
    /// Short name
    fn display_name(&self) -> &'static str;
    /// Icon glyph
    fn icon(&self) -> &'static str;
    /// One-sentence description
    fn description(&self) -> &'static str;
}

impl ModePresentation for ThemeMode {
    fn display_name(&self) -> &'static str {
        match self {
            ThemeMode::Light => "Light",
            ThemeMode::Dark => "Dark",
            ThemeMode::FollowSystem => "Follow system",
        }
    }

    fn icon(&self) -> &'static str {
        match self {
            ThemeMode::Light => "🌞",
            ThemeMode::Dark => "🌙",
            ThemeMode::FollowSystem => "🔄",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            ThemeMode::Light => "Bright colors for well-lit surroundings",
            ThemeMode::Dark => "Dark colors that are easier on the eyes in low light",
            ThemeMode::FollowSystem => "Switches automatically with the system light/dark setting",
        }
    }
}

/// Status line for the settings screen
///
/// Under `FollowSystem` the line includes the appearance currently in effect.
pub fn status_description(mode: ThemeMode, is_dark: bool) -> String {
    match mode {
        ThemeMode::FollowSystem => {
            format!("{} (currently {})", mode.display_name(), if is_dark { "dark" } else { "light" })
        }
        _ => mode.display_name().to_string(),
    }
}

/// A selectable mode with its labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeOption {
    /// The mode
    pub mode: ThemeMode,
    /// Short name
    pub display_name: &'static str,
    /// Icon glyph
    pub icon: &'static str,
    /// Description
    pub description: &'static str,
    /// Whether this is the active mode
    pub is_active: bool,
}

/// All modes with labels, marking `active`
pub fn mode_options(active: ThemeMode) -> Vec<ModeOption> {
    ThemeMode::ALL
        .iter()
        .map(|&mode| ModeOption {
            mode,
            display_name: mode.display_name(),
            icon: mode.icon(),
            description: mode.description(),
            is_active: mode == active,
        })
        .collect()
}

// =============================================================================
// Color Helpers
// =============================================================================

/// Parse a hex color string to RGB components
pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Apply an opacity to a color token
///
/// Hex and `rgb(...)` colors become `rgba(...)`. Colors that already carry
/// alpha, or that cannot be parsed, are returned unchanged.
pub fn with_opacity(color: &str, opacity: f32) -> String {
    if color.starts_with("rgba") || color.starts_with("hsla") {
        return color.to_string();
    }

    if color.starts_with('#') {
        if let Some((r, g, b)) = parse_hex_color(color) {
            return format!("rgba({}, {}, {}, {})", r, g, b, opacity);
        }
    }

    if let Some(inner) = color.strip_prefix("rgb(").and_then(|c| c.strip_suffix(')')) {
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() == 3 && parts.iter().all(|p| p.parse::<u8>().is_ok()) {
            return format!("rgba({}, {}, {}, {})", parts[0], parts[1], parts[2], opacity);
        }
    }

    color.to_string()
}
