//! Appearance layer for MoodNote
//!
//! This crate holds the presentation-side pieces of the appearance engine:
//! the two design token sets and the pure rules that pick between them.
//!
//! # Modules
//!
//! - [`theme`] - Appearance resolution, mode cycling, and mode labels
//! - [`tokens`] - Design tokens (colors, spacing, radii)
//!
//! # Example
//!
//! ```rust
//! use app_platform::SystemAppearance;
//! use app_ui::{resolve, tokens_for, ModeCycler};
//! use storage::ThemeMode;
//!
//! let is_dark = resolve(ThemeMode::FollowSystem, SystemAppearance::Dark);
//! let tokens = tokens_for(is_dark);
//! assert_eq!(tokens.spacing.md, 16.0);
//!
//! let next = ModeCycler::next(ThemeMode::FollowSystem);
//! assert_eq!(next, ThemeMode::Light);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod theme;
pub mod tokens;

// Re-export commonly used types
pub use theme::{
    mode_options, resolve, resolve_with_fallback, status_description, with_opacity,
    ModeCycler, ModeOption, ModePresentation, ResolvedAppearance,
};

pub use tokens::{
    radius, spacing, tokens_for, ColorTokens, RadiusTokens, SpacingTokens, ThemeTokens,
    DARK_TOKENS, LIGHT_TOKENS,
};
