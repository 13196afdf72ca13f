//! Design tokens for MoodNote
//!
//! Two fixed token sets exist, one per resolved appearance. Spacing and
//! radius scales are shared; only colors differ between light and dark.

use serde::Serialize;

// =============================================================================
// Spacing Tokens
// =============================================================================

/// Spacing scale in pixels
pub mod spacing {
    /// 4px - Extra small
    pub const XS: f32 = 4.0;
    /// 8px - Small
    pub const SM: f32 = 8.0;
    /// 16px - Medium
    pub const MD: f32 = 16.0;
    /// 24px - Large
    pub const LG: f32 = 24.0;
    /// 32px - Extra large
    pub const XL: f32 = 32.0;

    /// Get spacing value by name
    pub fn get(name: &str) -> Option<f32> {
        match name {
            "xs" => Some(XS),
            "sm" => Some(SM),
            "md" => Some(MD),
            "lg" => Some(LG),
            "xl" => Some(XL),
            _ => None,
        }
    }
}

// =============================================================================
// Border Radius Tokens
// =============================================================================

/// Border radius values
pub mod radius {
    /// Small radius (8px)
    pub const SM: f32 = 8.0;
    /// Medium radius (12px)
    pub const MD: f32 = 12.0;
    /// Large radius (16px)
    pub const LG: f32 = 16.0;
    /// Extra large radius (24px)
    pub const XL: f32 = 24.0;

    /// Get radius value by name
    pub fn get(name: &str) -> Option<f32> {
        match name {
            "sm" => Some(SM),
            "md" => Some(MD),
            "lg" => Some(LG),
            "xl" => Some(XL),
            _ => None,
        }
    }
}

// =============================================================================
// Token Bundles
// =============================================================================

/// Semantic colors for one appearance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorTokens {
    /// Primary brand color
    pub primary: &'static str,
    /// Screen background
    pub background: &'static str,
    /// Card and sheet surface
    pub surface: &'static str,
    /// Primary text
    pub text: &'static str,
    /// Muted text
    pub text_secondary: &'static str,
    /// Text input fill
    pub input_background: &'static str,
    /// Text input border
    pub input_border: &'static str,
    /// Shadow color
    pub shadow: &'static str,
    /// Text on filled buttons
    pub button_text: &'static str,
    /// Input placeholder
    pub placeholder: &'static str,
    /// Accent highlights
    pub accent: &'static str,
    /// Errors and destructive actions
    pub error: &'static str,
}

/// Spacing scale bundled with a token set
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpacingTokens {
    /// Extra small
    pub xs: f32,
    /// Small
    pub sm: f32,
    /// Medium
    pub md: f32,
    /// Large
    pub lg: f32,
    /// Extra large
    pub xl: f32,
}

/// Radius scale bundled with a token set
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RadiusTokens {
    /// Small
    pub sm: f32,
    /// Medium
    pub md: f32,
    /// Large
    pub lg: f32,
    /// Extra large
    pub xl: f32,
}

/// Everything a screen needs to paint itself in one appearance
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThemeTokens {
    /// Whether this is the dark set
    pub is_dark: bool,
    /// Color tokens
    pub colors: ColorTokens,
    /// Spacing tokens
    pub spacing: SpacingTokens,
    /// Radius tokens
    pub radii: RadiusTokens,
}

const SPACING: SpacingTokens = SpacingTokens {
    xs: spacing::XS,
    sm: spacing::SM,
    md: spacing::MD,
    lg: spacing::LG,
    xl: spacing::XL,
};

const RADII: RadiusTokens = RadiusTokens {
    sm: radius::SM,
    md: radius::MD,
    lg: radius::LG,
    xl: radius::XL,
};

/// Light appearance tokens
pub static LIGHT_TOKENS: ThemeTokens = ThemeTokens {
    is_dark: false,
    colors: ColorTokens {
        primary: "#a8998a",
        background: "#d4c5b9",
        surface: "rgba(255, 255, 255, 0.9)",
        text: "#6b5b73",
        text_secondary: "#8b7d8b",
        input_background: "#f5f3f0",
        input_border: "rgba(171, 158, 147, 0.3)",
        shadow: "#6b5b73",
        button_text: "#ffffff",
        placeholder: "#999999",
        accent: "#a8998a",
        error: "#d63031",
    },
    spacing: SPACING,
    radii: RADII,
};

/// Dark appearance tokens
pub static DARK_TOKENS: ThemeTokens = ThemeTokens {
    is_dark: true,
    colors: ColorTokens {
        primary: "#8a7a6b",
        background: "#2c2420",
        surface: "rgba(60, 50, 45, 0.9)",
        text: "#e8ddd4",
        text_secondary: "#c4b5a0",
        input_background: "#3c322d",
        input_border: "rgba(200, 180, 160, 0.2)",
        shadow: "#000000",
        button_text: "#ffffff",
        placeholder: "#888888",
        accent: "#8a7a6b",
        error: "#ff6b6b",
    },
    spacing: SPACING,
    radii: RADII,
};

/// Select the token set for a resolved appearance
pub fn tokens_for(is_dark: bool) -> &'static ThemeTokens {
    if is_dark {
        &DARK_TOKENS
    } else {
        &LIGHT_TOKENS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spacing_scale() {
        assert!(spacing::XS < spacing::SM);
        assert!(spacing::SM < spacing::MD);
        assert!(spacing::MD < spacing::LG);
        assert!(spacing::LG < spacing::XL);
        assert_eq!(spacing::get("md"), Some(16.0));
        assert_eq!(spacing::get("huge"), None);
    }

    #[test]
    fn test_radius_scale() {
        assert!(radius::SM < radius::MD);
        assert!(radius::MD < radius::LG);
        assert!(radius::LG < radius::XL);
        assert_eq!(radius::get("xl"), Some(24.0));
        assert_eq!(radius::get("round"), None);
    }

    #[test]
    fn test_tokens_for_selects_set() {
        assert!(!tokens_for(false).is_dark);
        assert!(tokens_for(true).is_dark);
        assert_eq!(tokens_for(true).colors.background, "#2c2420");
        assert_eq!(tokens_for(false).colors.background, "#d4c5b9");
    }

    #[test]
    fn test_sets_share_layout_tokens() {
        assert_eq!(LIGHT_TOKENS.spacing, DARK_TOKENS.spacing);
        assert_eq!(LIGHT_TOKENS.radii, DARK_TOKENS.radii);
        assert_ne!(LIGHT_TOKENS.colors, DARK_TOKENS.colors);
    }

    #[test]
    fn test_text_differs_from_background() {
        for tokens in [&LIGHT_TOKENS, &DARK_TOKENS] {
            assert_ne!(tokens.colors.text, tokens.colors.background);
            assert_ne!(tokens.colors.button_text, tokens.colors.primary);
        }
    }

    #[test]
    fn test_tokens_serialization() {
        let json = serde_json::to_value(&DARK_TOKENS).unwrap();
        assert_eq!(json["is_dark"], true);
        assert_eq!(json["colors"]["textSecondary"], "#c4b5a0");
        assert_eq!(json["radii"]["md"], 12.0);
    }
}
