//! Terminal color theme
//!
//! Adaptive palettes for dark and light terminal backgrounds. Detection uses
//! the COLORFGBG env var; GP_LIGHT_BG=1 or the `theme:` option override it.

use gp_core::growth::Component;
use gp_core::options::ThemePreference;
use ratatui::style::Color;

/// Color theme for the terminal UI.
/// UI code should use theme colors instead of hardcoded Color:: values.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    /// Primary foreground text
    pub text: Color,
    /// Hints and footers
    pub text_dim: Color,
    /// Empty states
    pub text_muted: Color,

    pub border: Color,
    /// Focused panel border
    pub border_accent: Color,
    /// Picker and editor overlays
    pub border_action: Color,

    pub cursor_fg: Color,
    pub cursor_bg: Color,

    pub accent: Color,
    pub header: Color,
    pub good: Color,
    pub bad: Color,

    // Chart layers
    pub personal: Color,
    pub parent: Color,
    pub class: Color,
    pub boon: Color,
}

impl Theme {
    /// Dark terminal background theme (default)
    pub fn dark() -> Self {
        Self {
            text: Color::White,
            text_dim: Color::DarkGray,
            text_muted: Color::Gray,
            border: Color::White,
            border_accent: Color::Cyan,
            border_action: Color::Yellow,
            cursor_fg: Color::Yellow,
            cursor_bg: Color::DarkGray,
            accent: Color::Cyan,
            header: Color::Yellow,
            good: Color::Green,
            bad: Color::Red,
            personal: Color::LightBlue,
            parent: Color::LightMagenta,
            class: Color::LightGreen,
            boon: Color::LightYellow,
        }
    }

    /// Light terminal background theme
    pub fn light() -> Self {
        Self {
            text: Color::Black,
            text_dim: Color::DarkGray,
            text_muted: Color::DarkGray,
            border: Color::DarkGray,
            border_accent: Color::Blue,
            border_action: Color::Magenta,
            cursor_fg: Color::Black,
            cursor_bg: Color::Gray,
            accent: Color::Blue,
            header: Color::Magenta,
            good: Color::Green,
            bad: Color::Red,
            personal: Color::Blue,
            parent: Color::Magenta,
            class: Color::Green,
            boon: Color::Yellow,
        }
    }

    /// Auto-detect terminal background and return the matching theme
    pub fn detect() -> Self {
        if Self::is_light_background() {
            Self::light()
        } else {
            Self::dark()
        }
    }

    /// Theme for a configured preference
    pub fn from_preference(preference: ThemePreference) -> Self {
        match preference {
            ThemePreference::Auto => Self::detect(),
            ThemePreference::Dark => Self::dark(),
            ThemePreference::Light => Self::light(),
        }
    }

    /// Fill color of one chart layer
    pub fn component(&self, component: Component) -> Color {
        match component {
            Component::Personal => self.personal,
            Component::Parent => self.parent,
            Component::Class => self.class,
            Component::Trait => self.boon,
        }
    }

    fn is_light_background() -> bool {
        if let Ok(val) = std::env::var("GP_LIGHT_BG") {
            return val == "1" || val.eq_ignore_ascii_case("true");
        }

        // COLORFGBG is "fg;bg" with color indices (0-15); light backgrounds
        // use 7 or 9..=15
        if let Ok(colorfgbg) = std::env::var("COLORFGBG")
            && let Some(bg_str) = colorfgbg.rsplit(';').next()
            && let Ok(bg_idx) = bg_str.parse::<u8>()
        {
            return matches!(bg_idx, 7 | 9..=15);
        }

        false
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::detect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dark_theme_text_is_white() {
        assert_eq!(Theme::dark().text, Color::White);
    }

    #[test]
    fn test_light_theme_text_is_black() {
        assert_eq!(Theme::light().text, Color::Black);
    }

    #[test]
    fn test_explicit_preference() {
        assert_eq!(Theme::from_preference(ThemePreference::Light).text, Color::Black);
        assert_eq!(Theme::from_preference(ThemePreference::Dark).text, Color::White);
    }

    #[test]
    fn test_layers_have_distinct_colors() {
        let theme = Theme::dark();
        let colors = [
            theme.component(Component::Personal),
            theme.component(Component::Parent),
            theme.component(Component::Class),
            theme.component(Component::Trait),
        ];
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
