//! Terminal theme detection and color definitions

use ratatui::style::Color;

/// Efficiency band used for score coloring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EfficiencyLevel {
    Low,
    Fair,
    Good,
}

/// Classify an efficiency score: 80+ good, 60..80 fair, below 60 low
pub fn efficiency_level(score: i64) -> EfficiencyLevel {
    if score >= 80 {
        EfficiencyLevel::Good
    } else if score >= 60 {
        EfficiencyLevel::Fair
    } else {
        EfficiencyLevel::Low
    }
}

/// Terminal color scheme (dark or light background)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Auto-detect terminal theme from background luminance.
    /// Must be called **before** entering raw mode (ratatui::init).
    /// Falls back to Dark if detection fails.
    pub fn detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.6 => Self::Light,
            _ => Self::Dark,
        }
    }

    /// Primary text color (headers, body text)
    pub fn text(self) -> Color {
        match self {
            Self::Dark => Color::White,
            Self::Light => Color::Black,
        }
    }

    /// Active/accent color (selected tabs, keybinding keys, interactive elements)
    pub fn accent(self) -> Color {
        match self {
            Self::Dark => Color::Cyan,
            Self::Light => Color::Indexed(25), // dark blue (ANSI 256)
        }
    }

    /// Secondary/muted text (separators, inactive tabs, hints)
    pub fn muted(self) -> Color {
        match self {
            Self::Dark => Color::DarkGray,
            Self::Light => Color::Gray,
        }
    }

    /// Date text color
    pub fn date(self) -> Color {
        match self {
            Self::Dark => Color::Yellow,
            Self::Light => Color::Indexed(130), // dark orange/yellow (ANSI 256)
        }
    }

    /// Category label color
    pub fn category(self) -> Color {
        match self {
            Self::Dark => Color::Magenta,
            Self::Light => Color::Indexed(90), // dark magenta (ANSI 256)
        }
    }

    /// Bar/positive indicator color
    pub fn bar(self) -> Color {
        match self {
            Self::Dark => Color::Green,
            Self::Light => Color::Indexed(22), // dark green (ANSI 256)
        }
    }

    /// Error/negative indicator color
    pub fn error(self) -> Color {
        match self {
            Self::Dark => Color::Red,
            Self::Light => Color::Indexed(124), // dark red (ANSI 256)
        }
    }

    /// Stats accent color (Total Hours card)
    pub fn stat_blue(self) -> Color {
        match self {
            Self::Dark => Color::Blue,
            Self::Light => Color::Indexed(25),
        }
    }

    /// Stats warm highlight (Top Category card)
    pub fn stat_warm(self) -> Color {
        match self {
            Self::Dark => Color::LightRed,
            Self::Light => Color::Red,
        }
    }

    /// Score color by efficiency band
    pub fn efficiency_color(self, level: EfficiencyLevel) -> Color {
        match level {
            EfficiencyLevel::Good => self.bar(),
            EfficiencyLevel::Fair => self.date(),
            EfficiencyLevel::Low => self.error(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dark_theme_colors() {
        let t = Theme::Dark;
        assert_eq!(t.text(), Color::White);
        assert_eq!(t.accent(), Color::Cyan);
        assert_eq!(t.muted(), Color::DarkGray);
        assert_eq!(t.date(), Color::Yellow);
        assert_eq!(t.category(), Color::Magenta);
        assert_eq!(t.bar(), Color::Green);
        assert_eq!(t.error(), Color::Red);
    }

    #[test]
    fn test_light_theme_colors() {
        let t = Theme::Light;
        assert_eq!(t.text(), Color::Black);
        assert_eq!(t.accent(), Color::Indexed(25));
        assert_eq!(t.muted(), Color::Gray);
        assert_eq!(t.bar(), Color::Indexed(22));
        assert_eq!(t.error(), Color::Indexed(124));
    }

    #[test]
    fn test_default_is_dark() {
        assert_eq!(Theme::default(), Theme::Dark);
    }

    // ========== Efficiency level tests ==========

    #[test]
    fn test_efficiency_level_bands() {
        assert_eq!(efficiency_level(100), EfficiencyLevel::Good);
        assert_eq!(efficiency_level(80), EfficiencyLevel::Good);
        assert_eq!(efficiency_level(79), EfficiencyLevel::Fair);
        assert_eq!(efficiency_level(60), EfficiencyLevel::Fair);
        assert_eq!(efficiency_level(59), EfficiencyLevel::Low);
        assert_eq!(efficiency_level(0), EfficiencyLevel::Low);
        assert_eq!(efficiency_level(-5), EfficiencyLevel::Low);
    }

    #[test]
    fn test_efficiency_color() {
        let t = Theme::Dark;
        assert_eq!(t.efficiency_color(EfficiencyLevel::Good), t.bar());
        assert_eq!(t.efficiency_color(EfficiencyLevel::Fair), t.date());
        assert_eq!(t.efficiency_color(EfficiencyLevel::Low), t.error());
    }
}
